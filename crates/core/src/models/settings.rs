use serde::{Deserialize, Serialize};

/// User-configurable settings consumed by the composition root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Alpha Vantage API key. Treated as an opaque credential and
    /// validated out-of-band; an invalid or empty key makes the vendor
    /// answer with error payloads, which surface as empty series.
    #[serde(default)]
    pub api_key: String,
}

impl Settings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}
