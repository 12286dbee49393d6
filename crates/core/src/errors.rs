use thiserror::Error;

/// Unified error type for the entire portfolio-tracker-core library.
/// Every public fallible function returns `Result<T, CoreError>`.
///
/// Two conditions are deliberately NOT errors: a vendor response with no
/// usable data travels in-band as an empty price series, and a skipped
/// net-worth cycle travels as `AggregationOutcome::Skipped`. Both are
/// expected under rate limiting and degraded vendor service.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Record store ────────────────────────────────────────────────
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Asset already exists: {0}")]
    AssetAlreadyExists(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Market data ─────────────────────────────────────────────────
    #[error("No price data available for {symbol}")]
    PriceDataUnavailable { symbol: String },
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
