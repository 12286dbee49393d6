use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::series::PriceSeries;

/// The type/category of a tracked asset.
/// Determines which vendor endpoint and close-price field to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetType {
    /// Equities (AAPL, SHOP, ...) — daily close in the listing currency
    Stock,
    /// Cryptocurrencies (BTC, ETH, ...) — daily close quoted against USD
    Crypto,
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetType::Stock => write!(f, "Stock"),
            AssetType::Crypto => write!(f, "Crypto"),
        }
    }
}

/// Currency a cost basis and price history are denominated in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Cad,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::Usd => write!(f, "USD"),
            Currency::Cad => write!(f, "CAD"),
        }
    }
}

/// One tracked instrument: user-entered cost-basis data plus the cached
/// vendor price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    /// Ticker symbol, uppercased — the unique key within the store.
    pub symbol: String,

    /// Stock or crypto — selects the vendor endpoint/response shape.
    #[serde(rename = "type")]
    pub asset_type: AssetType,

    /// Currency the cost basis and price history are denominated in.
    /// `None` on records written before the field existed; read through
    /// [`AssetRecord::currency_or_default`]. `list_assets` backfills
    /// legacy records to USD on the way out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,

    /// Quantity held. Absent or zero makes this a watch-only entry that
    /// contributes nothing to book or market value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<f64>,

    /// Per-share cost basis in `currency`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_cost: Option<f64>,

    /// User-declared spend target. Ignored by aggregation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,

    /// Cached daily price history, stamped with the local fetch date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<PriceSeries>,
}

impl AssetRecord {
    /// A bare record with no holdings data and no history.
    pub fn new(symbol: impl Into<String>, asset_type: AssetType) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            asset_type,
            currency: None,
            shares: None,
            average_cost: None,
            budget: None,
            history: None,
        }
    }

    /// The denomination currency, defaulting legacy records to USD.
    pub fn currency_or_default(&self) -> Currency {
        self.currency.unwrap_or_default()
    }

    /// Whether this asset participates in aggregation: positive shares,
    /// a recorded cost basis, and at least one cached price point.
    /// Ineligible assets contribute nothing and do not constrain the
    /// date intersection.
    pub fn is_eligible(&self) -> bool {
        self.shares.is_some_and(|s| s > 0.0)
            && self.average_cost.is_some()
            && self.history.as_ref().is_some_and(|h| !h.is_empty())
    }

    /// Freshness rule: re-fetch when there is no cached history or the
    /// cache was not written today.
    pub fn needs_refresh(&self, today: NaiveDate) -> bool {
        self.history.as_ref().map_or(true, |h| !h.is_fresh(today))
    }
}
