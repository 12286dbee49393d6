use serde::{Deserialize, Serialize};

use super::asset::AssetRecord;
use super::series::PriceSeries;

/// Storage symbol of the CAD→USD conversion series (value = USD per
/// 1 CAD).
pub const FX_SYMBOL: &str = "CADUSD";

/// Storage symbol of the computed net-worth record.
pub const NET_WORTH_SYMBOL: &str = "NETWORTH";

/// True for symbols reserved for engine-owned records. User assets can
/// never be created under a reserved symbol.
pub fn is_reserved_symbol(symbol: &str) -> bool {
    symbol == FX_SYMBOL || symbol == NET_WORTH_SYMBOL
}

/// A store entry that does not represent a user-owned asset: the FX
/// conversion series and the computed net-worth summary.
///
/// The FX record carries only `history`. The net-worth record also
/// carries the aggregate book value and the latest aggregate market
/// value, with `history` holding the merged market-value series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticSeries {
    pub symbol: String,

    /// Aggregate book value (net-worth record only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_value: Option<f64>,

    /// Latest aggregate market value (net-worth record only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_value: Option<f64>,

    pub history: PriceSeries,
}

impl SyntheticSeries {
    /// A bare series record (used for the FX conversion history).
    pub fn series(symbol: impl Into<String>, history: PriceSeries) -> Self {
        Self {
            symbol: symbol.into(),
            book_value: None,
            market_value: None,
            history,
        }
    }
}

/// Everything the record store can hold.
///
/// User-owned assets and engine-owned synthetic series are distinct
/// variants, so listings exclude synthetics structurally instead of by
/// symbol-string convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StoredRecord {
    Asset(AssetRecord),
    Synthetic(SyntheticSeries),
}

impl StoredRecord {
    /// The storage symbol of the record, regardless of variant.
    pub fn symbol(&self) -> &str {
        match self {
            StoredRecord::Asset(a) => &a.symbol,
            StoredRecord::Synthetic(s) => &s.symbol,
        }
    }

    /// The asset inside, if this is a user-owned record.
    pub fn into_asset(self) -> Option<AssetRecord> {
        match self {
            StoredRecord::Asset(a) => Some(a),
            StoredRecord::Synthetic(_) => None,
        }
    }
}
