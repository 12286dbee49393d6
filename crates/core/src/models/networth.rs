use serde::{Deserialize, Serialize};

/// The published valuation of the whole portfolio, in USD.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthSummary {
    /// Aggregate cost basis: Σ shares × average cost.
    pub book_value: f64,

    /// Aggregate market value at the latest date common to every
    /// eligible asset.
    pub market_value: f64,
}

/// What a net-worth recomputation cycle did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AggregationOutcome {
    /// A new summary was persisted and published.
    Updated(NetWorthSummary),
    /// No assets remain; the stored summary was removed and zeros were
    /// published.
    Reset,
    /// The cycle was skipped; the previously published value stands.
    Skipped(SkipReason),
}

/// Why a recomputation cycle was skipped. A skip is a defined degraded
/// state, not an error: net worth is a best-effort derived figure and is
/// never retracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The FX conversion series could not be fetched, or is empty.
    FxUnavailable,
    /// No date is covered by every eligible asset.
    NoCommonDates,
}
