use async_trait::async_trait;

use crate::models::asset::AssetType;
use crate::models::series::PriceSeries;

/// Trait abstraction over the daily price-history vendor.
///
/// The contract is infallible on purpose: every failure mode — transport
/// error, rate limit, unknown symbol, error payload — collapses into an
/// empty series stamped with today's date. Consumers decide what an
/// empty series means in context (creation failure vs. tolerable
/// refresh miss).
#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    /// Human-readable name of this source (for logs).
    fn name(&self) -> &str;

    /// Fetch the full daily price history for a symbol.
    /// The returned series is ordered oldest → newest.
    async fn fetch_history(&self, symbol: &str, asset_type: AssetType) -> PriceSeries;
}
