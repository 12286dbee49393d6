pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use errors::CoreError;
use models::asset::AssetRecord;
use models::networth::{AggregationOutcome, NetWorthSummary};
use models::settings::Settings;
use providers::alphavantage::AlphaVantageProvider;
use providers::traits::PriceHistorySource;
use services::asset_service::{AssetEdit, AssetService, NewAsset, RefreshOutcome};
use services::networth_service::NetWorthService;
use services::notifications::Notifications;
use storage::RecordStore;

/// Main entry point for the portfolio tracker core library.
///
/// The composition root: owns the record store, the price source, the
/// notification hub, and the services operating on them, and wires every
/// asset mutation to a net-worth recomputation. All mutating operations
/// take `&mut self` — the aggregation engine is not reentrant-safe, and
/// exclusive access serializes its triggers.
pub struct PortfolioTracker {
    assets: AssetService,
    networth: NetWorthService,
    notifications: Notifications,
}

impl std::fmt::Debug for PortfolioTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioTracker")
            .field("net_worth", &self.notifications.latest_net_worth())
            .finish_non_exhaustive()
    }
}

impl PortfolioTracker {
    /// Build a tracker talking to Alpha Vantage with the supplied
    /// settings.
    pub fn new(store: Arc<dyn RecordStore>, settings: Settings) -> Self {
        let source: Arc<dyn PriceHistorySource> =
            Arc::new(AlphaVantageProvider::new(settings.api_key));
        Self::with_source(store, source)
    }

    /// Build a tracker with an injected price source (tests, alternative
    /// vendors).
    pub fn with_source(
        store: Arc<dyn RecordStore>,
        source: Arc<dyn PriceHistorySource>,
    ) -> Self {
        Self {
            assets: AssetService::new(store.clone(), source.clone()),
            networth: NetWorthService::new(store, source),
            notifications: Notifications::new(),
        }
    }

    // ── Asset lifecycle ─────────────────────────────────────────────

    /// Register a new asset and fold it into the net worth.
    ///
    /// Fails with `AssetAlreadyExists` on a symbol collision (reserved
    /// symbols included) and with `PriceDataUnavailable` when the vendor
    /// has no history for the symbol; nothing is persisted in either
    /// case.
    pub async fn add_asset(&mut self, new_asset: NewAsset) -> Result<AssetRecord, CoreError> {
        let record = self.assets.create(new_asset).await?;
        self.notifications.bump_asset_list();
        self.recompute_net_worth().await?;
        Ok(record)
    }

    /// Edit cost basis / shares / currency / budget on an existing
    /// asset, preserving its cached history. Recomputes net worth only
    /// when a valuation-relevant field changed.
    pub async fn update_asset(
        &mut self,
        symbol: &str,
        edit: AssetEdit,
    ) -> Result<AssetRecord, CoreError> {
        let (record, valuation_changed) = self.assets.edit(symbol, edit)?;
        if valuation_changed {
            self.recompute_net_worth().await?;
        }
        Ok(record)
    }

    /// Stop tracking an asset. The recomputation that follows silently
    /// drops it from aggregation.
    pub async fn remove_asset(&mut self, symbol: &str) -> Result<(), CoreError> {
        self.assets.remove(symbol)?;
        self.notifications.bump_asset_list();
        self.recompute_net_worth().await?;
        Ok(())
    }

    /// View an asset: refresh its history if stale, publish it on the
    /// current-asset stream, and return it together with what the
    /// refresh did.
    ///
    /// A failed refresh keeps (and returns) the last-known history. An
    /// asset with no usable history at all is removed, dropped from the
    /// aggregate, and reported via `PriceDataUnavailable`.
    pub async fn view_asset(
        &mut self,
        symbol: &str,
    ) -> Result<(AssetRecord, RefreshOutcome), CoreError> {
        let (record, outcome) = match self.assets.refresh(symbol).await {
            Ok(pair) => pair,
            Err(e) => {
                if matches!(e, CoreError::PriceDataUnavailable { .. }) {
                    // the unusable record was removed by the refresh
                    self.notifications.bump_asset_list();
                    self.recompute_net_worth().await?;
                }
                return Err(e);
            }
        };

        if outcome == RefreshOutcome::Refreshed {
            self.recompute_net_worth().await?;
        }
        self.notifications.publish_current_asset(Some(record.clone()));
        Ok((record, outcome))
    }

    /// Clear the current-asset stream (tears down any active chart
    /// view).
    pub fn clear_current_asset(&mut self) {
        self.notifications.publish_current_asset(None);
    }

    /// Refresh every tracked asset tolerantly, then recompute net worth
    /// once. Assets whose refresh fails keep their last-known history;
    /// assets with no usable history at all are dropped.
    pub async fn refresh_all(&mut self) -> Result<(), CoreError> {
        let assets = self.assets.list()?;
        let mut dropped = false;

        for asset in assets {
            match self.assets.refresh(&asset.symbol).await {
                Ok(_) => {}
                Err(CoreError::PriceDataUnavailable { symbol }) => {
                    debug!(symbol = %symbol, "dropped asset without usable history during refresh");
                    dropped = true;
                }
                Err(e) => return Err(e),
            }
        }

        if dropped {
            self.notifications.bump_asset_list();
        }
        self.recompute_net_worth().await?;
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Load a single asset without refreshing it.
    pub fn get_asset(&self, symbol: &str) -> Result<AssetRecord, CoreError> {
        self.assets.get(symbol)
    }

    /// All user-owned assets, sorted by symbol. Synthetic records never
    /// appear here.
    pub fn assets(&self) -> Result<Vec<AssetRecord>, CoreError> {
        self.assets.list()
    }

    /// The most recently published net-worth summary.
    pub fn net_worth(&self) -> NetWorthSummary {
        self.notifications.latest_net_worth()
    }

    /// Force a net-worth recomputation cycle.
    pub async fn recompute_net_worth(&mut self) -> Result<AggregationOutcome, CoreError> {
        self.networth.recompute(&self.notifications).await
    }

    // ── Subscriptions (last-value-cached) ───────────────────────────

    pub fn subscribe_net_worth(&self) -> watch::Receiver<NetWorthSummary> {
        self.notifications.subscribe_net_worth()
    }

    pub fn subscribe_current_asset(&self) -> watch::Receiver<Option<AssetRecord>> {
        self.notifications.subscribe_current_asset()
    }

    pub fn subscribe_asset_list(&self) -> watch::Receiver<u64> {
        self.notifications.subscribe_asset_list()
    }
}
