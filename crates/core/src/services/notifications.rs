use tokio::sync::watch;

use crate::models::asset::AssetRecord;
use crate::models::networth::NetWorthSummary;

/// Last-value-cached notification streams for the presentation layer.
///
/// Each stream is a watch channel: publishing replaces the cached value,
/// and a new subscriber immediately observes the most recent one. The
/// hub is owned by the composition root and handed to whatever publishes
/// on it — there is no ambient global state.
pub struct Notifications {
    current_asset: watch::Sender<Option<AssetRecord>>,
    net_worth: watch::Sender<NetWorthSummary>,
    asset_list: watch::Sender<u64>,
}

impl Notifications {
    pub fn new() -> Self {
        Self {
            current_asset: watch::channel(None).0,
            net_worth: watch::channel(NetWorthSummary::default()).0,
            asset_list: watch::channel(0).0,
        }
    }

    /// The asset currently being viewed, or `None` when no asset view is
    /// active (lets the UI tear charts down).
    pub fn subscribe_current_asset(&self) -> watch::Receiver<Option<AssetRecord>> {
        self.current_asset.subscribe()
    }

    /// The latest published net-worth summary.
    pub fn subscribe_net_worth(&self) -> watch::Receiver<NetWorthSummary> {
        self.net_worth.subscribe()
    }

    /// Monotonic revision, bumped whenever the set of tracked assets
    /// changes.
    pub fn subscribe_asset_list(&self) -> watch::Receiver<u64> {
        self.asset_list.subscribe()
    }

    /// The most recently published net-worth summary, without
    /// subscribing.
    pub fn latest_net_worth(&self) -> NetWorthSummary {
        *self.net_worth.borrow()
    }

    pub(crate) fn publish_current_asset(&self, asset: Option<AssetRecord>) {
        self.current_asset.send_replace(asset);
    }

    pub(crate) fn publish_net_worth(&self, summary: NetWorthSummary) {
        self.net_worth.send_replace(summary);
    }

    pub(crate) fn bump_asset_list(&self) {
        self.asset_list.send_modify(|rev| *rev += 1);
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}
