use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::asset::{AssetRecord, AssetType, Currency};
use crate::models::networth::{AggregationOutcome, NetWorthSummary, SkipReason};
use crate::models::record::{StoredRecord, SyntheticSeries, FX_SYMBOL, NET_WORTH_SYMBOL};
use crate::models::series::{PricePoint, PriceSeries};
use crate::providers::traits::PriceHistorySource;
use crate::services::notifications::Notifications;
use crate::storage::RecordStore;

/// Merges per-asset price histories into one consistent valuation of the
/// whole portfolio: aggregate book value, aggregate market value, and a
/// market-value time series restricted to dates every eligible asset has
/// data for. The merged series is persisted as the `NETWORTH` record and
/// the summary is published to subscribers.
///
/// Currency bridging uses the `CADUSD` conversion series reduced to its
/// single most recent rate. Applying that one scalar to every historical
/// date is an approximation, carried deliberately: the raw FX series has
/// daily granularity, but per-date conversion is not what this engine
/// does.
pub struct NetWorthService {
    store: Arc<dyn RecordStore>,
    source: Arc<dyn PriceHistorySource>,
}

/// Per-date aggregation state: how many eligible assets have a point on
/// the date, and the summed USD market value across them.
#[derive(Default)]
struct DateAccumulator {
    covered: usize,
    value: f64,
}

impl NetWorthService {
    pub fn new(store: Arc<dyn RecordStore>, source: Arc<dyn PriceHistorySource>) -> Self {
        Self { store, source }
    }

    /// Recompute the portfolio net worth, persist it, and publish it.
    ///
    /// A skipped cycle leaves the stored `NETWORTH` record and the last
    /// published summary untouched — net worth degrades silently rather
    /// than erroring, and is never retracted.
    pub async fn recompute(
        &self,
        notifications: &Notifications,
    ) -> Result<AggregationOutcome, CoreError> {
        let today = Utc::now().date_naive();

        let fx_series = self.fresh_fx_series(today).await?;
        let Some(fx) = fx_series.latest().map(|p| p.value) else {
            warn!("FX conversion series is empty; keeping previous net worth");
            return Ok(AggregationOutcome::Skipped(SkipReason::FxUnavailable));
        };

        let assets = self.store.list_assets()?;
        if assets.is_empty() {
            match self.store.remove(NET_WORTH_SYMBOL) {
                Ok(()) | Err(CoreError::AssetNotFound(_)) => {}
                Err(e) => return Err(e),
            }
            notifications.publish_net_worth(NetWorthSummary::default());
            debug!("no assets tracked; net worth reset to zero");
            return Ok(AggregationOutcome::Reset);
        }

        let eligible: Vec<&AssetRecord> = assets.iter().filter(|a| a.is_eligible()).collect();

        let book_value: f64 = eligible
            .iter()
            .map(|a| {
                to_usd(
                    a.shares.unwrap_or(0.0) * a.average_cost.unwrap_or(0.0),
                    a.currency_or_default(),
                    fx,
                )
            })
            .sum();

        // One pass over every eligible asset's history: count coverage
        // per date and accumulate the USD market value sum for the date.
        let mut merged: BTreeMap<NaiveDate, DateAccumulator> = BTreeMap::new();
        for asset in &eligible {
            let shares = asset.shares.unwrap_or(0.0);
            let currency = asset.currency_or_default();
            if let Some(history) = &asset.history {
                for point in &history.data_points {
                    let entry = merged.entry(point.date).or_default();
                    entry.covered += 1;
                    entry.value += to_usd(shares * point.value, currency, fx);
                }
            }
        }

        // Strict intersection: a date survives only when every eligible
        // asset has a price for it, so the series never represents a
        // partial basket. BTreeMap iteration keeps the result ascending.
        let data_points: Vec<PricePoint> = merged
            .into_iter()
            .filter(|(_, acc)| acc.covered == eligible.len())
            .map(|(date, acc)| PricePoint {
                date,
                value: acc.value,
            })
            .collect();

        // Current market value is read off the latest COMMON date, not
        // each asset's own latest date, guarding against coverage skew.
        let Some(market_value) = data_points.last().map(|p| p.value) else {
            warn!(
                eligible = eligible.len(),
                "no date is covered by every eligible asset; keeping previous net worth"
            );
            return Ok(AggregationOutcome::Skipped(SkipReason::NoCommonDates));
        };

        let summary = NetWorthSummary {
            book_value,
            market_value,
        };

        self.upsert(StoredRecord::Synthetic(SyntheticSeries {
            symbol: NET_WORTH_SYMBOL.to_string(),
            book_value: Some(summary.book_value),
            market_value: Some(summary.market_value),
            history: PriceSeries {
                data_points,
                last_updated: today,
            },
        }))?;

        notifications.publish_net_worth(summary);
        debug!(
            book_value = summary.book_value,
            market_value = summary.market_value,
            "net worth updated"
        );
        Ok(AggregationOutcome::Updated(summary))
    }

    /// The CAD→USD series per the once-per-day freshness rule: reuse a
    /// series fetched today, otherwise fetch and persist one. An empty
    /// fetch is persisted too — the stamp defers the retry to the next
    /// calendar day, and the empty series makes the caller skip.
    async fn fresh_fx_series(&self, today: NaiveDate) -> Result<PriceSeries, CoreError> {
        match self.store.get(FX_SYMBOL) {
            Ok(StoredRecord::Synthetic(s)) if s.history.is_fresh(today) => return Ok(s.history),
            Ok(_) | Err(CoreError::AssetNotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let history = self.source.fetch_history(FX_SYMBOL, AssetType::Stock).await;
        self.upsert(StoredRecord::Synthetic(SyntheticSeries::series(
            FX_SYMBOL,
            history.clone(),
        )))?;
        Ok(history)
    }

    /// Update-if-exists-else-create for engine-owned records.
    fn upsert(&self, record: StoredRecord) -> Result<(), CoreError> {
        match self.store.update(&record) {
            Err(CoreError::AssetNotFound(_)) => self.store.insert(&record),
            other => other,
        }
    }
}

/// Convert an amount in `currency` to USD using the latest CAD↔USD
/// conversion rate.
fn to_usd(amount: f64, currency: Currency, fx: f64) -> f64 {
    match currency {
        Currency::Usd => amount,
        Currency::Cad => amount / fx,
    }
}
