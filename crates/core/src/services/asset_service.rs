use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::asset::{AssetRecord, AssetType, Currency};
use crate::models::record::{is_reserved_symbol, StoredRecord};
use crate::providers::traits::PriceHistorySource;
use crate::storage::RecordStore;

/// Input for registering a new tracked asset.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub symbol: String,
    pub asset_type: AssetType,
    pub currency: Option<Currency>,
    pub shares: Option<f64>,
    pub average_cost: Option<f64>,
    pub budget: Option<f64>,
}

impl NewAsset {
    /// A watch-only entry; set holdings fields as needed.
    pub fn new(symbol: impl Into<String>, asset_type: AssetType) -> Self {
        Self {
            symbol: symbol.into(),
            asset_type,
            currency: None,
            shares: None,
            average_cost: None,
            budget: None,
        }
    }
}

/// Field edits applied to an existing asset. `None` leaves a field
/// unchanged; the cached history is always preserved.
#[derive(Debug, Clone, Default)]
pub struct AssetEdit {
    pub shares: Option<f64>,
    pub average_cost: Option<f64>,
    pub currency: Option<Currency>,
    pub budget: Option<f64>,
}

/// What a refresh did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The cached history was already fetched today; no request was
    /// made.
    AlreadyFresh,
    /// A fresh history was fetched and persisted.
    Refreshed,
    /// The vendor returned nothing; the last-known history was kept.
    Failed,
}

/// Asset lifecycle operations: create, edit, delete, refresh.
///
/// Store and fetch mechanics only — net-worth recomputation and
/// notification publishing are orchestrated by the facade, and every
/// operation reports its outcome directly to the caller.
pub struct AssetService {
    store: Arc<dyn RecordStore>,
    source: Arc<dyn PriceHistorySource>,
}

impl AssetService {
    pub fn new(store: Arc<dyn RecordStore>, source: Arc<dyn PriceHistorySource>) -> Self {
        Self { store, source }
    }

    /// Register a new asset: verify the symbol is free, fetch its
    /// initial history, and persist. An empty vendor response is a
    /// creation failure — nothing is persisted.
    pub async fn create(&self, new_asset: NewAsset) -> Result<AssetRecord, CoreError> {
        let symbol = new_asset.symbol.trim().to_uppercase();

        if is_reserved_symbol(&symbol) {
            return Err(CoreError::AssetAlreadyExists(symbol));
        }
        match self.store.get(&symbol) {
            Ok(_) => return Err(CoreError::AssetAlreadyExists(symbol)),
            Err(CoreError::AssetNotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let history = self.source.fetch_history(&symbol, new_asset.asset_type).await;
        if history.is_empty() {
            debug!(symbol = %symbol, "initial history fetch returned no points; not persisting");
            return Err(CoreError::PriceDataUnavailable { symbol });
        }

        let record = AssetRecord {
            symbol: symbol.clone(),
            asset_type: new_asset.asset_type,
            currency: Some(new_asset.currency.unwrap_or_default()),
            shares: new_asset.shares,
            average_cost: new_asset.average_cost,
            budget: new_asset.budget,
            history: Some(history),
        };
        self.store.insert(&StoredRecord::Asset(record.clone()))?;
        Ok(record)
    }

    /// Apply field edits to an existing asset, preserving its cached
    /// history. Returns the updated record and whether a
    /// valuation-relevant field (shares, cost basis, currency) changed.
    pub fn edit(&self, symbol: &str, edit: AssetEdit) -> Result<(AssetRecord, bool), CoreError> {
        let mut record = self.get(symbol)?;
        let mut valuation_changed = false;

        if let Some(shares) = edit.shares {
            valuation_changed |= record.shares != Some(shares);
            record.shares = Some(shares);
        }
        if let Some(cost) = edit.average_cost {
            valuation_changed |= record.average_cost != Some(cost);
            record.average_cost = Some(cost);
        }
        if let Some(currency) = edit.currency {
            valuation_changed |= record.currency != Some(currency);
            record.currency = Some(currency);
        }
        if let Some(budget) = edit.budget {
            record.budget = Some(budget);
        }

        self.store.update(&StoredRecord::Asset(record.clone()))?;
        Ok((record, valuation_changed))
    }

    /// Load a user-owned asset. Synthetic records are invisible here:
    /// asking for a reserved symbol reports not-found.
    pub fn get(&self, symbol: &str) -> Result<AssetRecord, CoreError> {
        let symbol = symbol.to_uppercase();
        match self.store.get(&symbol)? {
            StoredRecord::Asset(asset) => Ok(asset),
            StoredRecord::Synthetic(_) => Err(CoreError::AssetNotFound(symbol)),
        }
    }

    /// All user-owned assets, sorted by symbol.
    pub fn list(&self) -> Result<Vec<AssetRecord>, CoreError> {
        self.store.list_assets()
    }

    /// Stop tracking an asset. Synthetic records cannot be removed
    /// through this surface.
    pub fn remove(&self, symbol: &str) -> Result<(), CoreError> {
        let record = self.get(symbol)?;
        self.store.remove(&record.symbol)
    }

    /// Re-fetch a stale asset's history per the once-per-day freshness
    /// rule.
    ///
    /// - Fresh cache → no request, `AlreadyFresh`.
    /// - Non-empty fetch → persisted, `Refreshed`.
    /// - Empty fetch with prior history → last-known history kept,
    ///   `Failed`.
    /// - Empty fetch with no prior history → the record is unusable; it
    ///   is removed and `PriceDataUnavailable` is returned.
    pub async fn refresh(&self, symbol: &str) -> Result<(AssetRecord, RefreshOutcome), CoreError> {
        let mut record = self.get(symbol)?;
        let today = Utc::now().date_naive();

        if !record.needs_refresh(today) {
            debug!(symbol = %record.symbol, "history is fresh; skipping fetch");
            return Ok((record, RefreshOutcome::AlreadyFresh));
        }

        let fetched = self
            .source
            .fetch_history(&record.symbol, record.asset_type)
            .await;

        if fetched.is_empty() {
            if record.history.is_some() {
                warn!(symbol = %record.symbol, "refresh returned no points; keeping last-known history");
                return Ok((record, RefreshOutcome::Failed));
            }
            warn!(symbol = %record.symbol, "no usable history for asset; removing it");
            self.store.remove(&record.symbol)?;
            return Err(CoreError::PriceDataUnavailable {
                symbol: record.symbol,
            });
        }

        record.history = Some(fetched);
        self.store.update(&StoredRecord::Asset(record.clone()))?;
        Ok((record, RefreshOutcome::Refreshed))
    }
}
