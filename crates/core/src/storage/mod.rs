pub mod json_file;
pub mod memory;

use crate::errors::CoreError;
use crate::models::asset::AssetRecord;
use crate::models::record::StoredRecord;

/// Namespace prefix for record keys in the host key-value store.
pub const STORAGE_PREFIX: &str = "portfolio-tracker";

/// Full storage key for a symbol: `{STORAGE_PREFIX}/{SYMBOL}`.
pub fn storage_key(symbol: &str) -> String {
    format!("{STORAGE_PREFIX}/{}", symbol.to_uppercase())
}

/// Key-value persistence of one JSON-serialized record per symbol.
///
/// Creation and update are distinct operations with distinct failure
/// modes: `insert` refuses an existing key, `update` refuses a missing
/// one. The store only synchronizes itself enough to be `Send + Sync`;
/// it offers no cross-call atomicity (single-user, single-actor model).
pub trait RecordStore: Send + Sync {
    /// Load the record stored under `symbol`.
    /// Fails with `AssetNotFound` when absent.
    fn get(&self, symbol: &str) -> Result<StoredRecord, CoreError>;

    /// Store a new record.
    /// Fails with `AssetAlreadyExists` when the symbol is taken.
    fn insert(&self, record: &StoredRecord) -> Result<(), CoreError>;

    /// Overwrite an existing record.
    /// Fails with `AssetNotFound` when the symbol has no record.
    fn update(&self, record: &StoredRecord) -> Result<(), CoreError>;

    /// Delete the record stored under `symbol`.
    /// Fails with `AssetNotFound` when absent.
    fn remove(&self, symbol: &str) -> Result<(), CoreError>;

    /// All user-owned asset records, sorted by symbol. Synthetic records
    /// are excluded by construction. Legacy records missing a currency
    /// are backfilled to USD and persisted on the way out (a one-time
    /// migration-on-read).
    fn list_assets(&self) -> Result<Vec<AssetRecord>, CoreError>;
}
