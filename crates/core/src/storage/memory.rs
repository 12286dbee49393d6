use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::CoreError;
use crate::models::asset::{AssetRecord, Currency};
use crate::models::record::StoredRecord;

use super::{storage_key, RecordStore};

/// In-memory record store.
///
/// Values are held as JSON strings, exactly as a host key-value store
/// would hold them, so every access round-trips through serialization.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, symbol: &str) -> Result<StoredRecord, CoreError> {
        let entries = self.entries.lock().expect("record store lock poisoned");
        let json = entries
            .get(&storage_key(symbol))
            .ok_or_else(|| CoreError::AssetNotFound(symbol.to_uppercase()))?;
        Ok(serde_json::from_str(json)?)
    }

    fn insert(&self, record: &StoredRecord) -> Result<(), CoreError> {
        let key = storage_key(record.symbol());
        let json = serde_json::to_string(record)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;

        let mut entries = self.entries.lock().expect("record store lock poisoned");
        if entries.contains_key(&key) {
            return Err(CoreError::AssetAlreadyExists(record.symbol().to_string()));
        }
        entries.insert(key, json);
        Ok(())
    }

    fn update(&self, record: &StoredRecord) -> Result<(), CoreError> {
        let key = storage_key(record.symbol());
        let json = serde_json::to_string(record)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;

        let mut entries = self.entries.lock().expect("record store lock poisoned");
        if !entries.contains_key(&key) {
            return Err(CoreError::AssetNotFound(record.symbol().to_string()));
        }
        entries.insert(key, json);
        Ok(())
    }

    fn remove(&self, symbol: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.lock().expect("record store lock poisoned");
        entries
            .remove(&storage_key(symbol))
            .map(|_| ())
            .ok_or_else(|| CoreError::AssetNotFound(symbol.to_uppercase()))
    }

    fn list_assets(&self) -> Result<Vec<AssetRecord>, CoreError> {
        let mut entries = self.entries.lock().expect("record store lock poisoned");

        let mut assets = Vec::new();
        let mut backfills = Vec::new();

        for (key, json) in entries.iter() {
            let record: StoredRecord = serde_json::from_str(json)?;
            if let StoredRecord::Asset(mut asset) = record {
                if asset.currency.is_none() {
                    asset.currency = Some(Currency::default());
                    let json = serde_json::to_string(&StoredRecord::Asset(asset.clone()))
                        .map_err(|e| CoreError::Serialization(e.to_string()))?;
                    backfills.push((key.clone(), json));
                }
                assets.push(asset);
            }
        }

        for (key, json) in backfills {
            entries.insert(key, json);
        }

        assets.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(assets)
    }
}
