use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;
use crate::models::asset::{AssetRecord, Currency};
use crate::models::record::StoredRecord;

use super::{RecordStore, STORAGE_PREFIX};

/// Record store backed by one JSON file per record.
///
/// Layout: `{base}/{STORAGE_PREFIX}/{SYMBOL}.json`. File existence is
/// the key-presence check, which is atomic enough for the single-user,
/// single-actor model this library assumes.
pub struct JsonFileStore {
    base_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn records_dir(&self) -> PathBuf {
        self.base_path.join(STORAGE_PREFIX)
    }

    fn record_file(&self, symbol: &str) -> PathBuf {
        self.records_dir()
            .join(format!("{}.json", symbol.to_uppercase()))
    }

    fn read_record(&self, path: &Path) -> Result<StoredRecord, CoreError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn write_record(&self, record: &StoredRecord) -> Result<(), CoreError> {
        fs::create_dir_all(self.records_dir())?;
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        fs::write(self.record_file(record.symbol()), json)?;
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn get(&self, symbol: &str) -> Result<StoredRecord, CoreError> {
        let path = self.record_file(symbol);
        if !path.exists() {
            return Err(CoreError::AssetNotFound(symbol.to_uppercase()));
        }
        self.read_record(&path)
    }

    fn insert(&self, record: &StoredRecord) -> Result<(), CoreError> {
        if self.record_file(record.symbol()).exists() {
            return Err(CoreError::AssetAlreadyExists(record.symbol().to_string()));
        }
        self.write_record(record)
    }

    fn update(&self, record: &StoredRecord) -> Result<(), CoreError> {
        if !self.record_file(record.symbol()).exists() {
            return Err(CoreError::AssetNotFound(record.symbol().to_string()));
        }
        self.write_record(record)
    }

    fn remove(&self, symbol: &str) -> Result<(), CoreError> {
        let path = self.record_file(symbol);
        if !path.exists() {
            return Err(CoreError::AssetNotFound(symbol.to_uppercase()));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    fn list_assets(&self) -> Result<Vec<AssetRecord>, CoreError> {
        let dir = self.records_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut assets = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            let record = self.read_record(&path)?;
            if let StoredRecord::Asset(mut asset) = record {
                if asset.currency.is_none() {
                    asset.currency = Some(Currency::default());
                    self.write_record(&StoredRecord::Asset(asset.clone()))?;
                }
                assets.push(asset);
            }
        }

        assets.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(assets)
    }
}
