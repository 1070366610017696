use crate::error::Error;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reserved key in the persisted file carrying the last successful sync
/// timestamp. Never a source id.
pub const LAST_SYNC_KEY: &str = "last_sync";

/// Persisted catalog: source id → ordered list of known identity strings.
///
/// List order is discovery order; the file is rewritten in full on save. The
/// on-disk form is a single JSON object, with `last_sync` stored as a string
/// field alongside the source arrays.
#[derive(Debug, Default)]
pub struct CatalogStore {
    sources: BTreeMap<String, Vec<String>>,
    last_sync: Option<String>,
}

impl CatalogStore {
    /// Load from `path`; a missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            debug!("No catalog at {}, starting empty", path.display());
            return Ok(CatalogStore::default());
        }
        let text = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&text)?;
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Result<Self, Error> {
        let Value::Object(map) = value else {
            return Err(Error::MalformedCatalog);
        };

        let mut store = CatalogStore::default();
        for (key, value) in map {
            if key == LAST_SYNC_KEY {
                store.last_sync = value.as_str().map(|s| s.to_string());
                continue;
            }
            // A non-array source value means the file is corrupt; loading it
            // as empty would re-announce every known item on the next sync.
            let Value::Array(items) = value else {
                return Err(Error::MalformedCatalog);
            };
            let items = items
                .into_iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect();
            store.sources.insert(key, items);
        }
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let mut map = Map::new();
        for (source_id, items) in &self.sources {
            map.insert(
                source_id.clone(),
                Value::Array(items.iter().map(|s| Value::String(s.clone())).collect()),
            );
        }
        if let Some(ts) = &self.last_sync {
            map.insert(LAST_SYNC_KEY.to_string(), Value::String(ts.clone()));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(&Value::Object(map))?;
        fs::write(path, text)?;
        debug!("Catalog saved to {}", path.display());
        Ok(())
    }

    /// Known identity strings for a source, in discovery order.
    pub fn keys(&self, source_id: &str) -> &[String] {
        self.sources.get(source_id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn push(&mut self, source_id: &str, stored: String) {
        self.sources.entry(source_id.to_string()).or_default().push(stored);
    }

    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(|s| s.as_str())
    }

    pub fn total_items(&self) -> usize {
        self.sources.values().map(|v| v.len()).sum()
    }

    pub fn last_sync(&self) -> Option<&str> {
        self.last_sync.as_deref()
    }

    pub fn set_last_sync(&mut self, timestamp: String) {
        self.last_sync = Some(timestamp);
    }
}
