use crate::error::Error;
use crate::model::NewFind;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Persisted feed of new finds, newest first. Append-only in memory, written
/// back in full, truncated to a bounded retention window on prepend.
#[derive(Debug, Default)]
pub struct HistoryStore {
    entries: Vec<NewFind>,
}

impl HistoryStore {
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Ok(HistoryStore::default());
        }
        let text = fs::read_to_string(path)?;
        let entries: Vec<NewFind> = serde_json::from_str(&text)?;
        Ok(HistoryStore { entries })
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, text)?;
        debug!("History saved to {} ({} entries)", path.display(), self.entries.len());
        Ok(())
    }

    /// Insert finds ahead of existing entries and enforce the retention cap.
    pub fn prepend(&mut self, finds: Vec<NewFind>, cap: usize) {
        let mut updated = finds;
        updated.append(&mut self.entries);
        updated.truncate(cap);
        self.entries = updated;
    }

    pub fn entries(&self) -> &[NewFind] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
