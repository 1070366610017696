/// Trait for reporting pipeline progress.
///
/// CLI implements with indicatif; tests use the no-op reporter. All methods
/// have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_fetch_start(&self, _total_sources: usize) {}
    fn on_source_complete(&self, _source_id: &str, _entries: usize) {}
    fn on_source_failed(&self, _source_id: &str) {}
    fn on_sync_complete(&self, _new_finds: usize, _duration_secs: f64) {}
    fn on_rank_start(&self, _total_items: usize) {}
    fn on_item_scored(&self, _scored: usize, _total_items: usize) {}
    fn on_rank_complete(&self, _ranked: usize, _skipped: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
