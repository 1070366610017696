use crate::config::{self, AppConfig, SourceConfig};
use crate::error::Error;
use crate::fetch::{self, Fetcher};
use crate::identity;
use crate::model::{CatalogEntry, NewFind, RigProfile, ScoreRecord};
use crate::progress::ProgressReporter;
use crate::storage::{CatalogStore, HistoryStore};
use crate::{curve, export, score, target};
use chrono::Utc;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct Engine {
    config: AppConfig,
}

#[derive(Debug)]
pub struct SyncReport {
    pub fetch_duration: Duration,
    pub ingest_duration: Duration,
    pub sources_checked: usize,
    pub sources_failed: usize,
    pub new_finds: usize,
}

#[derive(Debug)]
pub struct RankReport {
    pub fetch_duration: Duration,
    pub score_duration: Duration,
    pub items_ranked: usize,
    pub items_skipped: usize,
    pub outputs: Vec<PathBuf>,
}

impl Engine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn worker_pool(&self) -> Result<rayon::ThreadPool, Error> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.fetch_workers.max(1))
            .build()
            .map_err(|e| Error::Other(e.to_string()))
    }

    /// Fetch and normalize one source's catalog document.
    fn fetch_entries(
        &self,
        fetcher: &dyn Fetcher,
        source: &SourceConfig,
    ) -> Result<Vec<CatalogEntry>, Error> {
        let url = fetch::phone_book_url(&source.base_url);
        let bytes = fetcher.fetch(&url)?;
        let document: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|_| Error::MalformedCatalog)?;
        crate::schema::normalize(&document, &source.id)
    }

    /// Check every configured source for newly published measurements.
    ///
    /// Source fetches fan out over a bounded worker pool; all catalog and
    /// history mutation happens sequentially afterwards on this thread, so
    /// the stores have a single writer by construction. A failing source is
    /// skipped, never fatal to the batch.
    pub fn sync(
        &self,
        fetcher: &dyn Fetcher,
        reporter: &dyn ProgressReporter,
    ) -> Result<SyncReport, Error> {
        let sources = config::distinct_sources(self.config.sources.clone());
        info!("Checking {} sources...", sources.len());
        reporter.on_fetch_start(sources.len());

        let fetch_start = Instant::now();
        let pool = self.worker_pool()?;
        let results: Vec<(&SourceConfig, Result<Vec<CatalogEntry>, Error>)> =
            pool.install(|| {
                sources
                    .par_iter()
                    .map(|source| {
                        let result = self.fetch_entries(fetcher, source);
                        match &result {
                            Ok(entries) => reporter.on_source_complete(&source.id, entries.len()),
                            Err(_) => reporter.on_source_failed(&source.id),
                        }
                        (source, result)
                    })
                    .collect()
            });
        let fetch_duration = fetch_start.elapsed();

        let ingest_start = Instant::now();
        let mut catalog = CatalogStore::load(Path::new(&self.config.catalog_path))?;
        let mut all_finds: Vec<NewFind> = Vec::new();
        let mut sources_failed = 0usize;

        for (source, result) in results {
            match result {
                Ok(entries) => {
                    let finds = identity::ingest(
                        &entries,
                        source,
                        self.config.identity_policy,
                        &mut catalog,
                    );
                    if !finds.is_empty() {
                        debug!("{}: {} new items", source.id, finds.len());
                    }
                    all_finds.extend(finds);
                }
                Err(err) => {
                    warn!("Skipping {}: {}", source.id, err);
                    sources_failed += 1;
                }
            }
        }

        // last_sync records the last *successful* synchronization; a run
        // where every source was unreachable leaves the store untouched.
        let sources_checked = sources.len() - sources_failed;
        if sources_checked > 0 {
            catalog.set_last_sync(Utc::now().to_rfc3339());
            catalog.save(Path::new(&self.config.catalog_path))?;
        }

        if !all_finds.is_empty() {
            let mut history = HistoryStore::load(Path::new(&self.config.history_path))?;
            history.prepend(all_finds.clone(), self.config.history_cap);
            history.save(Path::new(&self.config.history_path))?;
            info!("Found {} new items", all_finds.len());
        }

        let ingest_duration = ingest_start.elapsed();
        reporter.on_sync_complete(all_finds.len(), ingest_duration.as_secs_f64());

        Ok(SyncReport {
            fetch_duration,
            ingest_duration,
            sources_checked,
            sources_failed,
            new_finds: all_finds.len(),
        })
    }

    /// Score every device currently published by the configured sources and
    /// export per-category ranking CSVs.
    ///
    /// Items move through standardize → compensate → score independently and
    /// fail closed: a malformed measurement or dead link skips that item and
    /// the batch continues.
    pub fn rank(
        &self,
        fetcher: &dyn Fetcher,
        reporter: &dyn ProgressReporter,
    ) -> Result<RankReport, Error> {
        let sources = config::distinct_sources(self.config.sources.clone());
        reporter.on_fetch_start(sources.len());

        let fetch_start = Instant::now();
        let pool = self.worker_pool()?;
        let documents: Vec<(&SourceConfig, Result<Vec<CatalogEntry>, Error>)> =
            pool.install(|| {
                sources
                    .par_iter()
                    .map(|source| {
                        let result = self.fetch_entries(fetcher, source);
                        match &result {
                            Ok(entries) => reporter.on_source_complete(&source.id, entries.len()),
                            Err(_) => reporter.on_source_failed(&source.id),
                        }
                        (source, result)
                    })
                    .collect()
            });
        let fetch_duration = fetch_start.elapsed();

        // Flatten to unique items, first occurrence wins.
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut items: Vec<(&SourceConfig, RigProfile, CatalogEntry)> = Vec::new();
        for (source, result) in documents {
            let entries = match result {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("Skipping {}: {}", source.id, err);
                    continue;
                }
            };
            let rig = source
                .rig
                .clone()
                .unwrap_or_else(|| target::builtin_rig(&source.id));
            for entry in entries {
                let key = identity::identity_key(
                    self.config.identity_policy,
                    &entry,
                    &source.base_url,
                );
                if seen.insert((source.id.clone(), key)) {
                    items.push((source, rig.clone(), entry));
                }
            }
        }

        let total_items = items.len();
        info!("Ranking {} items...", total_items);
        reporter.on_rank_start(total_items);

        let score_start = Instant::now();
        let grid = curve::log_grid(self.config.grid_points);
        let selector = target::TargetSelector::new(&grid)?;
        let progress = AtomicUsize::new(0);

        let records: Vec<ScoreRecord> = pool.install(|| {
            items
                .par_iter()
                .filter_map(|(source, rig, entry)| {
                    let record = self.score_item(fetcher, &grid, &selector, source, rig, entry);
                    let done = progress.fetch_add(1, Ordering::Relaxed) + 1;
                    reporter.on_item_scored(done, total_items);
                    record
                })
                .collect()
        });

        let items_ranked = records.len();
        let items_skipped = total_items - items_ranked;

        let outputs = export::export_rankings(&records, Path::new(&self.config.rankings_dir))?;
        let score_duration = score_start.elapsed();
        reporter.on_rank_complete(items_ranked, items_skipped, score_duration.as_secs_f64());

        Ok(RankReport {
            fetch_duration,
            score_duration,
            items_ranked,
            items_skipped,
            outputs,
        })
    }

    fn score_item(
        &self,
        fetcher: &dyn Fetcher,
        grid: &[f64],
        selector: &target::TargetSelector,
        source: &SourceConfig,
        rig: &RigProfile,
        entry: &CatalogEntry,
    ) -> Option<ScoreRecord> {
        let url = fetch::measurement_url(&source.base_url, &entry.measurement_id);
        let bytes = match fetcher.fetch(&url) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!("Skipping {}: {}", entry.display_name, err);
                return None;
            }
        };
        let text = String::from_utf8_lossy(&bytes);
        let standardized = match curve::parse_measurement(&text)
            .and_then(|points| curve::standardize(&points, grid))
        {
            Ok(curve) => curve,
            Err(err) => {
                debug!("Skipping {}: {}", entry.display_name, err);
                return None;
            }
        };

        let category = identity::classify(entry);
        let (adjusted, target_curve) = selector.select(&standardized, category, rig);
        let value = score::preference_score(&adjusted, target_curve, grid);

        Some(ScoreRecord {
            source_id: source.id.clone(),
            model: entry.display_name.clone(),
            category,
            rig_id: rig.rig_id.clone(),
            score: value,
        })
    }
}
