use crate::error::Error;
use crate::model::{Category, ScoreRecord};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write ranking CSVs, one file per category, rows sorted descending by
/// score. Returns the paths written.
pub fn export_rankings(records: &[ScoreRecord], out_dir: &Path) -> Result<Vec<PathBuf>, Error> {
    fs::create_dir_all(out_dir)?;

    let mut by_category: BTreeMap<Category, Vec<&ScoreRecord>> = BTreeMap::new();
    for record in records {
        by_category.entry(record.category).or_default().push(record);
    }

    let mut outputs = Vec::new();
    for (category, mut rows) in by_category {
        rows.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.model.cmp(&b.model))
        });

        let path = out_dir.join(format!("rankings_{}.csv", category.as_str()));
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["model", "category", "reviewer", "score"])?;
        for row in rows {
            let score = format!("{:.2}", row.score);
            writer.write_record([
                row.model.as_str(),
                category.as_str(),
                row.source_id.as_str(),
                score.as_str(),
            ])?;
        }
        writer.flush()?;
        info!("Wrote {}", path.display());
        outputs.push(path);
    }

    Ok(outputs)
}
