use serde::{Deserialize, Serialize};
use std::fmt;

/// Device category used for target selection and ranking partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    InEar,
    OverEar,
    Wireless,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::InEar => "in-ear",
            Category::OverEar => "over-ear",
            Category::Wireless => "wireless",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Category> {
        match tag {
            "in-ear" => Some(Category::InEar),
            "over-ear" => Some(Category::OverEar),
            "wireless" => Some(Category::Wireless),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One device extracted from a source's catalog document.
///
/// Ephemeral — rebuilt from the live document on every run. `measurement_id`
/// is the opaque key used to fetch the raw FR text for this device.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub source_id: String,
    pub brand: Option<String>,
    pub model: String,
    pub display_name: String,
    pub measurement_id: String,
    pub category_hint: Option<Category>,
}

/// Static metadata describing the acoustic coupler a source measures on.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RigProfile {
    pub rig_id: String,
    pub pinna_type: String,
}

impl Default for RigProfile {
    fn default() -> Self {
        RigProfile {
            rig_id: "711".to_string(),
            pinna_type: "standard".to_string(),
        }
    }
}

/// Final per-device ranking row.
#[derive(Debug, Clone)]
pub struct ScoreRecord {
    pub source_id: String,
    pub model: String,
    pub category: Category,
    pub rig_id: String,
    pub score: f64,
}

/// One entry in the persisted new-finds feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFind {
    pub reviewer: String,
    pub item: String,
    pub date: String,
    pub link: String,
}
