use crate::config::SourceConfig;
use crate::model::{CatalogEntry, Category, NewFind};
use crate::storage::CatalogStore;
use chrono::Local;
use serde::Deserialize;
use std::collections::HashSet;

/// Which string identifies a device for deduplication.
///
/// `DisplayName` treats the same model measured on two rigs as one item;
/// `ShareLink` keys on the constructed deep link, so distinct measurement
/// files stay distinct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityPolicy {
    #[default]
    DisplayName,
    ShareLink,
}

const WIRELESS_TOKENS: &[&str] = &["tws", "anc", "buds", "earbuds", "wireless", "airpods"];
const OVER_EAR_TOKENS: &[&str] = &["headphone", "headphones"];
const OVER_EAR_PHRASES: &[&str] = &["over-ear", "on-ear", "open-back", "closed-back"];

/// Tag a device as in-ear, over-ear, or wireless from its name.
///
/// Wireless keywords win over over-ear keywords so ANC wireless headsets do
/// not get misfiled under over-ear. Everything unmatched is in-ear — the
/// overwhelming default across these catalogs.
pub fn classify(entry: &CatalogEntry) -> Category {
    if let Some(hint) = entry.category_hint {
        return hint;
    }

    let name = entry.display_name.to_lowercase();
    let tokens: Vec<&str> = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    if WIRELESS_TOKENS.iter().any(|kw| tokens.contains(kw)) || name.contains("true wireless") {
        return Category::Wireless;
    }
    if OVER_EAR_TOKENS.iter().any(|kw| tokens.contains(kw))
        || OVER_EAR_PHRASES.iter().any(|kw| name.contains(kw))
    {
        return Category::OverEar;
    }
    Category::InEar
}

/// Deep link that opens the device's graph on the source site.
pub fn share_link(base_url: &str, measurement_id: &str) -> String {
    format!(
        "{}/?share={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(measurement_id)
    )
}

pub fn identity_key(policy: IdentityPolicy, entry: &CatalogEntry, base_url: &str) -> String {
    match policy {
        IdentityPolicy::DisplayName => entry.display_name.clone(),
        IdentityPolicy::ShareLink => share_link(base_url, &entry.measurement_id),
    }
}

/// Encode the category tag as a suffix on the stored identity string.
/// Pre-existing catalogs hold bare names; `split_stored` accepts both forms.
pub fn encode_stored(key: &str, category: Category) -> String {
    format!("{} [{}]", key, category.as_str())
}

/// Split a stored string into its bare identity key and category tag, if the
/// trailing bracket holds a recognized tag.
pub fn split_stored(stored: &str) -> (&str, Option<Category>) {
    if let Some(open) = stored.rfind(" [") {
        if let Some(tag) = stored[open + 2..].strip_suffix(']') {
            if let Some(category) = Category::from_tag(tag) {
                return (&stored[..open], Some(category));
            }
        }
    }
    (stored, None)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Merge a source's freshly normalized entries into the persisted catalog.
///
/// Appends unseen identity keys in discovery order and returns one `NewFind`
/// per genuinely new item. Idempotent: ingesting the same entries against the
/// catalog they produced yields nothing.
pub fn ingest(
    entries: &[CatalogEntry],
    source: &SourceConfig,
    policy: IdentityPolicy,
    catalog: &mut CatalogStore,
) -> Vec<NewFind> {
    let mut known: HashSet<String> = catalog
        .keys(&source.id)
        .iter()
        .map(|stored| split_stored(stored).0.to_string())
        .collect();

    let mut new_finds = Vec::new();

    for entry in entries {
        let key = identity_key(policy, entry, &source.base_url);
        if key.is_empty() || known.contains(&key) {
            continue;
        }

        let category = classify(entry);
        catalog.push(&source.id, encode_stored(&key, category));
        known.insert(key);

        new_finds.push(NewFind {
            reviewer: capitalize(&source.id),
            item: entry.display_name.clone(),
            date: Local::now().format("%b %d, %H:%M").to_string(),
            link: share_link(&source.base_url, &entry.measurement_id),
        });
    }

    new_finds
}
