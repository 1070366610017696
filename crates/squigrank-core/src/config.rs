use crate::identity::IdentityPolicy;
use crate::model::RigProfile;
use config::{Config, ConfigError, File as ConfigFile};
use serde::Deserialize;

/// Squig.link subdomains checked when no sources are configured explicitly.
const DEFAULT_SUBDOMAINS: &[&str] = &[
    "crinacle", "superreview", "hbb", "precog", "timmyv",
    "namedkenn", "rg", "wolfhawk", "akros", "paulwasabii",
    "vortex", "teds", "banbeucmas", "jaytiss", "tonedeafmonk",
    "aftersound", "hypethewiev", "tks", "venerable", "regancipher",
    "den-fi", "kr0mka", "marcelo", "nick", "rohit", "shuji",
];

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub id: String,
    pub base_url: String,
    /// Optional rig override; otherwise the built-in table (or the 711
    /// default) applies.
    #[serde(default)]
    pub rig: Option<RigProfile>,
}

impl SourceConfig {
    pub fn squig(subdomain: &str) -> Self {
        SourceConfig {
            id: subdomain.to_string(),
            base_url: format!("https://{subdomain}.squig.link"),
            rig: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sources: Vec<SourceConfig>,
    pub identity_policy: IdentityPolicy,
    pub grid_points: usize,
    pub fetch_workers: usize,
    pub history_cap: usize,
    pub fetch_timeout_secs: u64,
    pub catalog_path: String,
    pub history_path: String,
    pub rankings_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            sources: Vec::new(),
            identity_policy: IdentityPolicy::DisplayName,
            grid_points: 500,
            fetch_workers: 8,
            history_cap: 200,
            fetch_timeout_secs: 10,
            catalog_path: "database.json".to_string(),
            history_path: "history.json".to_string(),
            rankings_dir: "rankings".to_string(),
        }
    }
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .build()?;
    let mut cfg = builder.try_deserialize::<AppConfig>()?;
    if cfg.sources.is_empty() {
        cfg.sources = DEFAULT_SUBDOMAINS
            .iter()
            .map(|sub| SourceConfig::squig(sub))
            .collect();
    }
    Ok(cfg)
}

/// Remove sources that repeat an earlier source's id, keeping first-seen order.
pub fn distinct_sources(sources: Vec<SourceConfig>) -> Vec<SourceConfig> {
    let mut seen: Vec<String> = Vec::new();
    let mut result: Vec<SourceConfig> = Vec::new();

    for source in sources {
        if seen.iter().any(|id| id == &source.id) {
            continue;
        }
        seen.push(source.id.clone());
        result.push(source);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.grid_points, 500);
        assert_eq!(cfg.fetch_workers, 8);
        assert_eq!(cfg.history_cap, 200);
        assert_eq!(cfg.catalog_path, "database.json");
    }

    #[test]
    fn test_distinct_sources_keeps_first() {
        let sources = vec![
            SourceConfig::squig("crinacle"),
            SourceConfig {
                id: "crinacle".to_string(),
                base_url: "https://other.example".to_string(),
                rig: None,
            },
            SourceConfig::squig("precog"),
        ];
        let result = distinct_sources(sources);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "crinacle");
        assert_eq!(result[0].base_url, "https://crinacle.squig.link");
        assert_eq!(result[1].id, "precog");
    }

    #[test]
    fn test_squig_source_url() {
        let source = SourceConfig::squig("den-fi");
        assert_eq!(source.base_url, "https://den-fi.squig.link");
    }
}
