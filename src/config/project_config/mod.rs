//! Project-level configuration support
//!
//! Loads per-project configuration from `govcheck.toml` or `.govcheckrc.json`
//! in the working directory.
//!
//! # Configuration Format
//!
//! ```toml
//! # govcheck.toml
//!
//! [scoring]
//! min_score = 0.6
//! normalize_weights = false
//!
//! [history]
//! enabled = true
//! path = "compliance_history.redb"
//!
//! [taxonomy]
//! file = "rules.toml"
//!
//! [defaults]
//! format = "markdown"
//! ```

use super::{load_taxonomy, ConfigError, TaxonomyConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Overall score a document needs to be compliant unless overridden
pub const DEFAULT_MIN_SCORE: f64 = 0.6;

/// Project-level configuration loaded from govcheck.toml or similar
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub taxonomy: TaxonomySource,

    #[serde(default)]
    pub defaults: CliDefaults,

    /// Directory the config was loaded from; relative paths resolve against it
    #[serde(skip)]
    root: Option<PathBuf>,
}

/// Scoring configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Compliance threshold on the overall score (default: 0.6)
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Divide the overall score by the sum of category weights (default: false)
    #[serde(default)]
    pub normalize_weights: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            normalize_weights: false,
        }
    }
}

fn default_min_score() -> f64 {
    DEFAULT_MIN_SCORE
}

/// History persistence settings
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Record every scoring call (default: true)
    #[serde(default = "default_history_enabled")]
    pub enabled: bool,

    /// Database file (default: user data dir)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_history_enabled(),
            path: None,
        }
    }
}

fn default_history_enabled() -> bool {
    true
}

/// Where the taxonomy comes from
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TaxonomySource {
    /// Rules file; the built-in standard taxonomy when unset
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliDefaults {
    /// Report format when it cannot be inferred from the output path
    #[serde(default)]
    pub format: Option<String>,
}

/// Load project configuration from a directory.
///
/// Searches for configuration files in this order:
/// 1. `govcheck.toml`
/// 2. `.govcheckrc.json`
///
/// Returns default configuration if no config file is found or a discovered
/// file cannot be parsed.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    for name in ["govcheck.toml", ".govcheckrc.json"] {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        match load_config_file(&path) {
            Ok(config) => {
                debug!("Loaded project config from {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

/// Load a specific configuration file; errors are returned, not swallowed.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let mut config: ProjectConfig = match ext {
        "toml" => toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?,
        "json" => serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    let min_score = config.scoring.min_score;
    if !min_score.is_finite() || min_score < 0.0 {
        return Err(ConfigError::InvalidMinScore(min_score));
    }

    config.root = path.parent().map(Path::to_path_buf);
    Ok(config)
}

impl ProjectConfig {
    /// Resolve a possibly relative path against the config file's directory
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Taxonomy declared by this config (rules file or the standard set)
    pub fn taxonomy_config(&self) -> Result<TaxonomyConfig, ConfigError> {
        match &self.taxonomy.file {
            Some(file) => load_taxonomy(&self.resolve_path(file)),
            None => Ok(TaxonomyConfig::standard()),
        }
    }

    /// History database path from config, if any
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history.path.as_deref().map(|p| self.resolve_path(p))
    }
}
