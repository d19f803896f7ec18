//! Configuration module for govcheck
//!
//! This module handles:
//! - Declarative compliance taxonomies (built-in standard set and rule files)
//! - Project-level configuration (govcheck.toml)
//! - Scoring and history defaults for the CLI

mod project_config;
mod taxonomy;

pub use project_config::{
    load_config_file, load_project_config, CliDefaults, HistoryConfig, ProjectConfig,
    ScoringConfig, TaxonomySource, DEFAULT_MIN_SCORE,
};
pub use taxonomy::{
    load_taxonomy, parse_taxonomy, CategoryConfig, PatternConfig, TaxonomyConfig,
    DEFAULT_REQUIRED_SCORE,
};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
///
/// Taxonomy errors surface before any document is scored.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid pattern '{pattern}' ({description}) in category '{category}': {source}")]
    InvalidPattern {
        category: String,
        description: String,
        pattern: String,
        source: regex::Error,
    },

    #[error(
        "pattern '{description}' in category '{category}' has weight {weight}; weights must be in (0, 1]"
    )]
    InvalidWeight {
        category: String,
        description: String,
        weight: f64,
    },

    #[error("category '{category}' has weight {weight}; category weights must be finite and >= 0")]
    InvalidCategoryWeight { category: String, weight: f64 },

    #[error("category '{category}' has required score {required_score}; must be within [0, 1]")]
    InvalidRequiredScore {
        category: String,
        required_score: f64,
    },

    #[error("min_score {0} is invalid; must be a finite number >= 0")]
    InvalidMinScore(f64),

    #[error("duplicate category name '{0}'")]
    DuplicateCategory(String),

    #[error("category names must not be empty")]
    EmptyCategoryName,

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("unsupported config format for {}: expected .toml or .json", .0.display())]
    UnsupportedFormat(PathBuf),
}
