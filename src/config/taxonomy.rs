//! Declarative compliance taxonomies
//!
//! A taxonomy is data, not code. It is declared in a `.toml` or `.json` rules
//! file (or built in Rust) and compiled into an immutable
//! [`Taxonomy`](crate::scoring::Taxonomy) before scoring.
//!
//! # Rules file format
//!
//! ```toml
//! # rules.toml
//! extends_standard = true   # append to the built-in categories
//!
//! [[categories]]
//! name = "Data Protection"
//! required_score = 0.6
//! weight = 0.3
//!
//! [[categories.patterns]]
//! pattern = 'GDPR\s+compliance'
//! weight = 0.4
//! description = "GDPR Compliance"
//! ```

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Required score used when a category omits one
pub const DEFAULT_REQUIRED_SCORE: f64 = 0.5;

fn default_required_score() -> f64 {
    DEFAULT_REQUIRED_SCORE
}

/// A weighted regular expression inside a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Regular expression, matched case-insensitively and unanchored
    pub pattern: String,
    /// Contribution when the pattern matches at least once, in (0, 1]
    pub weight: f64,
    /// Human description; also names proximity pairs
    pub description: String,
}

impl PatternConfig {
    pub fn new(pattern: impl Into<String>, weight: f64, description: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            weight,
            description: description.into(),
        }
    }
}

/// A named group of patterns with its own weight and pass threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    #[serde(default)]
    pub patterns: Vec<PatternConfig>,
    #[serde(default = "default_required_score")]
    pub required_score: f64,
    /// Contribution of this category to the overall score
    pub weight: f64,
}

impl CategoryConfig {
    pub fn new(
        name: impl Into<String>,
        required_score: f64,
        weight: f64,
        patterns: Vec<PatternConfig>,
    ) -> Self {
        Self {
            name: name.into(),
            patterns,
            required_score,
            weight,
        }
    }
}

/// Ordered list of categories as declared
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// Prepend the built-in standard categories when resolved
    #[serde(default)]
    pub extends_standard: bool,
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

impl TaxonomyConfig {
    /// The built-in AI governance taxonomy: core principles, risk management,
    /// fairness and privacy.
    pub fn standard() -> Self {
        Self {
            extends_standard: false,
            categories: vec![
                CategoryConfig::new(
                    "Core Principles",
                    0.6,
                    0.4,
                    vec![
                        PatternConfig::new(
                            r"transparen(?:t|cy)",
                            0.4,
                            "Transparency in AI systems",
                        ),
                        PatternConfig::new(r"accountab(?:le|ility)", 0.3, "Accountability measures"),
                        PatternConfig::new(r"ethical(?:ly)?", 0.3, "Ethical considerations"),
                    ],
                ),
                CategoryConfig::new(
                    "Risk Management",
                    0.5,
                    0.3,
                    vec![
                        PatternConfig::new(
                            r"risk\s+(?:assess|manag|mitigat)",
                            0.3,
                            "Risk assessment and management",
                        ),
                        PatternConfig::new(r"secur(?:e|ity)", 0.3, "Security measures"),
                        PatternConfig::new(r"monitor(?:ing)?", 0.2, "System monitoring"),
                        PatternConfig::new(r"govern(?:ance)?", 0.2, "Governance framework"),
                    ],
                ),
                CategoryConfig::new(
                    "Fairness & Privacy",
                    0.5,
                    0.3,
                    vec![
                        PatternConfig::new(r"fair(?:ly|ness)", 0.3, "Fairness in AI systems"),
                        PatternConfig::new(r"privacy", 0.3, "Privacy protection"),
                        PatternConfig::new(
                            r"bias|discriminat(?:ion|e)",
                            0.4,
                            "Bias and discrimination prevention",
                        ),
                    ],
                ),
            ],
        }
    }

    /// Append a category (builder style)
    pub fn with_category(mut self, category: CategoryConfig) -> Self {
        self.categories.push(category);
        self
    }

    /// Append every category of `other` after this taxonomy's own
    pub fn extend(mut self, other: TaxonomyConfig) -> Self {
        self.categories.extend(other.categories);
        self
    }

    /// Expand `extends_standard` into an explicit category list
    pub fn resolve(self) -> Self {
        if self.extends_standard {
            Self::standard().extend(Self {
                extends_standard: false,
                categories: self.categories,
            })
        } else {
            self
        }
    }

    /// Sum of category weights as declared
    pub fn total_weight(&self) -> f64 {
        self.categories.iter().map(|c| c.weight).sum()
    }
}

/// Load a taxonomy rules file (`.toml` or `.json`) and resolve `extends_standard`.
pub fn load_taxonomy(path: &Path) -> Result<TaxonomyConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let taxonomy = parse_taxonomy(&content, path)?;
    debug!(
        "Loaded {} categories from {}",
        taxonomy.categories.len(),
        path.display()
    );
    Ok(taxonomy)
}

/// Parse rules file content; the format is chosen by `path`'s extension.
pub fn parse_taxonomy(content: &str, path: &Path) -> Result<TaxonomyConfig, ConfigError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let parsed: TaxonomyConfig = match ext.as_deref() {
        Some("toml") => toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?,
        Some("json") => serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    Ok(parsed.resolve())
}
