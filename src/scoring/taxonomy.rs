//! Compiled, immutable taxonomy
//!
//! A [`TaxonomyConfig`] is validated and compiled once. Every regex is built
//! case-insensitive with a bounded program size; the `regex` crate runs in
//! linear time, so user-supplied rules cannot backtrack catastrophically.

use crate::config::{CategoryConfig, ConfigError, PatternConfig, TaxonomyConfig};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Upper bound on a single compiled pattern
const MAX_COMPILED_PATTERN_BYTES: usize = 1 << 20;

static STANDARD: OnceLock<Taxonomy> = OnceLock::new();

/// A compiled pattern with its weight and owning category
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    pub weight: f64,
    pub category: String,
    pub description: String,
}

impl Pattern {
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// The regex as written in the rules
    pub fn source(&self) -> &str {
        self.regex.as_str()
    }
}

#[derive(Debug, Clone)]
pub struct Category {
    pub name: String,
    pub patterns: Vec<Pattern>,
    pub required_score: f64,
    pub weight: f64,
}

impl Category {
    /// Raw score when every pattern matches
    pub fn max_possible(&self) -> f64 {
        self.patterns.iter().map(|p| p.weight).sum()
    }
}

/// Ordered categories, immutable once compiled
#[derive(Debug, Clone)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    /// Validate and compile a declared taxonomy.
    ///
    /// `extends_standard` is honored, so a raw rules file compiles to the same
    /// taxonomy as its resolved form.
    pub fn compile(config: &TaxonomyConfig) -> Result<Self, ConfigError> {
        let resolved = config.clone().resolve();
        let mut seen = HashSet::new();
        let mut categories = Vec::with_capacity(resolved.categories.len());

        for category in &resolved.categories {
            if category.name.trim().is_empty() {
                return Err(ConfigError::EmptyCategoryName);
            }
            if !seen.insert(category.name.as_str()) {
                return Err(ConfigError::DuplicateCategory(category.name.clone()));
            }
            categories.push(compile_category(category)?);
        }

        Ok(Self { categories })
    }

    /// The built-in standard taxonomy (compiled once per process)
    pub fn standard() -> Self {
        STANDARD
            .get_or_init(|| {
                Self::compile(&TaxonomyConfig::standard()).expect("standard taxonomy is valid")
            })
            .clone()
    }

    /// A new taxonomy with `extra`'s categories appended after these.
    pub fn extended(&self, extra: &TaxonomyConfig) -> Result<Self, ConfigError> {
        let mut config = self.to_config();
        config.categories.extend(extra.categories.iter().cloned());
        Self::compile(&config)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn pattern_count(&self) -> usize {
        self.categories.iter().map(|c| c.patterns.len()).sum()
    }

    /// Sum of category weights (not required to be 1)
    pub fn total_weight(&self) -> f64 {
        self.categories.iter().map(|c| c.weight).sum()
    }

    /// Declarative form, e.g. for `rules --json`
    pub fn to_config(&self) -> TaxonomyConfig {
        TaxonomyConfig {
            extends_standard: false,
            categories: self
                .categories
                .iter()
                .map(|c| CategoryConfig {
                    name: c.name.clone(),
                    required_score: c.required_score,
                    weight: c.weight,
                    patterns: c
                        .patterns
                        .iter()
                        .map(|p| PatternConfig::new(p.source(), p.weight, p.description.clone()))
                        .collect(),
                })
                .collect(),
        }
    }
}

fn compile_category(category: &CategoryConfig) -> Result<Category, ConfigError> {
    if !category.weight.is_finite() || category.weight < 0.0 {
        return Err(ConfigError::InvalidCategoryWeight {
            category: category.name.clone(),
            weight: category.weight,
        });
    }
    if !(0.0..=1.0).contains(&category.required_score) {
        return Err(ConfigError::InvalidRequiredScore {
            category: category.name.clone(),
            required_score: category.required_score,
        });
    }

    let patterns = category
        .patterns
        .iter()
        .map(|p| compile_pattern(&category.name, p))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Category {
        name: category.name.clone(),
        patterns,
        required_score: category.required_score,
        weight: category.weight,
    })
}

fn compile_pattern(category: &str, pattern: &PatternConfig) -> Result<Pattern, ConfigError> {
    // NaN fails both comparisons
    if !(pattern.weight > 0.0 && pattern.weight <= 1.0) {
        return Err(ConfigError::InvalidWeight {
            category: category.to_string(),
            description: pattern.description.clone(),
            weight: pattern.weight,
        });
    }

    let regex = RegexBuilder::new(&pattern.pattern)
        .case_insensitive(true)
        .size_limit(MAX_COMPILED_PATTERN_BYTES)
        .build()
        .map_err(|source| ConfigError::InvalidPattern {
            category: category.to_string(),
            description: pattern.description.clone(),
            pattern: pattern.pattern.clone(),
            source,
        })?;

    Ok(Pattern {
        regex,
        weight: pattern.weight,
        category: category.to_string(),
        description: pattern.description.clone(),
    })
}
