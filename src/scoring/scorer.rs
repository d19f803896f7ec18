//! Category, overall and proximity scoring for one document

use super::matcher::{find_matches, TextMatch};
use super::proximity::{pair_key, proximity_score, WordIndex};
use super::taxonomy::{Category, Taxonomy};
use crate::models::{ComplianceResult, PatternEvidence};
use chrono::{DateTime, Local, SecondsFormat};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Knobs that change how category scores combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoringOptions {
    /// Divide the weighted sum by the total category weight so the overall
    /// score stays in [0, 1] whatever the weights sum to. Off by default.
    pub normalize_weights: bool,
}

/// Scores documents against an immutable taxonomy.
///
/// Holds no mutable state; one scorer can serve any number of threads.
#[derive(Debug, Clone)]
pub struct ComplianceScorer {
    taxonomy: Arc<Taxonomy>,
    options: ScoringOptions,
}

/// Per-category outcome before aggregation
struct CategoryOutcome {
    score: f64,
    evidence: Vec<PatternEvidence>,
}

impl ComplianceScorer {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self::with_options(taxonomy, ScoringOptions::default())
    }

    pub fn with_options(taxonomy: Arc<Taxonomy>, options: ScoringOptions) -> Self {
        Self { taxonomy, options }
    }

    /// Scorer over the built-in standard taxonomy
    pub fn standard() -> Self {
        Self::new(Arc::new(Taxonomy::standard()))
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn options(&self) -> ScoringOptions {
        self.options
    }

    /// Score `text`, stamping the result with the current local time.
    pub fn score(&self, text: &str, min_score: f64) -> ComplianceResult {
        self.score_at(text, min_score, Local::now())
    }

    /// Score `text` with an explicit timestamp.
    pub fn score_at(&self, text: &str, min_score: f64, at: DateTime<Local>) -> ComplianceResult {
        let index = WordIndex::new(text);

        let mut category_scores = IndexMap::with_capacity(self.taxonomy.categories().len());
        let mut found_patterns = IndexMap::new();
        let mut proximity_scores = IndexMap::new();
        let mut failed_categories = Vec::new();
        let mut weighted_sum = 0.0;

        for category in self.taxonomy.categories() {
            let matches: Vec<Vec<TextMatch<'_>>> = category
                .patterns
                .iter()
                .map(|p| find_matches(p, text))
                .collect();

            let outcome = score_category(category, &matches);
            debug!(
                "{}: {:.3} ({} of {} patterns)",
                category.name,
                outcome.score,
                outcome.evidence.len(),
                category.patterns.len()
            );

            score_proximity(category, &matches, &index, &mut proximity_scores);

            weighted_sum += outcome.score * category.weight;
            if outcome.score < category.required_score {
                failed_categories.push(category.name.clone());
            }
            if !outcome.evidence.is_empty() {
                found_patterns.insert(category.name.clone(), outcome.evidence);
            }
            category_scores.insert(category.name.clone(), outcome.score);
        }

        let score = if self.options.normalize_weights {
            let total = self.taxonomy.total_weight();
            if total > 0.0 {
                weighted_sum / total
            } else {
                0.0
            }
        } else {
            weighted_sum
        };
        let is_compliant = score >= min_score;

        info!(
            "Compliance score {:.3} (min {:.2}): {}",
            score,
            min_score,
            if is_compliant { "compliant" } else { "non-compliant" }
        );

        ComplianceResult {
            score,
            is_compliant,
            category_scores,
            found_patterns,
            proximity_scores,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Micros, false),
            failed_categories,
        }
    }
}

/// Presence-weighted score: each matching pattern counts once, however often it matches.
fn score_category(category: &Category, matches: &[Vec<TextMatch<'_>>]) -> CategoryOutcome {
    let mut raw = 0.0;
    let mut evidence = Vec::new();

    for (pattern, found) in category.patterns.iter().zip(matches) {
        if let Some(first) = found.first() {
            raw += pattern.weight;
            evidence.push(PatternEvidence {
                pattern: pattern.source().to_string(),
                matched: first.text.to_string(),
            });
        }
    }

    let max_possible = category.max_possible();
    let score = if max_possible > 0.0 {
        (raw / max_possible).min(1.0)
    } else {
        0.0
    };

    CategoryOutcome { score, evidence }
}

/// Every unordered pair within the category, in declaration order.
/// A repeated description pair overwrites the earlier entry.
fn score_proximity(
    category: &Category,
    matches: &[Vec<TextMatch<'_>>],
    index: &WordIndex<'_>,
    out: &mut IndexMap<String, f64>,
) {
    let patterns = &category.patterns;
    for i in 0..patterns.len() {
        for j in (i + 1)..patterns.len() {
            let score = proximity_score(index, &matches[i], &matches[j]);
            let key = pair_key(&patterns[i].description, &patterns[j].description);
            if score > 0.0 {
                debug!("{}: proximity {:.3}", key, score);
            }
            out.insert(key, score);
        }
    }
}
