//! Policy Compliance Scoring
//!
//! Scores free text against a taxonomy of weighted regex categories. Matching
//! is deterministic: no language understanding, only presence of patterns and
//! the word distance between them.
//!
//! # Scoring Formula
//!
//! ```text
//! category = Σ weight(pattern matched at least once) / Σ weight(all patterns)
//! overall  = Σ category × category_weight
//! compliant = overall >= min_score
//! ```
//!
//! Category weights are not normalized unless
//! [`ScoringOptions::normalize_weights`] is set, so with weights that do not
//! sum to 1 the overall score can leave [0, 1].
//!
//! # Proximity
//!
//! For each pair of patterns in the same category the closest pair of
//! matches is found and scored `1 / (1 + words between)`. Pairs are keyed
//! `"<first description> - <second description>"` in declaration order.
//!
//! # Example
//!
//! "Our system is transparent and ethical." against Core Principles
//! (transparency 0.4, accountability 0.3, ethics 0.3) scores 0.7 for the
//! category: two of three concepts present, each counted once.

mod matcher;
mod proximity;
mod scorer;
mod taxonomy;

pub use matcher::{find_matches, TextMatch};
pub use proximity::{
    min_word_distance, pair_key, proximity_score, score_from_distance, WordIndex,
};
pub use scorer::{ComplianceScorer, ScoringOptions};
pub use taxonomy::{Category, Pattern, Taxonomy};

use crate::models::ComplianceResult;

/// One-shot scoring against the standard taxonomy.
pub fn score_document(text: &str, min_score: f64) -> ComplianceResult {
    ComplianceScorer::standard().score(text, min_score)
}
