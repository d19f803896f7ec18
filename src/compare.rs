//! Compare two scored documents
//!
//! Shows the overall score delta, per-category deltas and which patterns
//! matched in either document. Deltas are `right - left`.

use crate::models::ComplianceResult;
use serde::Serialize;
use std::collections::BTreeSet;

/// A scored document with the label it is shown under
#[derive(Debug, Clone, Serialize)]
pub struct ComparedDocument {
    pub label: String,
    pub result: ComplianceResult,
}

/// One category's score on both sides
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDelta {
    pub category: String,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

impl CategoryDelta {
    pub fn delta(&self) -> Option<f64> {
        match (self.left, self.right) {
            (Some(left), Some(right)) => Some(right - left),
            _ => None,
        }
    }
}

/// Whether a pattern matched in each document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternPresence {
    pub pattern: String,
    pub in_left: bool,
    pub in_right: bool,
}

/// Result of comparing two documents.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub left: ComparedDocument,
    pub right: ComparedDocument,
    pub categories: Vec<CategoryDelta>,
    pub patterns: Vec<PatternPresence>,
}

impl Comparison {
    pub fn score_delta(&self) -> f64 {
        self.right.result.score - self.left.result.score
    }
}

/// Compare two results. Categories follow the left document's order, with any
/// right-only categories appended.
pub fn compare_results(
    left_label: &str,
    left: ComplianceResult,
    right_label: &str,
    right: ComplianceResult,
) -> Comparison {
    let mut categories: Vec<CategoryDelta> = left
        .category_scores
        .iter()
        .map(|(name, score)| CategoryDelta {
            category: name.clone(),
            left: Some(*score),
            right: right.category_scores.get(name).copied(),
        })
        .collect();
    categories.extend(
        right
            .category_scores
            .iter()
            .filter(|(name, _)| !left.category_scores.contains_key(*name))
            .map(|(name, score)| CategoryDelta {
                category: name.clone(),
                left: None,
                right: Some(*score),
            }),
    );

    let left_patterns = matched_patterns(&left);
    let right_patterns = matched_patterns(&right);
    let patterns = left_patterns
        .union(&right_patterns)
        .map(|pattern| PatternPresence {
            pattern: pattern.to_string(),
            in_left: left_patterns.contains(pattern),
            in_right: right_patterns.contains(pattern),
        })
        .collect();

    Comparison {
        left: ComparedDocument {
            label: left_label.to_string(),
            result: left,
        },
        right: ComparedDocument {
            label: right_label.to_string(),
            result: right,
        },
        categories,
        patterns,
    }
}

fn matched_patterns(result: &ComplianceResult) -> BTreeSet<&str> {
    result
        .found_patterns
        .values()
        .flatten()
        .map(|e| e.pattern.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ComplianceScorer;

    #[test]
    fn test_compare_deltas() {
        let scorer = ComplianceScorer::standard();
        let weak = scorer.score("We process data quickly.", 0.6);
        let strong = scorer.score(
            "Transparency, accountability and ethical review. Risk assessment, \
             security, monitoring and governance. Fairness, privacy and bias checks.",
            0.6,
        );
        let comparison = compare_results("weak.txt", weak, "strong.txt", strong);

        assert!((comparison.score_delta() - 1.0).abs() < 1e-9);
        assert_eq!(comparison.categories.len(), 3);
        for delta in &comparison.categories {
            assert!((delta.delta().unwrap() - 1.0).abs() < 1e-9);
        }
        assert_eq!(comparison.patterns.len(), 10);
        assert!(comparison.patterns.iter().all(|p| !p.in_left && p.in_right));
    }

    #[test]
    fn test_pattern_presence_sorted_and_merged() {
        let scorer = ComplianceScorer::standard();
        let left = scorer.score("privacy and security", 0.6);
        let right = scorer.score("privacy and transparency", 0.6);
        let comparison = compare_results("a", left, "b", right);

        let names: Vec<&str> = comparison.patterns.iter().map(|p| p.pattern.as_str()).collect();
        assert_eq!(names, vec!["privacy", r"secur(?:e|ity)", r"transparen(?:t|cy)"]);
        assert!(comparison.patterns[0].in_left && comparison.patterns[0].in_right);
        assert!(comparison.patterns[1].in_left && !comparison.patterns[1].in_right);
        assert!(!comparison.patterns[2].in_left && comparison.patterns[2].in_right);
    }

    #[test]
    fn test_missing_category_has_no_delta() {
        let delta = CategoryDelta {
            category: "Data Protection".to_string(),
            left: None,
            right: Some(0.5),
        };
        assert_eq!(delta.delta(), None);
    }
}
