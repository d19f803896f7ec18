//! Core data models for govcheck
//!
//! Plain value types produced by the scorer and persisted by the history
//! store. No behavior beyond small accessors is attached to them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Evidence that a pattern matched: the regex source and the first matched substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEvidence {
    pub pattern: String,
    pub matched: String,
}

/// Outcome of scoring one document against a taxonomy.
///
/// Maps are keyed by category name (or proximity pair key) and keep the
/// taxonomy's declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    /// Weighted overall score. Only lands in [0, 1] when category weights sum to 1.
    pub score: f64,
    pub is_compliant: bool,
    /// Normalized per-category score in [0, 1]
    pub category_scores: IndexMap<String, f64>,
    /// Categories with at least one matched pattern -> evidence in pattern order
    pub found_patterns: IndexMap<String, Vec<PatternEvidence>>,
    /// "<desc A> - <desc B>" -> proximity in [0, 1]
    pub proximity_scores: IndexMap<String, f64>,
    /// ISO 8601 timestamp of the scoring call
    pub timestamp: String,
    /// Categories scoring below their own required score
    #[serde(default)]
    pub failed_categories: Vec<String>,
}

impl ComplianceResult {
    /// "PASS" or "FAIL"
    pub fn status(&self) -> &'static str {
        if self.is_compliant {
            "PASS"
        } else {
            "FAIL"
        }
    }

    /// Number of distinct patterns that matched across all categories
    pub fn matched_pattern_count(&self) -> usize {
        self.found_patterns.values().map(Vec::len).sum()
    }

    /// Proximity pairs with a non-zero score, in declaration order
    pub fn co_occurring_pairs(&self) -> impl Iterator<Item = (&str, f64)> {
        self.proximity_scores
            .iter()
            .filter(|(_, score)| **score > 0.0)
            .map(|(key, score)| (key.as_str(), *score))
    }
}

/// One persisted row of the history log. Never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Insertion sequence number, starting at 1
    pub id: u64,
    pub timestamp: String,
    pub overall_score: f64,
    pub is_compliant: bool,
    pub category_scores: IndexMap<String, f64>,
    #[serde(default)]
    pub found_patterns: IndexMap<String, Vec<PatternEvidence>>,
}

impl HistoryRecord {
    /// Snapshot a result under the given sequence number
    pub fn from_result(id: u64, result: &ComplianceResult) -> Self {
        Self {
            id,
            timestamp: result.timestamp.clone(),
            overall_score: result.score,
            is_compliant: result.is_compliant,
            category_scores: result.category_scores.clone(),
            found_patterns: result.found_patterns.clone(),
        }
    }
}

/// Score series for trend display, oldest first.
///
/// Every category series is indexed like `timestamps`; `None` marks a record
/// scored under a taxonomy without that category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub timestamps: Vec<String>,
    pub overall_scores: Vec<f64>,
    pub category_scores: IndexMap<String, Vec<Option<f64>>>,
}

impl Trend {
    /// Build a chronological trend from records in any order (sorted by id).
    pub fn from_records(records: &[HistoryRecord]) -> Self {
        let mut ordered: Vec<&HistoryRecord> = records.iter().collect();
        ordered.sort_by_key(|r| r.id);

        let mut trend = Trend::default();
        for (i, record) in ordered.iter().enumerate() {
            trend.timestamps.push(record.timestamp.clone());
            trend.overall_scores.push(record.overall_score);
            for category in record.category_scores.keys() {
                // categories first seen now are backfilled for older records
                trend
                    .category_scores
                    .entry(category.clone())
                    .or_insert_with(|| vec![None; i]);
            }
            for (category, series) in trend.category_scores.iter_mut() {
                series.push(record.category_scores.get(category).copied());
            }
        }
        trend
    }

    pub fn len(&self) -> usize {
        self.overall_scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overall_scores.is_empty()
    }

    /// Charts need at least two points to show a direction
    pub fn is_chartable(&self) -> bool {
        self.len() >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, score: f64) -> HistoryRecord {
        let mut category_scores = IndexMap::new();
        category_scores.insert("Core Principles".to_string(), score);
        HistoryRecord {
            id,
            timestamp: format!("2026-01-0{}T00:00:00", id),
            overall_score: score,
            is_compliant: score >= 0.6,
            category_scores,
            found_patterns: IndexMap::new(),
        }
    }

    #[test]
    fn test_trend_is_chronological() {
        // newest-first input, as returned by HistoryStore::recent
        let records = vec![record(3, 0.9), record(2, 0.5), record(1, 0.1)];
        let trend = Trend::from_records(&records);
        assert_eq!(trend.overall_scores, vec![0.1, 0.5, 0.9]);
        assert_eq!(
            trend.category_scores["Core Principles"],
            vec![Some(0.1), Some(0.5), Some(0.9)]
        );
        assert!(trend.is_chartable());
    }

    #[test]
    fn test_trend_aligns_categories_across_taxonomies() {
        let mut newer = record(2, 0.5);
        newer
            .category_scores
            .insert("Data Protection".to_string(), 0.9);
        let mut oldest = record(1, 0.1);
        oldest.category_scores.clear();
        oldest.category_scores.insert("Legacy".to_string(), 0.3);

        let trend = Trend::from_records(&[newer, oldest, record(3, 0.7)]);
        assert_eq!(trend.len(), 3);
        assert_eq!(
            trend.category_scores["Data Protection"],
            vec![None, Some(0.9), None]
        );
        assert_eq!(trend.category_scores["Legacy"], vec![Some(0.3), None, None]);
        assert_eq!(
            trend.category_scores["Core Principles"],
            vec![None, Some(0.5), Some(0.7)]
        );
        assert!(trend.category_scores.values().all(|s| s.len() == trend.len()));
    }

    #[test]
    fn test_single_point_trend_not_chartable() {
        let trend = Trend::from_records(&[record(1, 0.4)]);
        assert_eq!(trend.len(), 1);
        assert!(!trend.is_chartable());
        assert!(Trend::default().is_empty());
    }
}
