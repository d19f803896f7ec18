//! Scoring with optional history persistence
//!
//! A persistence failure never costs the caller its result: the outcome
//! carries the [`ComplianceResult`] and, separately, what happened to the
//! history write.

use crate::history::{HistoryError, HistoryStore};
use crate::models::{ComplianceResult, Trend};
use crate::scoring::ComplianceScorer;
use std::sync::Arc;
use tracing::warn;

/// What happened to the history write for one check
#[derive(Debug)]
pub enum HistoryStatus {
    /// No history store configured
    Disabled,
    /// Stored under this record id
    Recorded(u64),
    /// The store rejected the record; the result is still valid
    Failed(HistoryError),
}

impl HistoryStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, HistoryStatus::Failed(_))
    }
}

/// Result of one check plus the side-channel history status
#[derive(Debug)]
pub struct CheckOutcome {
    pub result: ComplianceResult,
    pub history: HistoryStatus,
}

/// Scorer plus an optional history log
#[derive(Clone)]
pub struct ComplianceChecker {
    scorer: ComplianceScorer,
    history: Option<Arc<dyn HistoryStore>>,
}

impl ComplianceChecker {
    pub fn new(scorer: ComplianceScorer) -> Self {
        Self {
            scorer,
            history: None,
        }
    }

    /// Checker over the standard taxonomy without history
    pub fn standard() -> Self {
        Self::new(ComplianceScorer::standard())
    }

    pub fn with_history(mut self, store: Arc<dyn HistoryStore>) -> Self {
        self.history = Some(store);
        self
    }

    pub fn scorer(&self) -> &ComplianceScorer {
        &self.scorer
    }

    pub fn history(&self) -> Option<&Arc<dyn HistoryStore>> {
        self.history.as_ref()
    }

    /// Score `text` and append the result to history if configured.
    pub fn check(&self, text: &str, min_score: f64) -> CheckOutcome {
        let result = self.scorer.score(text, min_score);

        let history = match &self.history {
            None => HistoryStatus::Disabled,
            Some(store) => match store.record(&result) {
                Ok(record) => HistoryStatus::Recorded(record.id),
                Err(e) => {
                    warn!("Failed to record compliance history: {}", e);
                    HistoryStatus::Failed(e)
                }
            },
        };

        CheckOutcome { result, history }
    }

    /// Score `text`, recording it when history is enabled. Persistence errors
    /// are logged and dropped.
    pub fn check_compliance(&self, text: &str, min_score: f64) -> ComplianceResult {
        self.check(text, min_score).result
    }

    /// Chronological trend of the last `limit` records; empty without history.
    pub fn trend(&self, limit: usize) -> Result<Trend, HistoryError> {
        match &self.history {
            Some(store) => store.trend(limit),
            None => Ok(Trend::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistory;
    use crate::models::HistoryRecord;

    struct BrokenStore;

    impl HistoryStore for BrokenStore {
        fn record(&self, _result: &ComplianceResult) -> Result<HistoryRecord, HistoryError> {
            Err(HistoryError::Io(std::io::Error::other("disk full")))
        }

        fn recent(&self, _limit: usize) -> Result<Vec<HistoryRecord>, HistoryError> {
            Err(HistoryError::Poisoned)
        }
    }

    #[test]
    fn test_without_history() {
        let outcome = ComplianceChecker::standard().check("transparent", 0.6);
        assert!(matches!(outcome.history, HistoryStatus::Disabled));
        assert!(outcome.result.score > 0.0);
        assert!(ComplianceChecker::standard().trend(10).unwrap().is_empty());
    }

    #[test]
    fn test_records_each_check() {
        let store = Arc::new(MemoryHistory::new());
        let checker = ComplianceChecker::standard().with_history(store.clone());

        let first = checker.check("privacy", 0.6);
        let second = checker.check("security", 0.6);
        assert!(matches!(first.history, HistoryStatus::Recorded(1)));
        assert!(matches!(second.history, HistoryStatus::Recorded(2)));
        assert_eq!(store.recent(10).unwrap().len(), 2);
        assert_eq!(checker.trend(10).unwrap().len(), 2);
    }

    #[test]
    fn test_persistence_failure_keeps_result() {
        let checker = ComplianceChecker::standard().with_history(Arc::new(BrokenStore));
        let text = "Transparency and accountability with ethical review.";

        let outcome = checker.check(text, 0.6);
        assert!(outcome.history.is_failed());
        assert_eq!(
            outcome.result.category_scores,
            ComplianceScorer::standard()
                .score(text, 0.6)
                .category_scores
        );

        let result = checker.check_compliance(text, 0.6);
        assert!((result.category_scores["Core Principles"] - 1.0).abs() < 1e-9);
        assert!(checker.trend(10).is_err());
    }
}
