//! govcheck - Policy compliance scoring
//!
//! Scores free-text policy documents against a taxonomy of weighted regex
//! categories, measures how closely related concepts appear together, and
//! keeps a local history of scores.
//!
//! ```no_run
//! use govcheck::checker::ComplianceChecker;
//!
//! let checker = ComplianceChecker::standard();
//! let result = checker.check_compliance("We ensure transparency and accountability.", 0.6);
//! println!("{:.2} {}", result.score, result.status());
//! ```

pub mod checker;
pub mod cli;
pub mod compare;
pub mod config;
pub mod history;
pub mod input;
pub mod models;
pub mod paths;
pub mod reporters;
pub mod scoring;
