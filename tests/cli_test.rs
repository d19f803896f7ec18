//! CLI contract tests
//!
//! Drives the built binary: exit codes, report files, history and batch
//! summaries. Every run uses a temp working directory so no stray
//! govcheck.toml or user history is picked up.

use serde_json::Value;
use std::path::Path;
use std::process::Command;

const POLICY: &str = "We ensure transparency and accountability. \
Risk assessment and governance are closely integrated. \
Privacy is protected <always> & fairness is reviewed.";

const WEAK: &str = "This document describes our office opening hours.";

struct Run {
    code: i32,
    stdout: String,
    stderr: String,
}

fn govcheck(dir: &Path, args: &[&str]) -> Run {
    let output = Command::new(env!("CARGO_BIN_EXE_govcheck"))
        .args(args)
        .current_dir(dir)
        .env_remove("GOVCHECK_HISTORY")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run govcheck");
    Run {
        code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("policy.txt"), POLICY).unwrap();
    std::fs::write(dir.path().join("weak.txt"), WEAK).unwrap();
    dir
}

#[test]
fn test_check_text_report() {
    let dir = workspace();
    let run = govcheck(dir.path(), &["check", "policy.txt", "--no-history"]);
    assert_eq!(run.code, 0, "stderr: {}", run.stderr);
    assert!(run.stdout.contains("PASS"));
    assert!(run.stdout.contains("Core Principles"));
    assert!(!run.stdout.contains('\u{1b}'), "piped output has no ANSI codes");
}

#[test]
fn test_check_json_report() {
    let dir = workspace();
    let run = govcheck(
        dir.path(),
        &["check", "policy.txt", "--format", "json", "--no-history"],
    );
    assert_eq!(run.code, 0, "stderr: {}", run.stderr);

    let json: Value = serde_json::from_str(&run.stdout).unwrap();
    assert!((json["score"].as_f64().unwrap() - 0.61).abs() < 1e-9);
    assert_eq!(json["status"], "PASS");
    assert_eq!(json["is_compliant"], true);

    let categories: Vec<&String> = json["category_scores"].as_object().unwrap().keys().collect();
    assert_eq!(categories.len(), 3);
    assert!((json["category_scores"]["Core Principles"].as_f64().unwrap() - 0.7).abs() < 1e-9);
}

#[test]
fn test_check_min_score_flag() {
    let dir = workspace();
    let run = govcheck(
        dir.path(),
        &["check", "policy.txt", "-m", "0.9", "--format", "json", "--no-history"],
    );
    assert_eq!(run.code, 0);
    let json: Value = serde_json::from_str(&run.stdout).unwrap();
    assert_eq!(json["status"], "FAIL");
    assert_eq!(json["min_score"], 0.9);
}

#[test]
fn test_check_missing_file_exits_1() {
    let dir = workspace();
    let run = govcheck(dir.path(), &["check", "missing.txt", "--no-history"]);
    assert_eq!(run.code, 1);
    assert!(run.stderr.contains("file not found"), "stderr: {}", run.stderr);
}

#[test]
fn test_noncompliant_exit_codes() {
    let dir = workspace();
    let run = govcheck(dir.path(), &["check", "weak.txt", "--no-history"]);
    assert_eq!(run.code, 0, "non-compliance alone is not an error");
    assert!(run.stdout.contains("FAIL"));

    let run = govcheck(
        dir.path(),
        &["check", "weak.txt", "--no-history", "--fail-on-noncompliant"],
    );
    assert_eq!(run.code, 1);
    assert!(run.stderr.contains("--fail-on-noncompliant"));

    let run = govcheck(
        dir.path(),
        &["check", "policy.txt", "--no-history", "--fail-on-noncompliant"],
    );
    assert_eq!(run.code, 0);
}

#[test]
fn test_check_writes_report_file() {
    let dir = workspace();
    let run = govcheck(
        dir.path(),
        &["check", "policy.txt", "-o", "out/report.md", "--no-history"],
    );
    assert_eq!(run.code, 0, "stderr: {}", run.stderr);
    assert!(run.stdout.contains("Detailed report saved to"));

    let report = std::fs::read_to_string(dir.path().join("out/report.md")).unwrap();
    assert!(report.starts_with("# ✅ Policy Compliance Report"));
    assert!(report.contains("| Core Principles | 0.70 | ✓ |"));
}

#[test]
fn test_history_records_checks() {
    let dir = workspace();
    let db = dir.path().join("history.redb");
    let db = db.to_str().unwrap();

    for file in ["weak.txt", "policy.txt"] {
        let run = govcheck(dir.path(), &["check", file, "--history", db]);
        assert_eq!(run.code, 0, "stderr: {}", run.stderr);
    }

    let run = govcheck(dir.path(), &["history", "--json", "--history", db]);
    assert_eq!(run.code, 0, "stderr: {}", run.stderr);
    let records: Vec<Value> = serde_json::from_str(&run.stdout).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], 2);
    assert_eq!(records[0]["is_compliant"], true);
    assert_eq!(records[1]["id"], 1);
    assert_eq!(records[1]["is_compliant"], false);

    let run = govcheck(dir.path(), &["history", "-n", "1", "--json", "--history", db]);
    let records: Vec<Value> = serde_json::from_str(&run.stdout).unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn test_history_env_var() {
    let dir = workspace();
    let db = dir.path().join("env.redb");

    let output = Command::new(env!("CARGO_BIN_EXE_govcheck"))
        .args(["check", "policy.txt"])
        .current_dir(dir.path())
        .env("GOVCHECK_HISTORY", &db)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(db.exists());
}

#[test]
fn test_history_disabled_is_an_error() {
    let dir = workspace();
    let run = govcheck(dir.path(), &["history", "--no-history"]);
    assert_eq!(run.code, 1);
    assert!(run.stderr.contains("History is disabled"));
}

#[test]
fn test_compare() {
    let dir = workspace();
    let run = govcheck(dir.path(), &["compare", "weak.txt", "policy.txt", "--no-history"]);
    assert_eq!(run.code, 0, "stderr: {}", run.stderr);
    assert!(run.stdout.contains("weak.txt"));
    assert!(run.stdout.contains("policy.txt"));

    let run = govcheck(
        dir.path(),
        &["compare", "weak.txt", "policy.txt", "--format", "json", "--no-history"],
    );
    let json: Value = serde_json::from_str(&run.stdout).unwrap();
    assert!((json["score_delta"].as_f64().unwrap() - 0.61).abs() < 1e-9);
}

#[test]
fn test_compare_does_not_record_history() {
    let dir = workspace();
    let db = dir.path().join("history.redb");
    let db = db.to_str().unwrap();

    govcheck(dir.path(), &["compare", "weak.txt", "policy.txt", "--history", db]);
    let run = govcheck(dir.path(), &["history", "--json", "--history", db]);
    let records: Vec<Value> = serde_json::from_str(&run.stdout).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_batch_reports_and_summary() {
    let dir = workspace();
    let policies = dir.path().join("policies");
    std::fs::create_dir_all(policies.join("eu")).unwrap();
    std::fs::write(policies.join("a.txt"), POLICY).unwrap();
    std::fs::write(policies.join("b.txt"), WEAK).unwrap();
    std::fs::write(policies.join("notes.md"), POLICY).unwrap();
    std::fs::write(policies.join("eu").join("c.txt"), POLICY).unwrap();
    std::fs::write(policies.join("broken.txt"), [0xc3, 0x28]).unwrap();

    let run = govcheck(
        dir.path(),
        &["batch", "policies", "-o", "out", "--format", "markdown", "--no-history"],
    );
    assert_eq!(run.code, 0, "stderr: {}", run.stderr);
    assert!(run.stderr.contains("Error processing broken.txt"));

    let out = dir.path().join("out");
    assert!(out.join("a_report.md").exists());
    assert!(out.join("b_report.md").exists());
    assert!(!out.join("eu_c_report.md").exists(), "*.txt is top-level only");
    assert!(!out.join("notes_report.md").exists());

    let summary: Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("compliance_summary.json")).unwrap())
            .unwrap();
    assert_eq!(summary["total"], 3);
    assert_eq!(summary["passed"], 1);
    assert_eq!(summary["failed"], 1);
    assert_eq!(summary["errors"], 1);
    let files: Vec<&str> = summary["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["file"].as_str().unwrap())
        .collect();
    assert_eq!(files, vec!["a.txt", "b.txt", "broken.txt"]);
}

#[test]
fn test_batch_recursive_pattern() {
    let dir = workspace();
    let policies = dir.path().join("policies");
    std::fs::create_dir_all(policies.join("eu")).unwrap();
    std::fs::write(policies.join("a.txt"), POLICY).unwrap();
    std::fs::write(policies.join("eu").join("c.txt"), POLICY).unwrap();

    let run = govcheck(
        dir.path(),
        &["batch", "policies", "-p", "**/*.txt", "-o", "out", "--no-history"],
    );
    assert_eq!(run.code, 0, "stderr: {}", run.stderr);
    assert!(dir.path().join("out/a_report.txt").exists());
    assert!(dir.path().join("out/eu_c_report.txt").exists());
}

#[test]
fn test_batch_fail_on_noncompliant() {
    let dir = workspace();
    let policies = dir.path().join("policies");
    std::fs::create_dir(&policies).unwrap();
    std::fs::write(policies.join("b.txt"), WEAK).unwrap();

    let run = govcheck(
        dir.path(),
        &["batch", "policies", "-o", "out", "--no-history", "--fail-on-noncompliant"],
    );
    assert_eq!(run.code, 1);
    assert!(dir.path().join("out/compliance_summary.json").exists());
}

#[test]
fn test_batch_no_matches_exits_1() {
    let dir = workspace();
    std::fs::create_dir(dir.path().join("empty")).unwrap();
    let run = govcheck(dir.path(), &["batch", "empty", "--no-history"]);
    assert_eq!(run.code, 1);
    assert!(run.stderr.contains("No files matching pattern"));

    let run = govcheck(dir.path(), &["batch", "nope", "--no-history"]);
    assert_eq!(run.code, 1);
}

#[test]
fn test_rules_json() {
    let dir = workspace();
    let run = govcheck(dir.path(), &["rules", "--json"]);
    assert_eq!(run.code, 0);
    let rules: Value = serde_json::from_str(&run.stdout).unwrap();
    let names: Vec<&str> = rules["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["Core Principles", "Risk Management", "Fairness & Privacy"]
    );
}

#[test]
fn test_invalid_rules_exit_1() {
    let dir = workspace();
    std::fs::write(
        dir.path().join("bad.toml"),
        r#"
[[categories]]
name = "Broken"
weight = 1.0

[[categories.patterns]]
pattern = '(unclosed'
weight = 0.5
description = "Unclosed group"
"#,
    )
    .unwrap();

    let run = govcheck(
        dir.path(),
        &["check", "policy.txt", "--rules", "bad.toml", "--no-history"],
    );
    assert_eq!(run.code, 1);
    assert!(run.stderr.contains("invalid pattern"), "stderr: {}", run.stderr);
}

#[test]
fn test_negative_config_min_score_exit_1() {
    let dir = workspace();
    std::fs::write(dir.path().join("strict.toml"), "[scoring]\nmin_score = -1.0\n").unwrap();

    let run = govcheck(
        dir.path(),
        &["check", "policy.txt", "--config", "strict.toml", "--no-history"],
    );
    assert_eq!(run.code, 1);
    assert!(run.stderr.contains("min_score"), "stderr: {}", run.stderr);
}

#[test]
fn test_init_then_check_uses_project_config() {
    let dir = workspace();
    let run = govcheck(dir.path(), &["init"]);
    assert_eq!(run.code, 0, "stderr: {}", run.stderr);
    assert!(dir.path().join("govcheck.toml").exists());
    assert!(dir.path().join("rules.toml").exists());

    std::fs::write(
        dir.path().join("retention.txt"),
        "We define data retention periods and ask for consent.",
    )
    .unwrap();
    let run = govcheck(
        dir.path(),
        &["check", "retention.txt", "--format", "json", "--no-history"],
    );
    assert_eq!(run.code, 0, "stderr: {}", run.stderr);
    let json: Value = serde_json::from_str(&run.stdout).unwrap();
    assert!((json["category_scores"]["Data Governance"].as_f64().unwrap() - 0.7).abs() < 1e-9);
}
