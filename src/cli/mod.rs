//! CLI command definitions and handlers

mod batch;
mod check;
mod compare;
mod history;
mod init;
mod rules;
mod setup;

use crate::history::DEFAULT_RECENT_LIMIT;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate a minimum score (finite, >= 0)
fn parse_min_score(s: &str) -> Result<f64, String> {
    let score: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !score.is_finite() {
        Err("min score must be a finite number".to_string())
    } else if score < 0.0 {
        Err("min score cannot be negative".to_string())
    } else {
        Ok(score)
    }
}

/// govcheck - Policy compliance scoring
///
/// Scores policy documents against weighted regex categories. Everything runs
/// locally; history is kept in a single file on this machine.
#[derive(Parser, Debug)]
#[command(name = "govcheck")]
#[command(
    version,
    about = "Score policy documents against weighted compliance categories",
    long_about = "govcheck scores free-text policy documents against a taxonomy of weighted \
regex categories (transparency, risk management, fairness and privacy by default), \
measures how closely related concepts appear together, and keeps a local history \
of scores for trend reports.\n\n\
Scoring is deterministic pattern matching. It is not a legal assessment.",
    after_help = "\
Examples:
  govcheck check policy.txt                       Score a single document
  govcheck check policy.txt -o report.html        Also write an HTML report
  govcheck compare draft.txt final.txt            Compare two documents
  govcheck batch policies/ -p '**/*.md'           Score a folder of documents
  govcheck history                                Show recent scores
  govcheck rules --json                           Print the active taxonomy"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(flatten)]
    pub session: SessionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that scores or reads history
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Project config file (default: ./govcheck.toml or ./.govcheckrc.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Taxonomy rules file (.toml or .json), overrides the config
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    /// History database path
    #[arg(long, global = true, env = "GOVCHECK_HISTORY")]
    pub history: Option<PathBuf>,

    /// Do not read or record score history
    #[arg(long, global = true)]
    pub no_history: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a single policy file
    #[command(after_help = "\
Examples:
  govcheck check policy.txt                       Text report on stdout
  govcheck check policy.txt --format json         JSON for scripting
  govcheck check policy.txt -o report.md          Markdown report file
  govcheck check policy.txt -m 0.8 --fail-on-noncompliant   Exit 1 below 0.8 (CI mode)")]
    Check {
        /// Path to the policy file to check
        policy_file: PathBuf,

        /// Write a report to this path (format inferred from the extension)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output format: text, json, markdown (or md), html
        #[arg(long, short = 'f', value_parser = ["text", "json", "markdown", "md", "html"])]
        format: Option<String>,

        /// Minimum score for compliance (default: 0.6)
        #[arg(long, short = 'm', value_parser = parse_min_score)]
        min_score: Option<f64>,

        /// Exit with code 1 if the document is not compliant
        #[arg(long)]
        fail_on_noncompliant: bool,
    },

    /// Compare two policy files
    Compare {
        /// First policy file
        policy1: PathBuf,

        /// Second policy file
        policy2: PathBuf,

        /// Write the comparison to this path (format inferred from the extension)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output format: text, json, markdown (or md), html
        #[arg(long, short = 'f', value_parser = ["text", "json", "markdown", "md", "html"])]
        format: Option<String>,

        /// Minimum score for compliance (default: 0.6)
        #[arg(long, short = 'm', value_parser = parse_min_score)]
        min_score: Option<f64>,
    },

    /// Check every matching policy file in a directory
    #[command(after_help = "\
Examples:
  govcheck batch policies/                        All *.txt files in policies/
  govcheck batch policies/ -p '**/*.md'           Markdown files, recursively
  govcheck batch policies/ -o out --format html   HTML reports in out/")]
    Batch {
        /// Directory containing policy files
        directory: PathBuf,

        /// File pattern relative to the directory (default: *.txt)
        #[arg(long, short = 'p', default_value = "*.txt")]
        pattern: String,

        /// Output directory for reports (default: reports)
        #[arg(long, short = 'o', default_value = "reports")]
        output_dir: PathBuf,

        /// Report format: text, json, markdown (or md), html
        #[arg(long, short = 'f', value_parser = ["text", "json", "markdown", "md", "html"])]
        format: Option<String>,

        /// Minimum score for compliance (default: 0.6)
        #[arg(long, short = 'm', value_parser = parse_min_score)]
        min_score: Option<f64>,

        /// Exit with code 1 if any document is not compliant
        #[arg(long)]
        fail_on_noncompliant: bool,
    },

    /// Show recent compliance scores, newest first
    History {
        /// Number of records to show
        #[arg(long, short = 'n', default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the active compliance taxonomy
    Rules {
        /// Output as JSON (usable as a rules file)
        #[arg(long)]
        json: bool,
    },

    /// Create example govcheck.toml and rules.toml files
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let session = &cli.session;
    match cli.command {
        Commands::Check {
            policy_file,
            output,
            format,
            min_score,
            fail_on_noncompliant,
        } => check::run(
            session,
            &policy_file,
            output.as_deref(),
            format.as_deref(),
            min_score,
            fail_on_noncompliant,
        ),

        Commands::Compare {
            policy1,
            policy2,
            output,
            format,
            min_score,
        } => compare::run(
            session,
            &policy1,
            &policy2,
            output.as_deref(),
            format.as_deref(),
            min_score,
        ),

        Commands::Batch {
            directory,
            pattern,
            output_dir,
            format,
            min_score,
            fail_on_noncompliant,
        } => batch::run(
            session,
            &directory,
            &pattern,
            &output_dir,
            format.as_deref(),
            min_score,
            fail_on_noncompliant,
        ),

        Commands::History { limit, json } => history::run(session, limit, json),

        Commands::Rules { json } => rules::run(session, json),

        Commands::Init { path } => init::run(&path),
    }
}
