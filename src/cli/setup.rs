//! Session setup shared by the commands: config, taxonomy, history and output helpers.

use super::SessionArgs;
use crate::checker::{ComplianceChecker, HistoryStatus};
use crate::config::{load_config_file, load_project_config, load_taxonomy, ProjectConfig};
use crate::history::{HistoryStore, RedbHistory};
use crate::paths;
use crate::reporters::{self, OutputFormat};
use crate::scoring::{ComplianceScorer, ScoringOptions, Taxonomy};
use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything a command needs to score documents
pub(super) struct Session {
    pub config: ProjectConfig,
    pub checker: ComplianceChecker,
}

impl Session {
    /// Load config and taxonomy, and open history unless disabled.
    ///
    /// A history store that cannot be opened is reported and skipped; scoring
    /// still works without it.
    pub fn load(args: &SessionArgs) -> Result<Self> {
        let config = load_config(args)?;
        let taxonomy = load_session_taxonomy(args, &config)?;
        let scorer = ComplianceScorer::with_options(
            Arc::new(taxonomy),
            ScoringOptions {
                normalize_weights: config.scoring.normalize_weights,
            },
        );

        let mut checker = ComplianceChecker::new(scorer);
        if let Some(path) = history_path(args, &config) {
            match RedbHistory::open(&path) {
                Ok(store) => checker = checker.with_history(Arc::new(store)),
                Err(e) => {
                    warn!("History disabled: {}", e);
                    eprintln!(
                        "{} Could not open history at {}: {}",
                        style("!").yellow().bold(),
                        path.display(),
                        e
                    );
                }
            }
        }

        Ok(Self { config, checker })
    }

    /// Explicit flag, else the configured minimum score
    pub fn min_score(&self, flag: Option<f64>) -> f64 {
        flag.unwrap_or(self.config.scoring.min_score)
    }

    /// Report format: explicit flag, then output extension, then config, then text
    pub fn format(&self, flag: Option<&str>, output: Option<&Path>) -> Result<OutputFormat> {
        if let Some(f) = flag {
            return OutputFormat::from_str(f);
        }
        if let Some(f) = output.and_then(OutputFormat::from_path) {
            return Ok(f);
        }
        match self.config.defaults.format.as_deref() {
            Some(f) => OutputFormat::from_str(f).context("Invalid [defaults] format in config"),
            None => Ok(OutputFormat::Text),
        }
    }
}

/// Project config: explicit `--config` (strict) or discovery in the working directory
pub(super) fn load_config(args: &SessionArgs) -> Result<ProjectConfig> {
    match &args.config {
        Some(path) => load_config_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("Failed to read working directory")?;
            Ok(load_project_config(&cwd))
        }
    }
}

/// Taxonomy: `--rules` file, then the config's rules file, then the standard set.
/// Invalid rules fail here, before any document is read.
pub(super) fn load_session_taxonomy(args: &SessionArgs, config: &ProjectConfig) -> Result<Taxonomy> {
    let declared = match &args.rules {
        Some(path) => load_taxonomy(path)?,
        None => config.taxonomy_config()?,
    };
    let taxonomy = Taxonomy::compile(&declared).context("Invalid compliance taxonomy")?;
    debug!(
        "Taxonomy: {} categories, {} patterns",
        taxonomy.categories().len(),
        taxonomy.pattern_count()
    );
    Ok(taxonomy)
}

/// History location, or `None` when history is turned off
pub(super) fn history_path(args: &SessionArgs, config: &ProjectConfig) -> Option<PathBuf> {
    if args.no_history || !config.history.enabled {
        return None;
    }
    Some(
        args.history
            .clone()
            .or_else(|| config.history_path())
            .unwrap_or_else(paths::default_history_path),
    )
}

/// Open the history store strictly, for commands that only read it
pub(super) fn open_history(args: &SessionArgs) -> Result<Arc<dyn HistoryStore>> {
    let config = load_config(args)?;
    let path = history_path(args, &config)
        .context("History is disabled (--no-history or [history] enabled = false)")?;
    let store = RedbHistory::open(&path)
        .with_context(|| format!("Failed to open history at {}", path.display()))?;
    Ok(Arc::new(store))
}

/// Print a warning when a history write failed
pub(super) fn report_history_status(status: &HistoryStatus) {
    if let HistoryStatus::Failed(e) = status {
        eprintln!(
            "{} Result not saved to history: {}",
            style("!").yellow().bold(),
            e
        );
    }
}

/// Colors only on a terminal
pub(super) fn for_terminal(rendered: &str) -> String {
    if console::colors_enabled() {
        rendered.to_string()
    } else {
        reporters::plain(rendered)
    }
}

/// Write a rendered report; text output is written without colors
pub(super) fn write_report(path: &Path, rendered: &str, format: OutputFormat) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = match format {
        OutputFormat::Text => reporters::plain(rendered),
        _ => rendered.to_string(),
    };
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_in(dir: &Path) -> SessionArgs {
        SessionArgs {
            config: Some(dir.join("govcheck.toml")),
            ..Default::default()
        }
    }

    #[test]
    fn test_history_path_precedence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("govcheck.toml"),
            "[history]\npath = \"from-config.redb\"\n",
        )
        .unwrap();
        let mut args = args_in(dir.path());
        let config = load_config(&args).unwrap();

        assert_eq!(
            history_path(&args, &config),
            Some(dir.path().join("from-config.redb"))
        );

        args.history = Some(PathBuf::from("flag.redb"));
        assert_eq!(history_path(&args, &config), Some(PathBuf::from("flag.redb")));

        args.no_history = true;
        assert_eq!(history_path(&args, &config), None);
    }

    #[test]
    fn test_history_disabled_in_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("govcheck.toml"), "[history]\nenabled = false\n").unwrap();
        let args = args_in(dir.path());
        let config = load_config(&args).unwrap();
        assert_eq!(history_path(&args, &config), None);
        assert!(open_history(&args).is_err());
    }

    #[test]
    fn test_session_format_precedence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("govcheck.toml"),
            "[defaults]\nformat = \"markdown\"\n",
        )
        .unwrap();
        let args = SessionArgs {
            no_history: true,
            ..args_in(dir.path())
        };
        let session = Session::load(&args).unwrap();

        assert_eq!(session.format(Some("json"), None).unwrap(), OutputFormat::Json);
        assert_eq!(
            session.format(None, Some(Path::new("r.html"))).unwrap(),
            OutputFormat::Html
        );
        assert_eq!(session.format(None, None).unwrap(), OutputFormat::Markdown);
        assert_eq!(session.min_score(None), 0.6);
        assert_eq!(session.min_score(Some(0.9)), 0.9);
    }

    #[test]
    fn test_invalid_rules_fail_before_scoring() {
        let dir = tempfile::tempdir().unwrap();
        let rules = dir.path().join("rules.toml");
        std::fs::write(
            &rules,
            "[[categories]]\nname = \"Broken\"\nweight = 1.0\n\n[[categories.patterns]]\npattern = 'risk('\nweight = 0.5\ndescription = \"bad\"\n",
        )
        .unwrap();
        let args = SessionArgs {
            rules: Some(rules),
            no_history: true,
            ..Default::default()
        };
        let err = Session::load(&args).err().unwrap();
        assert!(format!("{err:#}").contains("invalid pattern"));
    }

    #[test]
    fn test_unopenable_history_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the database file should be
        let blocked = dir.path().join("history.redb");
        std::fs::create_dir(&blocked).unwrap();
        let args = SessionArgs {
            history: Some(blocked),
            ..Default::default()
        };
        let session = Session::load(&args).unwrap();
        assert!(session.checker.history().is_none());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = SessionArgs {
            config: Some(dir.path().join("missing.toml")),
            no_history: true,
            ..Default::default()
        };
        assert!(Session::load(&args).is_err());
    }
}
