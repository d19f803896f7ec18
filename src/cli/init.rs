//! Init command - write example configuration files

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

const EXAMPLE_CONFIG: &str = r#"# govcheck configuration

[scoring]
# Overall score a document needs to pass
min_score = 0.6

# Divide the overall score by the sum of category weights
normalize_weights = false

[history]
# Record every check for trend reports
enabled = true

# History database (default: user data directory)
# path = "compliance_history.redb"

[taxonomy]
# Custom rules; remove to use the built-in categories only
file = "rules.toml"

[defaults]
# Report format when it cannot be inferred from --output (text, json, markdown, html)
format = "text"
"#;

const EXAMPLE_RULES: &str = r#"# govcheck rules
#
# Patterns are case-insensitive regular expressions. A category scores the sum
# of its matched pattern weights divided by the sum of all its pattern weights.

# Keep the built-in categories and add the ones below
extends_standard = true

[[categories]]
name = "Data Governance"
required_score = 0.5
weight = 0.2

[[categories.patterns]]
pattern = 'data\s+retention'
weight = 0.4
description = "Retention"

[[categories.patterns]]
pattern = 'data\s+minimi[sz]ation'
weight = 0.3
description = "Minimization"

[[categories.patterns]]
pattern = 'consent'
weight = 0.3
description = "Consent"
"#;

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    let dir = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    println!("\n{} Initializing govcheck\n", style("⚖").bold());

    for (name, content) in [("govcheck.toml", EXAMPLE_CONFIG), ("rules.toml", EXAMPLE_RULES)] {
        let file = dir.join(name);
        if file.exists() {
            println!(
                "{} {} already exists, leaving it unchanged",
                style("•").dim(),
                style(name).cyan()
            );
            continue;
        }
        std::fs::write(&file, content)
            .with_context(|| format!("Failed to create {}", file.display()))?;
        println!("{} Created {}", style("✓").green(), style(name).cyan());
    }

    println!("\nNext steps:");
    println!("  {} Check a document", style("govcheck check policy.txt").cyan());
    println!("  {} Review the active rules", style("govcheck rules").cyan());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config_file, load_taxonomy};
    use crate::scoring::Taxonomy;

    #[test]
    fn test_init_writes_valid_files() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path()).unwrap();

        let config = load_config_file(&dir.path().join("govcheck.toml")).unwrap();
        assert_eq!(config.scoring.min_score, 0.6);

        let rules = load_taxonomy(&dir.path().join("rules.toml")).unwrap();
        let taxonomy = Taxonomy::compile(&rules).unwrap();
        assert_eq!(taxonomy.categories().len(), 4);
        assert_eq!(taxonomy.categories()[3].name, "Data Governance");
        assert_eq!(config.taxonomy_config().unwrap(), rules);
    }

    #[test]
    fn test_init_keeps_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("govcheck.toml"), "# mine\n").unwrap();
        run(dir.path()).unwrap();

        let kept = std::fs::read_to_string(dir.path().join("govcheck.toml")).unwrap();
        assert_eq!(kept, "# mine\n");
        assert!(dir.path().join("rules.toml").exists());
    }

    #[test]
    fn test_init_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(&dir.path().join("nope")).is_err());
    }
}
