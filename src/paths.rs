//! Default file locations - uses ~/.local/share/govcheck/ for persistent data

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Data directory for govcheck.
/// ~/.local/share/govcheck on Linux, the platform data dir elsewhere.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("govcheck")
}

/// Default history database path.
pub fn default_history_path() -> PathBuf {
    data_dir().join("history.redb")
}

/// Report files for a batch, one per input and in input order:
/// `<stem>_report.<extension>`.
///
/// Inputs are paths below the batch directory; files in subdirectories get
/// their directories prefixed (`sub/a.txt` -> `sub_a_report.md`). When two
/// inputs flatten to the same name (`sub/a.txt` and `sub_a.txt`), the first
/// keeps it and later ones get `_2`, `_3`, ... appended to the stem. Names
/// are compared case-insensitively.
pub fn report_paths(output_dir: &Path, relatives: &[PathBuf], extension: &str) -> Vec<PathBuf> {
    let mut taken = HashSet::new();
    relatives
        .iter()
        .map(|relative| {
            let stem = report_stem(relative);
            let mut candidate = stem.clone();
            let mut n = 1;
            while !taken.insert(candidate.to_lowercase()) {
                n += 1;
                candidate = format!("{stem}_{n}");
            }
            output_dir.join(format!("{candidate}_report.{extension}"))
        })
        .collect()
}

fn report_stem(relative: &Path) -> String {
    let mut parts: Vec<String> = relative
        .parent()
        .into_iter()
        .flat_map(|p| p.components())
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    parts.push(
        relative
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "policy".to_string()),
    );
    parts.join("_")
}
