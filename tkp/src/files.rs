//! File helpers: path expansion, optional-path validation, list loading
//! and list formatting.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// Why an optional file path was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathIssue {
    #[error("File does not exist: {0}")]
    DoesNotExist(String),

    #[error("Path is not a file: {0}")]
    NotAFile(String),

    #[error("File is not readable as text: {0}")]
    Unreadable(String),
}

/// Expand `~/` and make the path absolute; blank input stays empty
pub fn expand_file_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let expanded = if trimmed == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(trimmed))
    } else if let Some(rest) = trimmed.strip_prefix("~/") {
        dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(trimmed))
    } else {
        PathBuf::from(trimmed)
    };

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir().map(|cwd| cwd.join(&expanded)).unwrap_or(expanded)
    };

    absolute.to_string_lossy().into_owned()
}

/// Validate an optional path: blank is accepted as "not set"
pub fn validate_optional_path(path: &str) -> Result<(), PathIssue> {
    if path.trim().is_empty() {
        return Ok(());
    }

    let expanded = expand_file_path(path);
    let file_path = Path::new(&expanded);

    if !file_path.exists() {
        return Err(PathIssue::DoesNotExist(expanded));
    }
    if !file_path.is_file() {
        return Err(PathIssue::NotAFile(expanded));
    }
    if let Err(e) = fs::read_to_string(file_path) {
        debug!(path = %expanded, error = %e, "validate_optional_path: unreadable");
        return Err(PathIssue::Unreadable(expanded));
    }
    Ok(())
}

/// True when the path names an existing, readable text file
pub fn validate_file_path(path: &str) -> bool {
    !path.trim().is_empty() && validate_optional_path(path).is_ok()
}

/// Non-blank lines of a file, trimmed, in file order
///
/// Missing, unreadable and empty files all yield an empty list.
pub fn read_lines(path: &str) -> Vec<String> {
    let expanded = expand_file_path(path);
    debug!(%expanded, "read_lines: called");
    if expanded.is_empty() {
        return Vec::new();
    }

    match fs::read_to_string(&expanded) {
        Ok(content) => content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        Err(e) => {
            warn!(path = %expanded, error = %e, "read_lines: could not read file");
            Vec::new()
        }
    }
}

/// Which list a set of items belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    AcceptanceCriteria,
    DefinitionOfDone,
}

impl ListKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::AcceptanceCriteria => "Acceptance Criteria",
            Self::DefinitionOfDone => "Definition of Done",
        }
    }

    /// Text shown for an empty list
    pub fn empty_sentinel(&self) -> &'static str {
        match self {
            Self::AcceptanceCriteria => "No criteria provided",
            Self::DefinitionOfDone => "No items provided",
        }
    }
}

/// Numbered list, one item per line: `1. A\n2. B`
pub fn format_list(items: &[String], kind: ListKind) -> String {
    if items.is_empty() {
        return kind.empty_sentinel().to_string();
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}
