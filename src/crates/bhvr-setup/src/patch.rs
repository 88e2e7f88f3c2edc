//! Targeted wrangler.toml rewriting
//!
//! Replaces individual `key = "value"` bindings inside a named section of
//! the configuration file while preserving every other byte, comments and
//! formatting included. A full TOML round-trip would reformat the file, so
//! the patch works on the raw text instead.
//!
//! All substitutions are computed in memory first; the file is written back
//! exactly once, after the last substitution, so an abort mid-run never
//! leaves a half-patched file behind.

use crate::error::{Result, SetupError};
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// One value replacement, scoped to a section of the file
#[derive(Debug, Clone)]
pub struct Substitution {
    /// Exact section header text, e.g. `[[env.production.d1_databases]]`
    pub section: String,
    /// Key whose quoted value is replaced
    pub key: String,
    /// Replacement value, written without surrounding quotes
    pub value: String,
}

impl Substitution {
    /// Create a substitution
    pub fn new(
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Apply substitutions to the file at `path` and write it back
///
/// A substitution whose section or key cannot be located is skipped with a
/// warning; the remaining substitutions still apply. An unreadable or
/// unwritable file is fatal.
pub fn apply(path: &Path, substitutions: &[Substitution]) -> Result<()> {
    let mut text = fs::read_to_string(path).map_err(|e| SetupError::ConfigWrite {
        path: path.to_path_buf(),
        reason: format!("could not read file: {}", e),
    })?;

    for sub in substitutions {
        match apply_one(&text, sub) {
            Some(updated) => {
                debug!(section = %sub.section, key = %sub.key, "Patched config value");
                text = updated;
            }
            None => {
                warn!(
                    section = %sub.section,
                    key = %sub.key,
                    "Section or key not found, leaving file unchanged for this key"
                );
            }
        }
    }

    fs::write(path, &text).map_err(|e| SetupError::ConfigWrite {
        path: path.to_path_buf(),
        reason: format!("could not write file: {}", e),
    })
}

/// Apply a single substitution, scanning forward from the section header
///
/// The first `key = "value"` binding at or after the section header is
/// rewritten. Returns `None` when the section or the key pattern is absent.
fn apply_one(text: &str, sub: &Substitution) -> Option<String> {
    let section_start = text.find(&sub.section)?;

    let pattern = format!(r#"(?m)^(\s*{}\s*=\s*)"[^"]*""#, regex::escape(&sub.key));
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures_at(text, section_start)?;

    let whole = caps.get(0)?;
    let prefix = caps.get(1)?.as_str();

    let mut updated = String::with_capacity(text.len() + sub.value.len());
    updated.push_str(&text[..whole.start()]);
    updated.push_str(prefix);
    updated.push('"');
    updated.push_str(&sub.value);
    updated.push('"');
    updated.push_str(&text[whole.end()..]);
    Some(updated)
}
