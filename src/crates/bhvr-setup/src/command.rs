//! External tool invocation
//!
//! Runs the wrangler CLI as a child process, captures its combined output,
//! and classifies failures by matching known substrings. Arguments are
//! always passed as a vector, never through a shell, so metacharacters in
//! operator input cannot be interpreted.
//!
//! Classification is advisory only: it selects which remediation message
//! the orchestrator prints, it never drives an automatic retry.

use crate::console;
use crate::error::{Result, SetupError};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use tracing::debug;

/// Name of the external CLI this tool drives
pub const WRANGLER: &str = "wrangler";

/// Known cause of a failed invocation
///
/// Matched against the lower-cased combined output, first match wins.
/// Non-English wrangler output is a known limitation: it will classify as
/// `Unknown` and fall through to the generic remediation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The invocation exited cleanly
    None,
    /// Login session missing or expired
    AuthExpired,
    /// The resource being created already exists
    AlreadyExists,
    /// No known cause matched
    Unknown,
}

/// Classify the combined output of a failed invocation
pub fn classify(combined_output: &str) -> ErrorCategory {
    let lowered = combined_output.to_lowercase();

    const AUTH_MARKERS: [&str; 4] = ["authentication", "login", "expired", "token"];
    const EXISTS_MARKERS: [&str; 2] = ["already exists", "duplicate"];

    if AUTH_MARKERS.iter().any(|m| lowered.contains(m)) {
        ErrorCategory::AuthExpired
    } else if EXISTS_MARKERS.iter().any(|m| lowered.contains(m)) {
        ErrorCategory::AlreadyExists
    } else {
        ErrorCategory::Unknown
    }
}

/// Outcome of one external invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// True when the process exited with status zero
    pub exited_cleanly: bool,
    /// Stdout and stderr, concatenated in that order
    pub combined_output: String,
    /// Known failure cause, `None` for clean exits
    pub category: ErrorCategory,
}

impl CommandOutcome {
    /// Build an outcome, classifying the output only on unclean exits
    pub fn new(exited_cleanly: bool, combined_output: String) -> Self {
        let category = if exited_cleanly {
            ErrorCategory::None
        } else {
            classify(&combined_output)
        };
        Self {
            exited_cleanly,
            combined_output,
            category,
        }
    }
}

/// Seam for invoking external command-line tools
///
/// The orchestrator only depends on this trait; tests substitute a scripted
/// implementation so no real wrangler binary is needed.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the tool, capturing output without echoing it
    async fn run_quiet(&self, args: &[&str]) -> Result<CommandOutcome>;

    /// Run the tool and echo the captured output as an indented code block
    async fn run(&self, args: &[&str]) -> Result<CommandOutcome> {
        let outcome = self.run_quiet(args).await?;
        if !outcome.combined_output.trim().is_empty() {
            console::code(&outcome.combined_output);
        }
        Ok(outcome)
    }
}

/// Real runner backed by `tokio::process`
pub struct WranglerCli {
    program: String,
}

impl WranglerCli {
    /// Runner for the wrangler CLI found on PATH
    pub fn new() -> Self {
        Self::with_program(WRANGLER)
    }

    /// Runner for an arbitrary program (used by tests)
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for WranglerCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for WranglerCli {
    async fn run_quiet(&self, args: &[&str]) -> Result<CommandOutcome> {
        debug!(program = %self.program, ?args, "Invoking external tool");

        let output = tokio::process::Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    SetupError::ToolMissing
                } else {
                    SetupError::Io(e)
                }
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        let outcome = CommandOutcome::new(output.status.success(), combined);
        debug!(
            exited_cleanly = outcome.exited_cleanly,
            category = ?outcome.category,
            "External tool finished"
        );
        Ok(outcome)
    }
}

/// Extract the database identifier from `wrangler d1 create` output
///
/// Wrangler prints a ready-to-paste TOML snippet containing a line of the
/// form `database_id = "<uuid>"`. Returns `None` when no such line exists
/// so the caller can fall back to manual instructions with the raw output.
pub fn extract_database_id(output: &str) -> Option<String> {
    let re = Regex::new(r#"database_id\s*=\s*"([^"]+)""#).ok()?;
    re.captures(output).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_auth_markers() {
        assert_eq!(classify("Error: OAuth token has expired"), ErrorCategory::AuthExpired);
        assert_eq!(classify("please run wrangler LOGIN"), ErrorCategory::AuthExpired);
        assert_eq!(classify("Authentication required"), ErrorCategory::AuthExpired);
    }

    #[test]
    fn test_classify_already_exists() {
        assert_eq!(
            classify("a database with that name already exists"),
            ErrorCategory::AlreadyExists
        );
        assert_eq!(classify("Duplicate entry"), ErrorCategory::AlreadyExists);
    }

    #[test]
    fn test_classify_auth_wins_over_exists() {
        // "token" and "already exists" together: auth markers are checked first
        assert_eq!(
            classify("token invalid; database already exists"),
            ErrorCategory::AuthExpired
        );
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("network unreachable"), ErrorCategory::Unknown);
        assert_eq!(classify(""), ErrorCategory::Unknown);
    }

    #[test]
    fn test_outcome_clean_exit_not_classified() {
        // A clean exit mentioning "token" in ordinary output stays None
        let outcome = CommandOutcome::new(true, "token count: 3".to_string());
        assert_eq!(outcome.category, ErrorCategory::None);
    }

    #[test]
    fn test_outcome_unclean_exit_classified() {
        let outcome = CommandOutcome::new(false, "login required".to_string());
        assert_eq!(outcome.category, ErrorCategory::AuthExpired);
    }

    #[test]
    fn test_extract_database_id_exact() {
        let output = "Created your database!\n\n[[d1_databases]]\nbinding = \"DB\"\ndatabase_name = \"bhvr-db\"\ndatabase_id = \"abc-123\"\n";
        assert_eq!(extract_database_id(output), Some("abc-123".to_string()));
    }

    #[test]
    fn test_extract_database_id_uuid_with_hyphens() {
        let output = "database_id = \"f5b2e1c4-9a3d-4e7b-8c6f-0123456789ab\"";
        assert_eq!(
            extract_database_id(output),
            Some("f5b2e1c4-9a3d-4e7b-8c6f-0123456789ab".to_string())
        );
    }

    #[test]
    fn test_extract_database_id_tolerates_spacing() {
        assert_eq!(
            extract_database_id("database_id=\"tight\""),
            Some("tight".to_string())
        );
        assert_eq!(
            extract_database_id("database_id   =   \"spaced\""),
            Some("spaced".to_string())
        );
    }

    #[test]
    fn test_extract_database_id_absent() {
        assert_eq!(extract_database_id("Created your database!"), None);
        assert_eq!(extract_database_id(""), None);
    }

    #[tokio::test]
    async fn test_runner_captures_output() {
        let runner = WranglerCli::with_program("echo");
        let outcome = runner.run_quiet(&["hello"]).await.unwrap();
        assert!(outcome.exited_cleanly);
        assert_eq!(outcome.category, ErrorCategory::None);
        assert!(outcome.combined_output.contains("hello"));
    }

    #[tokio::test]
    async fn test_runner_missing_tool() {
        let runner = WranglerCli::with_program("bhvr-setup-no-such-tool");
        let err = runner.run_quiet(&["--version"]).await.unwrap_err();
        assert!(matches!(err, SetupError::ToolMissing));
    }
}
