//! Error types for the setup tool
//!
//! Provides a unified error type for all setup operations. Every variant
//! except `Seed` is terminal for the run: the stage that produced it has
//! already printed remediation guidance, and the binary exits non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for setup operations
pub type Result<T> = std::result::Result<T, SetupError>;

/// Main error type for setup operations
#[derive(Debug, Error)]
pub enum SetupError {
    /// The wrangler CLI is not installed or not on PATH
    #[error("wrangler CLI not found on PATH")]
    ToolMissing,

    /// Wrangler reported an expired or missing login session
    #[error("wrangler authentication expired or missing")]
    AuthExpired,

    /// The authenticated-identity check failed for an unknown reason
    #[error("could not verify wrangler authentication: {0}")]
    AuthUnverifiable(String),

    /// A database with the requested name already exists
    #[error("database '{0}' already exists")]
    DatabaseExists(String),

    /// Database creation succeeded but no database_id was found in the output
    #[error("could not find a database_id in wrangler output")]
    UnparsableOutput(String),

    /// Database creation failed for an unknown reason
    #[error("database creation failed: {0}")]
    DatabaseCreate(String),

    /// The wrangler configuration file could not be read or written
    #[error("failed to update {path}: {reason}")]
    ConfigWrite { path: PathBuf, reason: String },

    /// Applying local migrations failed
    #[error("applying migrations failed: {0}")]
    Migration(String),

    /// Inserting demo data failed (non-fatal, downgraded to a warning)
    #[error("seeding demo data failed: {0}")]
    Seed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let err = SetupError::DatabaseExists("bhvr-db".to_string());
        assert!(err.to_string().contains("bhvr-db"));

        let err = SetupError::ConfigWrite {
            path: PathBuf::from("server/wrangler.toml"),
            reason: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("server/wrangler.toml"));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SetupError = io.into();
        assert!(matches!(err, SetupError::Io(_)));
    }
}
