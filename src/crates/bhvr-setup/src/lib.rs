//! # bhvr-setup
//!
//! One-time interactive setup for the bhvr fullstack starter. Provisions a
//! Cloudflare D1 database through the `wrangler` CLI, rewrites the
//! production bindings in `server/wrangler.toml`, applies local migrations,
//! and seeds demo data.
//!
//! The flow is strictly sequential: each stage runs once and gates the
//! next, with the seed stage tolerated as best-effort. Every abort path
//! prints the exact commands needed to finish setup by hand, so a failed
//! run never leaves the operator guessing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bhvr_setup::{Setup, StdinPrompt, WranglerCli, DEFAULT_CONFIG_PATH};
//! use std::path::PathBuf;
//!
//! # async fn example() -> bhvr_setup::Result<()> {
//! let mut setup = Setup::new(
//!     WranglerCli::new(),
//!     StdinPrompt,
//!     PathBuf::from(DEFAULT_CONFIG_PATH),
//! );
//! setup.run().await?;
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod command;
pub mod console;
pub mod patch;
pub mod prompt;
pub mod stages;
pub mod version;

// Error types and utilities
mod error;

// Re-export key types for convenience
pub use command::{classify, extract_database_id, CommandOutcome, CommandRunner, ErrorCategory, WranglerCli};
pub use patch::Substitution;
pub use prompt::{PromptInput, StdinPrompt};
pub use stages::{DbProvision, Setup, DEFAULT_CONFIG_PATH, DEFAULT_DB_NAME, PRODUCTION_SECTION};

// Error types
pub use error::{Result, SetupError};

// Re-export version utilities
pub use version::full_version as version_info;
