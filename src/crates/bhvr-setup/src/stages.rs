//! Setup orchestration
//!
//! Runs the six provisioning stages in strict order, each gated on the
//! previous one: tool check, auth check, database creation, config patch,
//! migrations, demo seed. Every stage before seeding is fatal on failure;
//! seeding is best-effort because demo rows are a convenience and may
//! already exist on a second run.
//!
//! Stages are attempted exactly once. There is no retry loop: the operator
//! fixes the underlying problem and re-runs the whole tool, or follows the
//! printed manual recipe.

use crate::command::{extract_database_id, CommandOutcome, CommandRunner, ErrorCategory};
use crate::console::{self, Level};
use crate::error::{Result, SetupError};
use crate::patch::{self, Substitution};
use crate::prompt::PromptInput;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Database name used when the operator presses enter at the prompt
pub const DEFAULT_DB_NAME: &str = "bhvr-db";

/// Default location of the server's wrangler configuration
pub const DEFAULT_CONFIG_PATH: &str = "server/wrangler.toml";

/// Section header of the production d1 binding in wrangler.toml
pub const PRODUCTION_SECTION: &str = "[[env.production.d1_databases]]";

/// Demo rows inserted by the seed stage
const SEED_SQL: &str =
    "INSERT INTO users (name, email) VALUES ('Demo User', 'demo@example.com');";

/// Re-authentication command printed whenever the auth check fails
const LOGIN_COMMAND: &str = "wrangler login";

/// Remediation script for a failed auth check
///
/// Returns the lines to print and the error to propagate, so the exact
/// operator-facing text is testable without capturing stdout.
fn auth_failure(outcome: CommandOutcome) -> (Vec<(Level, String)>, SetupError) {
    match outcome.category {
        ErrorCategory::AuthExpired => (
            vec![
                (
                    Level::Error,
                    "Your Cloudflare session is missing or expired.".to_string(),
                ),
                (Level::Info, "Log in again, then re-run this setup:".to_string()),
                (Level::Code, LOGIN_COMMAND.to_string()),
            ],
            SetupError::AuthExpired,
        ),
        _ => (
            vec![
                (
                    Level::Error,
                    "Could not verify wrangler authentication.".to_string(),
                ),
                (Level::Code, outcome.combined_output.clone()),
                (
                    Level::Info,
                    "Try logging in, then re-run this setup:".to_string(),
                ),
                (Level::Code, LOGIN_COMMAND.to_string()),
            ],
            SetupError::AuthUnverifiable(outcome.combined_output),
        ),
    }
}

/// Identifier and name of the freshly created database
#[derive(Debug, Clone, Serialize)]
pub struct DbProvision {
    /// Identifier assigned by Cloudflare, parsed from the create output
    pub database_id: String,
    /// Name the operator chose (or the default)
    pub database_name: String,
}

/// Sequences the setup stages against injected collaborators
///
/// The command runner and prompt are trait objects' worth of seams so the
/// whole flow can be exercised in tests with scripted replies and no real
/// wrangler binary.
pub struct Setup<R: CommandRunner, P: PromptInput> {
    runner: R,
    prompt: P,
    config_path: PathBuf,
}

impl<R: CommandRunner, P: PromptInput> Setup<R, P> {
    /// Create a setup flow over the given collaborators
    pub fn new(runner: R, prompt: P, config_path: PathBuf) -> Self {
        Self {
            runner,
            prompt,
            config_path,
        }
    }

    /// Run all stages in order
    ///
    /// Returns `Err` only for stages whose failure aborts the run; the
    /// failing stage has already printed its remediation recipe. A seed
    /// failure is downgraded to a warning and the summary still prints.
    pub async fn run(&mut self) -> Result<()> {
        console::emphasis("bhvr setup");
        console::info("Provisions a Cloudflare D1 database and wires it into the production config.");
        println!();

        self.check_tool().await?;
        self.check_auth().await?;
        let db = self.create_database().await?;
        self.patch_config(&db)?;
        self.apply_migrations(&db).await?;

        if let Err(e) = self.seed_data(&db).await {
            debug!(error = %e, "Seed stage failed");
            console::warn("Could not insert demo data (it may already be seeded). Continuing.");
        }

        self.print_summary(&db);
        Ok(())
    }

    /// Stage 1: verify the wrangler CLI is installed
    async fn check_tool(&self) -> Result<()> {
        console::emphasis("Step 1/6: Checking for the wrangler CLI");

        let outcome = match self.runner.run_quiet(&["--version"]).await {
            Ok(outcome) => outcome,
            Err(SetupError::ToolMissing) => {
                self.print_install_guidance();
                return Err(SetupError::ToolMissing);
            }
            Err(e) => {
                console::error(&format!("Could not run wrangler: {}", e));
                return Err(e);
            }
        };

        if !outcome.exited_cleanly {
            console::code(&outcome.combined_output);
            self.print_install_guidance();
            return Err(SetupError::ToolMissing);
        }

        console::success(&format!("Found {}", outcome.combined_output.trim()));
        Ok(())
    }

    fn print_install_guidance(&self) {
        console::error("The wrangler CLI is not available.");
        console::info("Install it, then re-run this setup:");
        console::code("npm install -g wrangler");
    }

    /// Stage 2: verify the operator is logged in to Cloudflare
    async fn check_auth(&self) -> Result<()> {
        console::emphasis("Step 2/6: Checking wrangler authentication");

        let outcome = self.runner.run_quiet(&["whoami"]).await?;
        if outcome.exited_cleanly {
            console::success("Logged in to Cloudflare");
            return Ok(());
        }

        let (lines, err) = auth_failure(outcome);
        for (level, line) in &lines {
            console::print(*level, line);
        }
        Err(err)
    }

    /// Stage 3: prompt for a name and create the production database
    async fn create_database(&mut self) -> Result<DbProvision> {
        console::emphasis("Step 3/6: Creating the production database");

        let reply = self
            .prompt
            .ask(&format!("Database name [{}]:", DEFAULT_DB_NAME))?;
        let name = if reply.is_empty() {
            DEFAULT_DB_NAME.to_string()
        } else {
            reply
        };

        let outcome = self.runner.run(&["d1", "create", &name]).await?;

        if !outcome.exited_cleanly {
            return match outcome.category {
                ErrorCategory::AlreadyExists => {
                    console::error(&format!("A database named '{}' already exists.", name));
                    console::info("Reuse it by looking up its id:");
                    console::code("wrangler d1 list");
                    self.print_manual_setup(&name);
                    Err(SetupError::DatabaseExists(name))
                }
                _ => {
                    console::error("Database creation failed.");
                    self.print_manual_setup(&name);
                    Err(SetupError::DatabaseCreate(outcome.combined_output))
                }
            };
        }

        match extract_database_id(&outcome.combined_output) {
            Some(id) => {
                console::success(&format!("Created database '{}' ({})", name, id));
                Ok(DbProvision {
                    database_id: id,
                    database_name: name,
                })
            }
            None => {
                console::error(
                    "The database was created but no database_id was found in the output above.",
                );
                self.print_manual_setup(&name);
                Err(SetupError::UnparsableOutput(outcome.combined_output))
            }
        }
    }

    /// Stage 4: point the production config at the new database
    fn patch_config(&self, db: &DbProvision) -> Result<()> {
        console::emphasis(&format!(
            "Step 4/6: Updating {}",
            self.config_path.display()
        ));

        let substitutions = [
            Substitution::new(PRODUCTION_SECTION, "database_name", db.database_name.as_str()),
            Substitution::new(PRODUCTION_SECTION, "database_id", db.database_id.as_str()),
        ];

        match patch::apply(&self.config_path, &substitutions) {
            Ok(()) => {
                console::success(&format!("Updated {}", self.config_path.display()));
                Ok(())
            }
            Err(e) => {
                console::error(&format!(
                    "Could not update {}.",
                    self.config_path.display()
                ));
                console::info(&format!(
                    "Edit it by hand: set these values under {}:",
                    PRODUCTION_SECTION
                ));
                console::code(&format!("database_name = \"{}\"", db.database_name));
                console::code(&format!("database_id = \"{}\"", db.database_id));
                Err(e)
            }
        }
    }

    /// Stage 5: apply migrations to the local database
    async fn apply_migrations(&self, db: &DbProvision) -> Result<()> {
        console::emphasis("Step 5/6: Applying local migrations");

        let outcome = self
            .runner
            .run(&["d1", "migrations", "apply", &db.database_name, "--local"])
            .await?;

        if outcome.exited_cleanly {
            console::success("Migrations applied");
            Ok(())
        } else {
            console::error("Applying migrations failed.");
            console::info("Fix the error above, then re-run:");
            console::code(&format!(
                "wrangler d1 migrations apply {} --local",
                db.database_name
            ));
            Err(SetupError::Migration(outcome.combined_output))
        }
    }

    /// Stage 6: insert demo rows (best-effort)
    async fn seed_data(&self, db: &DbProvision) -> Result<()> {
        console::emphasis("Step 6/6: Inserting demo data");

        let outcome = self
            .runner
            .run_quiet(&[
                "d1",
                "execute",
                &db.database_name,
                "--local",
                "--command",
                SEED_SQL,
            ])
            .await?;

        if outcome.exited_cleanly {
            console::success("Demo data inserted");
            Ok(())
        } else {
            Err(SetupError::Seed(outcome.combined_output))
        }
    }

    /// Self-contained recipe for finishing setup without this tool
    fn print_manual_setup(&self, name: &str) {
        console::info("To finish setup manually:");
        console::code(&format!("wrangler d1 create {}", name));
        console::info(&format!(
            "Copy the database_id from the output into the {} block of {}, then run:",
            PRODUCTION_SECTION,
            self.config_path.display()
        ));
        console::code(&format!("wrangler d1 migrations apply {} --local", name));
    }

    fn print_summary(&self, db: &DbProvision) {
        println!();
        console::emphasis("Setup complete!");
        console::success(&format!(
            "Production database '{}' is ready ({})",
            db.database_name, db.database_id
        ));
        console::info("Start the dev server:");
        console::code("bun run dev");
        console::info("Deploy when you are ready:");
        console::code("bun run deploy");
    }
}
