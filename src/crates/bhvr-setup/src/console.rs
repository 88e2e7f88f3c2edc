//! Terminal status output
//!
//! Every user-facing line the setup tool prints goes through one of the
//! helpers here. Rendering is a pure function of a semantic level and a
//! message, so there is no ambient color state to manage and the formatting
//! can be tested without a terminal.

use colored::Colorize;

/// Semantic level of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Section banner / step heading
    Emphasis,
    /// Completed action
    Success,
    /// Neutral information
    Info,
    /// Non-fatal problem
    Warn,
    /// Fatal problem
    Error,
    /// Verbatim command or tool output, indented
    Code,
}

/// Render one status line for the given level
pub fn render(level: Level, message: &str) -> String {
    match level {
        Level::Emphasis => message.bold().to_string(),
        Level::Success => format!("✓ {}", message).green().bold().to_string(),
        Level::Info => message.cyan().to_string(),
        Level::Warn => format!("⚠ {}", message).yellow().to_string(),
        Level::Error => format!("✗ {}", message).red().bold().to_string(),
        Level::Code => format!("  {}", message).bright_black().to_string(),
    }
}

/// Print one line at the given level
pub fn print(level: Level, message: &str) {
    match level {
        Level::Emphasis => emphasis(message),
        Level::Success => success(message),
        Level::Info => info(message),
        Level::Warn => warn(message),
        Level::Error => error(message),
        Level::Code => code(message),
    }
}

/// Print a step heading
pub fn emphasis(message: &str) {
    println!("{}", render(Level::Emphasis, message));
}

/// Print a success line
pub fn success(message: &str) {
    println!("{}", render(Level::Success, message));
}

/// Print an informational line
pub fn info(message: &str) {
    println!("{}", render(Level::Info, message));
}

/// Print a warning line
pub fn warn(message: &str) {
    println!("{}", render(Level::Warn, message));
}

/// Print an error line
pub fn error(message: &str) {
    eprintln!("{}", render(Level::Error, message));
}

/// Print a verbatim command or captured tool output
///
/// Multi-line messages are indented line by line so pasted tool output
/// stays visually grouped under the status line above it.
pub fn code(message: &str) {
    for line in message.lines() {
        println!("{}", render(Level::Code, line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Color codes stay off for the whole test binary; these tests assert on
    // the plain text and run in parallel threads.
    fn plain(level: Level, message: &str) -> String {
        colored::control::set_override(false);
        render(level, message)
    }

    #[test]
    fn test_success_prefix() {
        assert_eq!(plain(Level::Success, "done"), "✓ done");
    }

    #[test]
    fn test_warn_prefix() {
        assert_eq!(plain(Level::Warn, "careful"), "⚠ careful");
    }

    #[test]
    fn test_error_prefix() {
        assert_eq!(plain(Level::Error, "broken"), "✗ broken");
    }

    #[test]
    fn test_info_and_emphasis_unprefixed() {
        assert_eq!(plain(Level::Info, "note"), "note");
        assert_eq!(plain(Level::Emphasis, "Step 1"), "Step 1");
    }

    #[test]
    fn test_code_indented() {
        assert_eq!(plain(Level::Code, "wrangler login"), "  wrangler login");
    }
}
