//! # Output Configuration
//!
//! Controls how command status lines look, based on terminal capabilities
//! and user preferences.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//! - `--quiet` - Suppresses status lines entirely; errors still go to stderr
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nuspec_pack::output::{OutputConfig, Status};
//!
//! let out = OutputConfig::from_env_and_flag("auto");
//! out.status(Status::Success, "Package created");
//! ```

use std::env;
use std::fmt::Display;

use console::style;

/// Output configuration for controlling colors, emojis and verbosity.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
    /// Whether status lines are suppressed.
    pub quiet: bool,
}

/// Kinds of status line a command prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Working,
    Success,
    Warning,
    Detail,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stdout is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self {
            use_color,
            quiet: false,
        }
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// The prefix shown in front of a status line.
    pub fn prefix(&self, status: Status) -> String {
        let (icon, plain) = match status {
            Status::Working => ("📦", "[PACK]"),
            Status::Success => ("✅", "[OK]"),
            Status::Warning => ("⚠️", "[WARN]"),
            Status::Detail => ("  ", "  "),
        };
        if !self.use_color {
            return plain.to_string();
        }
        match status {
            Status::Success => style(icon).green().force_styling(true).to_string(),
            Status::Warning => style(icon).yellow().force_styling(true).to_string(),
            _ => icon.to_string(),
        }
    }

    /// Format a status line without printing it.
    pub fn format(&self, status: Status, message: impl Display) -> String {
        format!("{} {}", self.prefix(status), message)
    }

    /// Print a status line to stdout unless quiet.
    pub fn status(&self, status: Status, message: impl Display) {
        if !self.quiet {
            println!("{}", self.format(status, message));
        }
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self {
            use_color: true,
            quiet: false,
        }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self {
            use_color: false,
            quiet: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, otherwise the plain text.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}
