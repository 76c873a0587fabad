//! Terminal styling helpers
//!
//! Colors are always emitted; `anstream` strips them when stdout is not a
//! terminal.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Check mark used in summaries
pub const CHECK: &str = "✓";

/// Cross used in summaries
pub const CROSS: &str = "✗";

/// Semantic styles for CLI output
pub trait Stylize: Display {
    /// Bold
    fn emphasis(&self) -> String {
        self.to_string().bold().to_string()
    }

    /// Dimmed
    fn muted(&self) -> String {
        self.to_string().dimmed().to_string()
    }

    /// Cyan, for names and numbers
    fn accent(&self) -> String {
        self.to_string().cyan().to_string()
    }

    /// Green
    fn success(&self) -> String {
        self.to_string().green().to_string()
    }

    /// Red
    fn danger(&self) -> String {
        self.to_string().red().to_string()
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Red cross
pub fn cross() -> String {
    CROSS.danger()
}

/// Spinner style shared by commands
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
