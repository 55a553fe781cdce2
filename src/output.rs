//! Terminal output styling.
//!
//! All user-facing messages go through [`OutputFormatter`] so the markers
//! and colors stay consistent. `colored` drops the escape codes when the
//! output is not a terminal.

use colored::*;

/// Prints styled status lines.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use reorgmap::output::OutputFormatter;
    /// OutputFormatter::success("Wrote reorg_map.csv with 12 entries");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark, on stderr.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }
}
