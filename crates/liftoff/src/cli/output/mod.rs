//! Terminal messages for the text output format
//!
//! Results go to stdout; failures go to stderr so `--format json` output stays
//! parseable.

use console::style;

/// A step that completed, such as a build attached to a group
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// The failure that ended the run
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

pub fn warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Progress or a dry-run preview
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Title line printed before a release starts
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// Indented `label: value` line under a header
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}
