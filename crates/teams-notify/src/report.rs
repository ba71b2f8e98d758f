//! Final status banners read by the CI job.

use colored::Colorize;

/// Marker prefixed to the success banner.
pub const SUCCESS_MARK: &str = "✔";
/// Marker prefixed to the failure banner.
pub const FAILURE_MARK: &str = "✖";

#[must_use]
pub fn success_banner(message: &str) -> String {
    format!("{SUCCESS_MARK} {message}")
}

#[must_use]
pub fn failure_banner(message: &str) -> String {
    format!("{FAILURE_MARK} {message}")
}

/// Print the success banner.
pub fn print_success(message: &str) {
    println!("{}", success_banner(message).green());
}

/// Print the failure banner.
pub fn print_failure(message: &str) {
    println!("{}", failure_banner(message).red());
}
