//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Format optional bounds as `[min, max]` or `unbounded`
pub fn format_bounds(min: Option<i64>, max: Option<i64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("[{}, {}]", min, max),
        (Some(min), None) => format!("[{}, ..)", min),
        (None, Some(max)) => format!("(.., {}]", max),
        (None, None) => "unbounded".to_string(),
    }
}

/// Format a unix timestamp for display
pub fn format_timestamp(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

/// Format a capacity change, e.g. `2 → 5 (+3)`
pub fn format_change(previous: i64, target: i64) -> String {
    let delta = target - previous;
    let arrow = format!("{} → {}", previous, target);
    match delta.signum() {
        1 => format!("{} ({})", arrow, format!("+{}", delta).green()),
        -1 => format!("{} ({})", arrow, delta.to_string().yellow()),
        _ => format!("{} ({})", arrow, "unchanged".dimmed()),
    }
}

/// Color status based on value
pub fn color_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "healthy" | "ready" | "done" => status.green().to_string(),
        "degraded" => status.yellow().to_string(),
        "unhealthy" | "failed" | "not ready" => status.red().to_string(),
        _ => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bounds() {
        assert_eq!(format_bounds(Some(1), Some(5)), "[1, 5]");
        assert_eq!(format_bounds(None, None), "unbounded");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
    }

    #[test]
    fn test_format_change_mentions_both_counts() {
        colored::control::set_override(false);
        assert_eq!(format_change(2, 5), "2 → 5 (+3)");
        assert_eq!(format_change(7, 5), "7 → 5 (-2)");
        assert_eq!(format_change(3, 3), "3 → 3 (unchanged)");
    }
}
