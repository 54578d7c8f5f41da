//! Terminal styling utilities

use console::{style, Emoji};
use std::path::Path;

use crate::pipeline::FilterBounds;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static BOOK: Emoji<'_, '_> = Emoji("📖 ", "");
pub static RULER: Emoji<'_, '_> = Emoji("📏 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("◆").cyan().bold(),
        style("University Outcomes Explorer").cyan().bold()
    );
    println!(
        "    {}",
        style("Explore how institutional features relate to income outcomes").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(data: &Path, dictionary: &Path, filter_column: &str, metric_column: &str) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Data:       {:<35}│",
        FOLDER,
        truncate_path(data, 34)
    );
    println!(
        "    │  {} Dictionary: {:<35}│",
        BOOK,
        truncate_path(dictionary, 34)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Filter:     {:<35}│",
        RULER,
        truncate_string(filter_column, 34)
    );
    println!(
        "    │  {} Metric:     {:<35}│",
        CHART,
        truncate_string(metric_column, 34)
    );
    println!("    └{}┘", line);
    println!();
}

/// Print filter-bounds metadata
pub fn print_bounds(filter_column: &str, bounds: Option<FilterBounds>, default_range: (f64, f64)) {
    println!();
    println!(
        "    {} {}",
        RULER,
        style(format!("Filter column: {}", filter_column)).white().bold()
    );
    match bounds {
        Some(b) => {
            println!("      Min: {}", style(b.min).yellow());
            println!("      Max: {}", style(b.max).yellow());
        }
        None => println!("      {}", style("no values").dim()),
    }
    println!(
        "      Default range: {}",
        style(format!("[{}, {}]", default_range.0, default_range.1)).yellow()
    );
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!("    {} {}", ROCKET, style("Done!").green().bold());
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize) {
    println!("      Found {} {}", style(count).yellow().bold(), description);
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

pub fn truncate_string(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(len - max_len + 3).collect();
        format!("...{}", tail)
    }
}
