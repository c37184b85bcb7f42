//! Terminal output helpers

use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use terminal_size::{terminal_size, Height, Width};

pub fn print_header(title: &str, detail: &str) {
    let (width, _) = terminal_size().unwrap_or((Width(80), Height(24)));
    let line = "─".repeat(width.0 as usize);
    println!("{}", line.black().bold());

    let name = "Envoy".yellow().bold();
    let version = format!("v{}", env!("CARGO_PKG_VERSION")).black().bold();
    println!("  {} {}  {}", name, version, title.bold());
    println!("  {}", detail.cyan());

    println!("{}", line.black().bold());
}

pub fn print_step(msg: &str) {
    println!("  {} {}", "•".green(), msg);
}

pub fn print_success(msg: &str) {
    println!("  {} {}", "✓".green().bold(), msg.green());
}

pub fn print_warning(msg: &str) {
    println!("  {} {}", "⚠️ ".yellow().bold(), msg.yellow());
}

pub fn print_error(msg: &str) {
    println!("  {} {}", "❌".red().bold(), msg.red());
}

pub fn print_thinking(msg: &str) {
    println!("  {} {}...", "∴".magenta(), msg);
}

/// Spinner shown while a turn is in flight. Call `finish_and_clear` on it.
pub fn spinner(msg: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("  {spinner:.magenta} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(msg.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
