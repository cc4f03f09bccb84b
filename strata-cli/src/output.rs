//! Styled terminal output utilities.

use owo_colors::OwoColorize;

/// Print a blank line.
pub fn newline() {
    println!();
}

/// Print a section header.
pub fn section(text: &str) {
    println!("{}", text.bold());
}

/// Print a success message.
pub fn success(text: &str) {
    println!("{} {}", "✔".green().bold(), text.green());
}

/// Print an info message.
pub fn info(text: &str) {
    println!("{} {}", "ℹ".blue().bold(), text);
}

/// Print a warning message.
pub fn warn(text: &str) {
    println!("{} {}", "⚠".yellow().bold(), text.yellow());
}

/// Print an error message.
pub fn error(text: &str) {
    eprintln!("{} {}", "✖".red().bold(), text.red());
}

/// Print a list item.
pub fn list_item(text: &str) {
    println!("  {} {}", "•".dimmed(), text);
}

/// Ask the operator for an explicit `yes`.
pub fn confirm(prompt: &str) -> std::io::Result<bool> {
    use std::io::Write;

    print!("{} [yes/NO]: ", prompt.yellow().bold());
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("yes"))
}
