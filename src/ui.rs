use colored::Colorize;

use crate::transcript;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
    transcript::record(&format!("ℹ {msg}"));
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
    transcript::record(&format!("✓ {msg}"));
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
    transcript::record(&format!("⚠ {msg}"));
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
    transcript::record(&format!("✗ {msg}"));
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
    transcript::record(&format!("  {msg}"));
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", underline(title).dimmed());
    transcript::record(title);
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
    transcript::record(title);
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
    transcript::record(&format!("  {key}: {value}"));
}

/// Print a block of text as-is
pub fn plain(text: &str) {
    println!("{text}");
    transcript::record(text);
}

fn underline(title: &str) -> String {
    "─".repeat(title.chars().count())
}

/// Print the nova banner
pub fn banner() {
    let art = r#"
  ███╗   ██╗ ██████╗ ██╗   ██╗ █████╗
  ████╗  ██║██╔═══██╗██║   ██║██╔══██╗
  ██╔██╗ ██║██║   ██║██║   ██║███████║
  ██║╚██╗██║██║   ██║╚██╗ ██╔╝██╔══██║
  ██║ ╚████║╚██████╔╝ ╚████╔╝ ██║  ██║
  ╚═╝  ╚═══╝ ╚═════╝   ╚═══╝  ╚═╝  ╚═╝
"#;
    println!("{}", art.cyan());
    transcript::record(art.trim_matches('\n'));
}
