//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.
//!
//! With `--log FILE` every status line is also appended (uncolored) to
//! FILE via the process-wide tee sink.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use colored::Colorize;

static LOG_SINK: OnceLock<Mutex<File>> = OnceLock::new();

/// Open the `--log` tee file (append mode). A second call is a no-op.
pub fn init_log_file(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = LOG_SINK.set(Mutex::new(file));
    Ok(())
}

fn tee(line: &str) {
    if let Some(sink) = LOG_SINK.get() {
        if let Ok(mut file) = sink.lock() {
            let _ = writeln!(file, "{line}");
        }
    }
}

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
    tee(&format!("error: {msg}"));
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
    tee(&format!("Warning: {msg}"));
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
    tee(&format!("✓ {msg}"));
}

/// Print success status indented (green checkmark with leading spaces)
pub fn success_detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {} {}", "✓".green(), msg);
    tee(&format!("  ✓ {msg}"));
}

/// Print failure status (red X, indented)
pub fn failure(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {} {}", "✗".red(), msg);
    tee(&format!("  ✗ {msg}"));
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
    tee(&format!("{label}: {msg}"));
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
    tee(&msg.to_string());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
    tee(&format!("  {msg}"));
}

/// Print plain output (no color, for data passed through from tools)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
    tee(&msg.to_string());
}

/// Print a command that was skipped because of --dry-run (yellow prefix)
pub fn dry_run(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "dry-run:".yellow().bold(), msg);
    tee(&format!("dry-run: {msg}"));
}

/// Ask a yes/no question on the terminal. Returns false on anything
/// but an explicit `y`/`yes`.
pub fn confirm(question: &(impl std::fmt::Display + ?Sized)) -> io::Result<bool> {
    print!("{} [y/N] ", question.to_string().cyan());
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
