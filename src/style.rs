//! Terminal styling for CLI output

use crate::model::Sentiment;
use colored::Colorize;
use std::io::{self, IsTerminal, Write};

/// Print an error message to stderr
pub fn error(msg: &str) {
    eprintln!("{} {}", "error:".red().bold(), msg);
}

/// Print a warning message to stderr
pub fn warning(msg: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), msg);
}

/// Print a success message to stdout
pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print a hint message to stderr (dimmed)
pub fn hint(msg: &str) {
    eprintln!("{} {}", "hint:".dimmed(), msg.dimmed());
}

/// Print a status/info header
pub fn header(msg: &str) {
    println!("{}", msg.cyan().bold());
}

/// Print a progress update to stderr, keeping stdout clean for output
pub fn status(msg: &str) {
    eprintln!("{} {}", "→".blue(), msg);
}

/// Format a path for display (bright white)
pub fn path(p: &std::path::Path) -> String {
    p.display().to_string().bright_white().to_string()
}

/// Color a comment sentiment for list output
pub fn sentiment(s: Sentiment) -> String {
    let label = s.to_string();
    match s {
        Sentiment::Positive => label.green().to_string(),
        Sentiment::Negative => label.red().to_string(),
        Sentiment::Insightful => label.cyan().to_string(),
        Sentiment::Controversial => label.yellow().to_string(),
        Sentiment::Neutral => label.dimmed().to_string(),
    }
}

/// Format a label-value pair for counts and settings
pub fn metric(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {}: {}", label.dimmed(), value.to_string().cyan())
}

/// Format a section header
pub fn section(title: &str) {
    println!("\n{}", title.bold());
}

/// Format a URL for display
pub fn url(u: &str) -> String {
    u.bright_blue().underline().to_string()
}

/// Check if stdout is a terminal (TTY)
pub fn is_terminal() -> bool {
    io::stdout().is_terminal()
}

/// Render markdown to the terminal with colors and formatting.
/// If not a TTY, writes plain markdown.
pub fn render_markdown(markdown: &str, output: &mut dyn Write) -> io::Result<()> {
    if io::stdout().is_terminal() {
        let skin = create_skin();
        let rendered = skin.term_text(markdown);
        write!(output, "{}", rendered)
    } else {
        write!(output, "{}", markdown)
    }
}

/// Create a custom termimad skin with our color scheme
fn create_skin() -> termimad::MadSkin {
    use termimad::*;

    let mut skin = MadSkin::default();

    // Headers - cyan and bold
    skin.set_headers_fg(crossterm::style::Color::Cyan);
    skin.bold.set_fg(crossterm::style::Color::White);

    // Bullet points
    skin.bullet = StyledChar::from_fg_char(crossterm::style::Color::Blue, '•');

    // Quotes from the thread
    skin.quote_mark = StyledChar::from_fg_char(crossterm::style::Color::DarkMagenta, '▐');
    skin.italic.set_fg(crossterm::style::Color::Magenta);

    skin.inline_code.set_fg(crossterm::style::Color::Yellow);

    // Horizontal rules
    skin.horizontal_rule = StyledChar::from_fg_char(crossterm::style::Color::DarkGrey, '─');

    skin
}
