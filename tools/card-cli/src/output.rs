//! Terminal rendering for `cards`.
//!
//! Everything human-facing goes through [`Output`]. In `--json` mode the
//! decorated lines are suppressed and commands print a single JSON document
//! instead; errors are still reported, as a JSON object on stderr.

use card_carousel::Move;
use console::style;
use serde::Serialize;

/// Writer for command results and status lines.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    fn human(&self) -> bool {
        !self.json
    }

    pub fn info(&self, msg: &str) {
        if self.human() {
            println!("{} {}", style("ℹ").blue(), msg);
        }
    }

    pub fn success(&self, msg: &str) {
        if self.human() {
            println!("{} {}", style("✓").green(), msg);
        }
    }

    /// Warnings go to stderr so piped timelines stay clean.
    pub fn warn(&self, msg: &str) {
        if self.human() {
            eprintln!("{} {}", style("⚠").yellow(), msg);
        }
    }

    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            eprintln!("{} {}", style("✗").red(), style(msg).red());
        }
    }

    /// Only shown with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if self.verbose && self.human() {
            eprintln!("{} {}", style("→").dim(), style(msg).dim());
        }
    }

    /// Section title, e.g. "Containers" or "Final positions".
    pub fn header(&self, msg: &str) {
        if self.human() {
            println!("\n{}", style(msg).bold().underlined());
        }
    }

    /// Print `value` as pretty JSON, whatever the mode.
    pub fn json<T: Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Indented `key: value` line, used for container settings.
    pub fn kv(&self, key: &str, value: &str) {
        if self.human() {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    /// Left-aligned columns padded to `widths`.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if !self.human() {
            return;
        }
        let cells: Vec<String> = cols
            .iter()
            .zip(widths)
            .map(|(col, width)| format!("{:width$}", col, width = *width))
            .collect();
        println!("  {}", cells.join("  "));
    }

    /// One timeline row: timestamp, container, optional event tag, and the
    /// move it caused if any.
    pub fn timeline_row(&self, at_ms: u128, container: &str, tag: &str, movement: Option<&Move>) {
        if self.human() {
            println!("{}", timeline_row(at_ms, container, tag, movement));
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Colored label for a registration outcome.
pub fn status_badge(status: &str) -> String {
    match status {
        "mounted" => style(status).green().to_string(),
        "abstained" => style(status).yellow().to_string(),
        "static" => style(status).dim().to_string(),
        _ => status.to_string(),
    }
}

/// Format a virtual timestamp in milliseconds.
pub fn format_millis(ms: u128) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{}.{:03}s", ms / 1000, ms % 1000)
    }
}

fn timeline_row(at_ms: u128, container: &str, tag: &str, movement: Option<&Move>) -> String {
    let head = format!("  {:>9}  {:<22} {:<8}", format_millis(at_ms), container, tag);
    match movement {
        Some(m) => format!(
            "{} {:>3} -> {:<3} {:<9} {}",
            head,
            m.from,
            m.to,
            m.cause.as_str(),
            m.offset.css_transform()
        ),
        None => head.trim_end().to_string(),
    }
}
