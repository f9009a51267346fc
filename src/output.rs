//! Output Formatting - Table, JSON, and CSV output
//!
//! This module provides consistent output formatting across all CLI
//! commands with support for tables, status glyphs, raw JSON
//! passthrough, and CSV rows.

use std::io;

use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use serde::Serialize;

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text and tables
    #[default]
    Text,
    /// JSON for machine processing
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Output writer that handles formatting based on configuration
#[derive(Clone, Copy)]
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Check if JSON output was requested
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Whether stdout is an attended terminal
    pub fn attended(&self) -> bool {
        console::user_attended()
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green().bold(), message);
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", style("⚠").yellow().bold(), message);
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red().bold(), message);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").cyan().bold(), message);
    }

    /// Print raw output
    pub fn print(&self, message: &str) {
        println!("{}", message);
    }

    /// Print a value as pretty JSON
    pub fn json<T: Serialize + ?Sized>(&self, data: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        println!("{}", json);
        Ok(())
    }

    /// Re-print a raw JSON response body, pretty-printed when it parses
    pub fn json_raw(&self, body: &str) {
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => match serde_json::to_string_pretty(&value) {
                Ok(pretty) => println!("{}", pretty),
                Err(_) => println!("{}", body),
            },
            Err(_) => println!("{}", body),
        }
    }

    /// Print one CSV row with standard quoting
    pub fn csv_row(&self, fields: &[String]) {
        let row = fields
            .iter()
            .map(|f| escape_csv(f))
            .collect::<Vec<_>>()
            .join(",");
        println!("{}", row);
    }

    /// Print a table
    pub fn table(&self, table: &Table) {
        println!("{}", table);
    }

    /// Create a new styled table
    pub fn create_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }

    /// Create a table with headers
    pub fn create_table_with_headers(&self, headers: &[&str]) -> Table {
        let mut table = self.create_table();
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
        table
    }

    /// Spinner shown while a server call is in flight. Hidden when the
    /// output is not an attended text terminal.
    pub fn spinner(&self, message: &str) -> ProgressIndicator {
        if self.format == OutputFormat::Text && self.attended() {
            ProgressIndicator::spinner(message)
        } else {
            ProgressIndicator::hidden()
        }
    }
}

/// Progress indicator for long-running operations
pub struct ProgressIndicator {
    bar: indicatif::ProgressBar,
}

impl ProgressIndicator {
    /// Create a new spinner progress indicator
    pub fn spinner(message: &str) -> Self {
        let bar = indicatif::ProgressBar::new_spinner();
        bar.set_style(
            indicatif::ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("Valid template"),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { bar }
    }

    /// Create an indicator that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: indicatif::ProgressBar::hidden(),
        }
    }

    /// Finish and clear
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

/// Quote a CSV field when it contains a delimiter, quote, or newline
fn escape_csv(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
