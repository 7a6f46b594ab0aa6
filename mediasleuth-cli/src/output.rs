// ============================================================================
// mediasleuth-cli/src/output.rs
// ============================================================================
//
// TERMINAL OUTPUT: Rows, Summary and JSON
//
// `TerminalSink` is the display sink of the CLI. It keeps the authoritative
// rows in an `InspectionTable` and echoes every applied snapshot as one
// compact status line, so the user sees a file move from placeholder to
// final row. Once every file is done the summary prints each final row as a
// block of aligned label/value lines, or the records as JSON.
//
// Output goes to stdout; logs go to stderr through env_logger.
//
// AI-ASSISTANT-INFO: Terminal display sink, summary table and JSON output

// ---- External crate imports ----
use console::style;
use once_cell::sync::Lazy;
use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

// ---- Standard library imports ----
use std::io::{self, Write};

// ---- Internal crate imports ----
use mediasleuth_core::properties::{LOADING, NOT_AVAILABLE};
use mediasleuth_core::{
    COLUMNS, DisplayRow, DisplaySink, InspectionId, InspectionRecord, InspectionTable, SinkUpdate,
};

/// Columns echoed on each progress line, after the file name.
const PROGRESS_COLUMNS: [&str; 5] = [
    "content_duration",
    "slate",
    "op48_audio",
    "op59_audio",
    "slate_key_number",
];

static USE_COLOR: Lazy<bool> = Lazy::new(|| {
    std::env::var_os("NO_COLOR").is_none()
        && supports_color::on(supports_color::Stream::Stdout).is_some()
});

/// Check if color should be used (respects NO_COLOR and non-terminal stdout)
fn should_use_color() -> bool {
    *USE_COLOR
}

/// Colors a cell by what it says.
fn paint(column: &str, value: &str) -> String {
    if !should_use_color() {
        return value.to_string();
    }
    match value {
        LOADING => value.dimmed().to_string(),
        NOT_AVAILABLE => value.yellow().to_string(),
        _ if column.starts_with("op") && value.starts_with("Not ") => value.red().to_string(),
        _ if column.starts_with("op") => value.green().to_string(),
        _ if column == "slate" && value == "Yes" => value.bold().to_string(),
        _ => value.to_string(),
    }
}

/// Pads `text` to `width` terminal columns.
fn pad(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(padding))
}

/// One progress line: the file name, then the tracked columns.
pub fn format_progress_line(row: &DisplayRow) -> String {
    let name = row.get("filename").unwrap_or_default();
    let done = row.cells.iter().filter(|c| c.as_str() != LOADING).count();
    let cells: Vec<String> = PROGRESS_COLUMNS
        .iter()
        .map(|column| {
            let value = row.get(column).unwrap_or_default();
            format!("{}={}", column, paint(column, value))
        })
        .collect();
    format!(
        "  » {} [{}/{}] {}",
        pad(name, 24),
        done,
        row.cells.len(),
        cells.join(" ")
    )
}

/// Display sink writing progress lines to stdout.
pub struct TerminalSink {
    table: InspectionTable,
    echo: bool,
}

impl TerminalSink {
    /// `echo` false keeps stdout clean, e.g. for JSON output.
    pub fn new(echo: bool) -> Self {
        Self {
            table: InspectionTable::new(),
            echo,
        }
    }

    pub fn table(&self) -> &InspectionTable {
        &self.table
    }

    fn print(&self, row: &DisplayRow) {
        if self.echo {
            let mut stdout = io::stdout().lock();
            // a closed stdout only loses progress lines
            let _ = writeln!(stdout, "{}", format_progress_line(row));
        }
    }
}

impl DisplaySink for TerminalSink {
    fn add_placeholder(&self, id: InspectionId, row: DisplayRow) {
        self.print(&row);
        self.table.add_placeholder(id, row);
    }

    fn update_row(&self, id: InspectionId, row: DisplayRow) -> SinkUpdate {
        let update = self.table.update_row(id, row.clone());
        if update == SinkUpdate::Applied {
            self.print(&row);
        }
        update
    }
}

/// Print a section header
pub fn print_section(title: &str) {
    println!();
    if should_use_color() {
        println!("===== {} =====", style(title.to_uppercase()).cyan().bold());
    } else {
        println!("===== {} =====", title.to_uppercase());
    }
    println!();
}

/// Label/value lines of one row, labels padded to a common width.
pub fn format_row_block(row: &DisplayRow) -> Vec<String> {
    let label_width = COLUMNS.iter().map(|c| c.width()).max().unwrap_or(0) + 1;
    COLUMNS
        .iter()
        .zip(&row.cells)
        .skip(1)
        .map(|(column, value)| {
            format!("    {} {}", pad(&format!("{column}:"), label_width), paint(column, value))
        })
        .collect()
}

/// Prints the final row of every record.
pub fn print_summary(records: &[InspectionRecord]) {
    print_section("Inspection Summary");
    for record in records {
        let row = record.display_row();
        let title = record.path().display().to_string();
        if should_use_color() {
            println!("  {}", style(title).bold());
        } else {
            println!("  {title}");
        }
        for line in format_row_block(&row) {
            println!("{line}");
        }
        println!();
    }

    let verdicts = |column: &str| {
        records
            .iter()
            .filter(|r| r.display_row().get(column).is_some_and(|v| v.starts_with("OP")))
            .count()
    };
    println!(
        "  ✓ Inspected {} file(s): {} OP48, {} OP59",
        records.len(),
        verdicts("op48_audio"),
        verdicts("op59_audio")
    );
}

/// Prints the records as a JSON array.
pub fn print_json(records: &[InspectionRecord]) -> serde_json::Result<()> {
    let text = serde_json::to_string_pretty(records)?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_progress_line_counts_finished_cells() {
        let record = InspectionRecord::new(Path::new("/deliveries/spot.mov"));
        let line = format_progress_line(&record.placeholder_row());
        assert!(line.contains("spot.mov"));
        assert!(line.contains(&format!("[3/{}]", COLUMNS.len())));
        assert!(line.contains("slate="));
    }

    #[test]
    fn test_row_block_skips_path() {
        let record = InspectionRecord::new(Path::new("/deliveries/spot.mov"));
        let lines = format_row_block(&record.placeholder_row());
        assert_eq!(lines.len(), COLUMNS.len() - 1);
        assert!(lines[0].trim_start().starts_with("folder:"));
        assert!(lines[1].contains("spot.mov"));
    }

    #[test]
    fn test_pad_uses_display_width() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 4), "abcdef");
    }
}
