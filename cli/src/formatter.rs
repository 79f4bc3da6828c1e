//! Output formatters for query results
//!
//! OutputFormatter for table/JSON/CSV formats, psql-style.

use clap::ValueEnum;
use engine_link::{QueryResults, QueryStats};
use serde_json::Value as JsonValue;
use std::time::Duration;

use crate::error::{CLIError, Result};

/// Maximum column width before truncation
const MAX_COLUMN_WIDTH: usize = 32;

/// Minimum column width when resizing to fit the terminal
const MIN_COLUMN_WIDTH: usize = 6;

/// Output format for query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    /// Parse the `[ui] format` config value
    pub fn from_config(value: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(value.trim(), true).map_err(|_| {
            CLIError::ConfigurationError(format!(
                "unknown output format '{}' (expected table, json or csv)",
                value
            ))
        })
    }
}

/// Formats query results for display
pub struct OutputFormatter {
    format: OutputFormat,
    color: bool,
}

impl OutputFormatter {
    /// Create a new formatter
    pub fn new(format: OutputFormat, color: bool) -> Self {
        Self { format, color }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Get terminal width, defaulting to 80 if unavailable
    fn get_terminal_width() -> usize {
        if let Some((w, _h)) = term_size::dimensions() {
            w
        } else {
            80
        }
    }

    /// Truncate a string to max width with ellipsis
    fn truncate_value(value: &str, max_width: usize) -> String {
        if value.chars().count() <= max_width {
            value.to_string()
        } else if max_width <= 3 {
            value.chars().take(max_width).collect()
        } else {
            let take = max_width - 3;
            format!("{}...", value.chars().take(take).collect::<String>())
        }
    }

    /// Format a finished query's results
    pub fn format_results(&self, results: &QueryResults, elapsed: Duration) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.format_table(results, elapsed)),
            OutputFormat::Json => self.format_json(results),
            OutputFormat::Csv => Ok(self.format_csv(results)),
        }
    }

    /// Format as table
    fn format_table(&self, results: &QueryResults, elapsed: Duration) -> String {
        let exec_time_ms = elapsed.as_secs_f64() * 1000.0;

        // Statements without a result set (DDL, INSERT, ...)
        if results.columns.is_empty() {
            let label = results.update_type.as_deref().unwrap_or("Query");
            return match results.update_count {
                Some(count) => format!(
                    "{} OK, {} rows affected\n\nTook: {:.3} ms",
                    label, count, exec_time_ms
                ),
                None => format!("{} OK\n\nTook: {:.3} ms", label, exec_time_ms),
            };
        }

        let columns = results.column_names();
        let terminal_width = Self::get_terminal_width();

        // Precompute string values once to avoid double formatting
        let mut string_rows: Vec<Vec<String>> = Vec::with_capacity(results.rows.len());
        let mut col_widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
        for row in &results.rows {
            let mut srow: Vec<String> = Vec::with_capacity(columns.len());
            for (i, width) in col_widths.iter_mut().enumerate() {
                let value = row
                    .get(i)
                    .map(Self::format_json_value)
                    .unwrap_or_else(|| "NULL".to_string());
                *width = (*width).max(value.chars().count());
                srow.push(value);
            }
            string_rows.push(srow);
        }

        Self::fit_widths(&mut col_widths, terminal_width);

        let mut output = String::new();
        Self::push_border(&mut output, &col_widths, '┌', '┬', '┐');
        Self::push_row(&mut output, &columns, &col_widths);
        Self::push_border(&mut output, &col_widths, '├', '┼', '┤');
        for srow in &string_rows {
            Self::push_row(&mut output, srow, &col_widths);
        }
        Self::push_border(&mut output, &col_widths, '└', '┴', '┘');

        let row_count = string_rows.len();
        let row_label = if row_count == 1 { "row" } else { "rows" };
        output.push_str(&format!("({} {})\n", row_count, row_label));
        output.push('\n');
        output.push_str(&format!("Took: {:.3} ms", exec_time_ms));
        output
    }

    /// Shrink column widths until the table fits the terminal
    fn fit_widths(col_widths: &mut [usize], terminal_width: usize) {
        let column_count = col_widths.len();
        if column_count == 0 {
            return;
        }

        let border_padding = column_count * 3 + 1;
        let available = terminal_width.saturating_sub(border_padding).max(column_count);

        let mut total_width = col_widths.iter().sum::<usize>();
        if total_width <= available {
            return;
        }

        // First pass: cap at MAX_COLUMN_WIDTH
        for width in col_widths.iter_mut() {
            *width = (*width).min(MAX_COLUMN_WIDTH);
        }
        total_width = col_widths.iter().sum();

        // Second pass: shave the widest column until it fits
        while total_width > available {
            let widest = col_widths
                .iter()
                .enumerate()
                .filter(|(_, width)| **width > MIN_COLUMN_WIDTH)
                .max_by_key(|(_, width)| **width)
                .or_else(|| {
                    col_widths
                        .iter()
                        .enumerate()
                        .filter(|(_, width)| **width > 1)
                        .max_by_key(|(_, width)| **width)
                })
                .map(|(idx, _)| idx);
            match widest {
                Some(idx) => col_widths[idx] -= 1,
                None => break,
            }
            total_width = col_widths.iter().sum();
        }
    }

    fn push_border(output: &mut String, col_widths: &[usize], left: char, mid: char, right: char) {
        output.push(left);
        for (idx, width) in col_widths.iter().enumerate() {
            output.push_str(&"─".repeat(width + 2));
            output.push(if idx == col_widths.len() - 1 { right } else { mid });
        }
        output.push('\n');
    }

    fn push_row(output: &mut String, values: &[String], col_widths: &[usize]) {
        output.push('│');
        for (value, width) in values.iter().zip(col_widths) {
            output.push(' ');
            let truncated = Self::truncate_value(value, *width);
            output.push_str(&format!("{:width$}", truncated, width = *width));
            output.push(' ');
            output.push('│');
        }
        output.push('\n');
    }

    /// Format as JSON
    fn format_json(&self, results: &QueryResults) -> Result<String> {
        Ok(serde_json::to_string_pretty(results)?)
    }

    /// Format as CSV
    fn format_csv(&self, results: &QueryResults) -> String {
        if results.columns.is_empty() {
            return String::new();
        }

        let header: Vec<String> = results
            .column_names()
            .iter()
            .map(|name| Self::escape_csv(name))
            .collect();
        let mut output = header.join(",") + "\n";

        for row in &results.rows {
            let values: Vec<String> = (0..results.columns.len())
                .map(|i| match row.get(i) {
                    Some(JsonValue::Null) | None => String::new(),
                    Some(value) => Self::escape_csv(&Self::format_json_value(value)),
                })
                .collect();
            output.push_str(&values.join(","));
            output.push('\n');
        }

        output
    }

    /// Final execution statistics, one `key: value` per line
    pub fn format_stats(&self, stats: &QueryStats) -> String {
        let mut output = String::new();
        output.push_str(&format!("State:           {}\n", stats.state.as_deref().unwrap_or("?")));
        output.push_str(&format!("Nodes:           {}\n", stats.nodes));
        let progress = stats
            .progress_percentage()
            .map(|p| format!(" ({:.1}%)", p))
            .unwrap_or_default();
        output.push_str(&format!(
            "Splits:          {}/{}{}\n",
            stats.completed_splits, stats.total_splits, progress
        ));
        output.push_str(&format!("Processed rows:  {}\n", stats.processed_rows));
        output.push_str(&format!("Processed bytes: {}\n", stats.processed_bytes));
        output.push_str(&format!("CPU time:        {} ms\n", stats.cpu_time_millis));
        output.push_str(&format!("Wall time:       {} ms", stats.wall_time_millis));
        output
    }

    /// Error line, red when color is enabled
    pub fn format_error(&self, message: &str) -> String {
        if self.color {
            format!("\x1b[31mERROR\x1b[0m: {}", message)
        } else {
            format!("ERROR: {}", message)
        }
    }

    /// Format JSON value for table display
    fn format_json_value(value: &JsonValue) -> String {
        match value {
            JsonValue::Null => "NULL".to_string(),
            JsonValue::Bool(b) => b.to_string(),
            JsonValue::Number(n) => n.to_string(),
            JsonValue::String(s) => s.clone(),
            JsonValue::Array(_) | JsonValue::Object(_) => value.to_string(),
        }
    }

    /// Quote a CSV field when it holds a separator, quote or line break
    fn escape_csv(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_link::Column;
    use serde_json::json;

    fn sample() -> QueryResults {
        QueryResults {
            query_id: Some("q1".into()),
            columns: vec![
                Column {
                    name: "id".into(),
                    data_type: "bigint".into(),
                },
                Column {
                    name: "note".into(),
                    data_type: "varchar".into(),
                },
            ],
            rows: vec![vec![json!(1), json!("hello, world")], vec![json!(2), json!(null)]],
            ..Default::default()
        }
    }

    #[test]
    fn test_format_json_value() {
        assert_eq!(OutputFormatter::format_json_value(&JsonValue::Null), "NULL");
        assert_eq!(OutputFormatter::format_json_value(&JsonValue::Bool(true)), "true");
        assert_eq!(OutputFormatter::format_json_value(&json!("test")), "test");
        assert_eq!(OutputFormatter::format_json_value(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_csv_output() {
        let formatter = OutputFormatter::new(OutputFormat::Csv, false);
        let csv = formatter.format_results(&sample(), Duration::ZERO).unwrap();
        assert_eq!(csv, "id,note\n1,\"hello, world\"\n2,\n");
    }

    #[test]
    fn test_csv_quote_escaping() {
        assert_eq!(OutputFormatter::escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(OutputFormatter::escape_csv("plain"), "plain");
    }

    #[test]
    fn test_table_output() {
        let formatter = OutputFormatter::new(OutputFormat::Table, false);
        let table = formatter
            .format_results(&sample(), Duration::from_millis(12))
            .unwrap();
        assert!(table.starts_with('┌'));
        assert!(table.contains("│ id │ note         │"));
        assert!(table.contains("│ 2  │ NULL         │"));
        assert!(table.contains("(2 rows)"));
        assert!(table.ends_with("Took: 12.000 ms"));
    }

    #[test]
    fn test_table_for_update_statement() {
        let formatter = OutputFormatter::new(OutputFormat::Table, false);
        let results = QueryResults {
            update_type: Some("INSERT".into()),
            update_count: Some(3),
            ..Default::default()
        };
        let text = formatter.format_results(&results, Duration::ZERO).unwrap();
        assert!(text.starts_with("INSERT OK, 3 rows affected"));
    }

    #[test]
    fn test_json_output() {
        let formatter = OutputFormatter::new(OutputFormat::Json, false);
        let text = formatter.format_results(&sample(), Duration::ZERO).unwrap();
        let value: JsonValue = serde_json::from_str(&text).unwrap();
        assert_eq!(value["rows"][0][1], json!("hello, world"));
        assert_eq!(value["columns"][1]["name"], json!("note"));
    }

    #[test]
    fn test_truncate_value() {
        assert_eq!(OutputFormatter::truncate_value("short", 10), "short");
        assert_eq!(
            OutputFormatter::truncate_value("this is a very long string that needs truncation", 20),
            "this is a very lo..."
        );
        assert_eq!(OutputFormatter::truncate_value("test", 3), "tes");
        assert_eq!(OutputFormatter::truncate_value("test", 4), "test");
        assert_eq!(OutputFormatter::truncate_value("hello", 4), "h...");
    }

    #[test]
    fn test_fit_widths_respects_terminal() {
        let mut widths = vec![50, 40, 5];
        OutputFormatter::fit_widths(&mut widths, 60);
        assert!(widths.iter().sum::<usize>() <= 60 - (3 * 3 + 1));
        assert_eq!(widths[2], 5, "narrow columns are left alone");
    }

    #[test]
    fn test_output_format_from_config() {
        assert_eq!(OutputFormat::from_config("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_config(" csv ").unwrap(), OutputFormat::Csv);
        assert!(OutputFormat::from_config("yaml").is_err());
    }

    #[test]
    fn test_error_coloring() {
        let plain = OutputFormatter::new(OutputFormat::Table, false);
        assert_eq!(plain.format_error("boom"), "ERROR: boom");
        let colored = OutputFormatter::new(OutputFormat::Table, true);
        assert!(colored.format_error("boom").starts_with("\x1b[31m"));
    }
}
