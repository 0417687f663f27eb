//! Text and JSON rendering of a statistics run.

use std::fmt::Write;
use std::path::Path;

use codestatslib::output::{Columns, Grouping, StatsTable};
use codestatslib::{FunctionStats, StatisticsResult};
use console::Style;

/// Output format selected with `--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

/// How the text report is laid out.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub grouping: Grouping,
    pub columns: Columns,
    /// How many of the longest functions to list per set (0 = none)
    pub top: usize,
}

/// Longest label shown before it is shortened with a leading "..".
const MAX_LABEL_WIDTH: usize = 60;

fn header_style() -> Style {
    Style::new().bold()
}

/// Truncate a name to fit within max_len, adding ".." prefix if needed
fn truncate_name(name: &str, max_len: usize) -> String {
    let len = name.chars().count();
    if len > max_len {
        let tail: String = name.chars().skip(len - max_len + 2).collect();
        format!("..{tail}")
    } else {
        name.to_string()
    }
}

/// Render a table with a left-aligned label column and right-aligned values.
pub fn render_table(table: &StatsTable) -> String {
    let mut rows: Vec<(String, &[String])> = table
        .rows
        .iter()
        .map(|row| (truncate_name(&row.label, MAX_LABEL_WIDTH), row.values.as_slice()))
        .collect();
    if let Some(footer) = &table.footer {
        rows.push((footer.label.clone(), footer.values.as_slice()));
    }

    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for (label, values) in &rows {
        widths[0] = widths[0].max(label.chars().count());
        for (i, value) in values.iter().enumerate() {
            if let Some(width) = widths.get_mut(i + 1) {
                *width = (*width).max(value.len());
            }
        }
    }

    let mut out = String::new();
    if let Some(title) = &table.title {
        let _ = writeln!(out, "{}", header_style().apply_to(title));
    }

    let mut header = format!("{:<width$}", table.headers[0], width = widths[0]);
    for (name, width) in table.headers.iter().zip(&widths).skip(1) {
        let _ = write!(header, "  {name:>width$}");
    }
    let separator = "-".repeat(header.chars().count());
    let _ = writeln!(out, "{}", header_style().apply_to(header));
    let _ = writeln!(out, "{separator}");

    let data_rows = table.rows.len();
    for (index, (label, values)) in rows.iter().enumerate() {
        if index == data_rows && table.footer.is_some() {
            let _ = writeln!(out, "{separator}");
        }
        let _ = write!(out, "{label:<width$}", width = widths[0]);
        for (value, width) in values.iter().zip(widths.iter().skip(1)) {
            let _ = write!(out, "  {value:>width$}");
        }
        out.push('\n');
    }
    out
}

fn render_summary(result: &StatisticsResult) -> String {
    let summary = &result.summary;
    let label = Style::new().bold();
    let mut out = String::new();
    for (name, value) in [
        ("Files", summary.files),
        ("Lines", summary.total),
        ("Code", summary.code),
        ("Comment", summary.comment),
        ("Blank", summary.blank),
    ] {
        let _ = writeln!(out, "{} {value}", label.apply_to(format!("{name:<8}")));
    }
    let _ = writeln!(
        out,
        "{} {:.2}s",
        label.apply_to(format!("{:<8}", "Elapsed")),
        result.elapsed_time.as_secs_f64()
    );
    out
}

fn render_functions(title: &str, stats: &FunctionStats, top: usize, root: &Path) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", header_style().apply_to(format!("{title} functions")));
    let _ = writeln!(out, "  count:  {}", stats.total_functions);
    if stats.total_functions == 0 {
        return out;
    }
    let _ = writeln!(out, "  mean:   {:.1}", stats.mean_length);
    let _ = writeln!(out, "  median: {:.1}", stats.median_length);
    let _ = writeln!(out, "  min:    {}", stats.min_length);
    let _ = writeln!(out, "  max:    {}", stats.max_length);

    if top > 0 {
        out.push('\n');
        let longest =
            StatsTable::longest_functions(&format!("Longest {title} functions"), stats, top, root);
        out.push_str(&render_table(&longest));
    }
    out
}

/// Full text report: summary, breakdown table, function statistics.
pub fn render_text(result: &StatisticsResult, options: &ReportOptions, root: &Path) -> String {
    let mut out = render_summary(result);
    out.push('\n');

    let table = StatsTable::from_result(result, options.grouping, options.columns, root);
    out.push_str(&render_table(&table));

    if let Some(stats) = &result.python_function_stats {
        out.push('\n');
        out.push_str(&render_functions("Python", stats, options.top, root));
    }
    if let Some(stats) = &result.c_function_stats {
        out.push('\n');
        out.push_str(&render_functions("C/C++", stats, options.top, root));
    }
    out
}

/// The whole result as pretty-printed JSON.
pub fn render_json(result: &StatisticsResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

/// Render in the requested mode.
pub fn render(
    result: &StatisticsResult,
    mode: OutputMode,
    options: &ReportOptions,
    root: &Path,
) -> serde_json::Result<String> {
    match mode {
        OutputMode::Text => Ok(render_text(result, options, root)),
        OutputMode::Json => render_json(result).map(|json| json + "\n"),
    }
}
