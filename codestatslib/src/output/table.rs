//! Table-ready data structures for statistics output.
//!
//! `StatsTable` is a pure presentation layer: it turns a
//! [`StatisticsResult`] into strings ready to be printed or serialized. No
//! counting happens here.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::aggregate::StatisticsResult;
use crate::data::stats::{FunctionStats, Summary};

/// What the rows of a table are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Grouping {
    /// One row per language
    #[default]
    ByLanguage,
    /// One row per file extension
    ByExtension,
    /// One row per file
    ByFile,
}

/// Which optional line-count columns to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Columns {
    pub comment: bool,
    pub blank: bool,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            comment: true,
            blank: true,
        }
    }
}

/// A single row in the table (data row or footer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Row label (language, extension, file path, "Total (N files)")
    pub label: String,
    /// Values for each column after the label, ready for display
    pub values: Vec<String>,
}

/// Table-ready statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsTable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Column headers, label column first
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<TableRow>,
}

impl StatsTable {
    /// Line counts grouped by language, extension or file.
    ///
    /// Rows are ordered by code lines, largest first, then by label. File
    /// labels are shown relative to `root` when possible.
    pub fn from_result(
        result: &StatisticsResult,
        grouping: Grouping,
        columns: Columns,
        root: &Path,
    ) -> Self {
        let mut items: Vec<(String, Summary)> = match grouping {
            Grouping::ByLanguage => result
                .by_language
                .iter()
                .map(|(name, summary)| (name.clone(), *summary))
                .collect(),
            Grouping::ByExtension => result
                .by_ext
                .iter()
                .map(|(ext, summary)| (ext.clone(), *summary))
                .collect(),
            Grouping::ByFile => result
                .per_file
                .iter()
                .map(|file| (relative_label(&file.path, root), Summary::from(file)))
                .collect(),
        };
        items.sort_by(|(a_label, a), (b_label, b)| {
            b.code.cmp(&a.code).then_with(|| a_label.cmp(b_label))
        });

        let with_files = grouping != Grouping::ByFile;
        let rows = items
            .into_iter()
            .map(|(label, summary)| TableRow {
                label,
                values: format_summary(&summary, columns, with_files),
            })
            .collect();

        StatsTable {
            title: None,
            headers: build_headers(grouping, columns),
            rows,
            footer: Some(TableRow {
                label: format!("Total ({} files)", result.summary.files),
                values: format_summary(&result.summary, columns, with_files),
            }),
        }
    }

    /// The `top` longest functions of a set.
    pub fn longest_functions(
        title: &str,
        stats: &FunctionStats,
        top: usize,
        root: &Path,
    ) -> Self {
        let rows = stats
            .longest(top)
            .into_iter()
            .map(|f| TableRow {
                label: f.name.clone(),
                values: vec![
                    format!("{}:{}", relative_label(&f.file_path, root), f.start_line),
                    f.line_count.to_string(),
                ],
            })
            .collect();

        StatsTable {
            title: Some(title.to_string()),
            headers: vec![
                "Function".to_string(),
                "Location".to_string(),
                "Lines".to_string(),
            ],
            rows,
            footer: None,
        }
    }
}

fn relative_label(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    if relative.as_os_str().is_empty() {
        path.display().to_string()
    } else {
        relative.display().to_string()
    }
}

fn build_headers(grouping: Grouping, columns: Columns) -> Vec<String> {
    let label = match grouping {
        Grouping::ByLanguage => "Language",
        Grouping::ByExtension => "Extension",
        Grouping::ByFile => "File",
    };

    let mut headers = vec![label.to_string()];
    if grouping != Grouping::ByFile {
        headers.push("Files".to_string());
    }
    headers.push("Code".to_string());
    if columns.comment {
        headers.push("Comment".to_string());
    }
    if columns.blank {
        headers.push("Blank".to_string());
    }
    headers.push("Total".to_string());
    headers
}

fn format_summary(summary: &Summary, columns: Columns, with_files: bool) -> Vec<String> {
    let mut values = Vec::new();
    if with_files {
        values.push(summary.files.to_string());
    }
    values.push(summary.code.to_string());
    if columns.comment {
        values.push(summary.comment.to_string());
    }
    if columns.blank {
        values.push(summary.blank.to_string());
    }
    values.push(summary.total.to_string());
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::{Aggregator, ResultShape};
    use crate::data::classifier::LineKind;
    use crate::data::language::LanguageTable;
    use crate::data::stats::{FileStats, FunctionStat};
    use std::time::Duration;

    fn file(path: &str, code: u64, comment: u64, blank: u64) -> FileStats {
        let mut stats = FileStats::new(path);
        for (kind, n) in [
            (LineKind::Code, code),
            (LineKind::Comment, comment),
            (LineKind::Blank, blank),
        ] {
            for _ in 0..n {
                stats.add_line(kind);
            }
        }
        stats
    }

    fn result() -> StatisticsResult {
        let mut aggregator = Aggregator::new(LanguageTable::builtin());
        aggregator.add_file(file("/proj/src/a.py", 10, 2, 1));
        aggregator.add_file(file("/proj/src/b.c", 30, 5, 5));
        aggregator.add_file(file("/proj/src/c.c", 10, 0, 0));
        aggregator.add_file(file("/proj/README", 10, 0, 2));
        aggregator.finish(&ResultShape::default(), Duration::ZERO)
    }

    #[test]
    fn test_by_language() {
        let table = StatsTable::from_result(
            &result(),
            Grouping::ByLanguage,
            Columns::default(),
            Path::new("/proj"),
        );

        assert_eq!(
            table.headers,
            vec!["Language", "Files", "Code", "Comment", "Blank", "Total"]
        );
        let labels: Vec<&str> = table.rows.iter().map(|r| r.label.as_str()).collect();
        // C leads on code; Other and Python tie and fall back to the label.
        assert_eq!(labels, vec!["C", "Other", "Python"]);
        assert_eq!(table.rows[0].values, vec!["2", "40", "5", "5", "50"]);

        let footer = table.footer.unwrap();
        assert_eq!(footer.label, "Total (4 files)");
        assert_eq!(footer.values, vec!["4", "60", "7", "8", "75"]);
    }

    #[test]
    fn test_by_extension_hides_columns() {
        let columns = Columns {
            comment: false,
            blank: false,
        };
        let table = StatsTable::from_result(
            &result(),
            Grouping::ByExtension,
            columns,
            Path::new("/proj"),
        );

        assert_eq!(table.headers, vec!["Extension", "Files", "Code", "Total"]);
        assert_eq!(table.rows[0].label, ".c");
        assert_eq!(table.rows[0].values, vec!["2", "40", "50"]);
    }

    #[test]
    fn test_by_file_uses_relative_paths() {
        let table = StatsTable::from_result(
            &result(),
            Grouping::ByFile,
            Columns::default(),
            Path::new("/proj"),
        );

        assert_eq!(table.headers, vec!["File", "Code", "Comment", "Blank", "Total"]);
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[0].label, Path::new("src/b.c").display().to_string());
        assert_eq!(table.rows[0].values, vec!["30", "5", "5", "40"]);
    }

    #[test]
    fn test_longest_functions() {
        let stats = FunctionStats::from_functions(vec![
            FunctionStat::new("short", "/proj/a.c", 1, 2),
            FunctionStat::new("long", "/proj/a.c", 10, 29),
            FunctionStat::new("mid", "/proj/b.c", 5, 14),
        ]);

        let table = StatsTable::longest_functions("C/C++", &stats, 2, Path::new("/proj"));

        assert_eq!(table.title.as_deref(), Some("C/C++"));
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].label, "long");
        assert_eq!(table.rows[0].values, vec!["a.c:10", "20"]);
        assert_eq!(table.rows[1].label, "mid");
        assert!(table.footer.is_none());
    }
}
