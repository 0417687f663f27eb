//! Folding per-file results into run-level statistics.
//!
//! The folds are pure and order independent: any permutation of the same
//! files produces the same summaries. [`Aggregator`] is the single writer
//! that owns the running totals during a run.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use super::functions::{FunctionAnalyzer, C_LIKE_LANGUAGES};
use super::language::{extension_of, LanguageTable, NO_EXTENSION};
use super::stats::{FileStats, FunctionStat, FunctionStats, Summary};

/// Add one file to a summary.
pub fn fold_file(summary: Summary, file: &FileStats) -> Summary {
    summary + Summary::from(file)
}

/// Add one file to the per-language map. Unknown extensions land in `Other`.
pub fn fold_language(
    mut map: BTreeMap<String, Summary>,
    table: &LanguageTable,
    file: &FileStats,
) -> BTreeMap<String, Summary> {
    let language = table.language(&extension_of(&file.path));
    *map.entry(language.to_string()).or_default() += Summary::from(file);
    map
}

/// Add one file to the per-extension map. Files without one land in
/// `<noext>`.
pub fn fold_extension(
    mut map: BTreeMap<String, Summary>,
    file: &FileStats,
) -> BTreeMap<String, Summary> {
    *map.entry(extension_key(&file.path)).or_default() += Summary::from(file);
    map
}

fn extension_key(path: &Path) -> String {
    let ext = extension_of(path);
    if ext.is_empty() {
        NO_EXTENSION.to_string()
    } else {
        ext
    }
}

/// Case-insensitive membership in a language filter. An empty filter
/// selects everything.
pub fn language_selected(filter: &[String], language: &str) -> bool {
    filter.is_empty() || filter.iter().any(|l| l.eq_ignore_ascii_case(language))
}

/// Everything a statistics run produces.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatisticsResult {
    /// Totals over every counted file
    pub summary: Summary,
    /// Totals per language name
    pub by_language: BTreeMap<String, Summary>,
    /// Totals per extension (`".py"`, `"<noext>"`)
    pub by_ext: BTreeMap<String, Summary>,
    /// One entry per counted file, sorted by path
    pub per_file: Vec<FileStats>,
    /// Wall-clock time of the whole run
    pub elapsed_time: Duration,
    pub python_function_stats: Option<FunctionStats>,
    pub c_function_stats: Option<FunctionStats>,
}

impl StatisticsResult {
    /// Whether any C or C++ language shows up in `by_language`.
    pub fn has_c_like_language(&self) -> bool {
        C_LIKE_LANGUAGES
            .iter()
            .any(|lang| self.by_language.contains_key(*lang))
    }
}

/// What the run asked for, applied when the aggregator finishes.
#[derive(Debug, Clone, Default)]
pub struct ResultShape {
    /// Languages to keep in `by_language` / `by_ext` (empty keeps all)
    pub languages: Vec<String>,
    /// Always report Python function stats
    pub python_functions: bool,
    /// Always report C/C++ function stats
    pub c_functions: bool,
}

/// Single-writer accumulator for one run.
#[derive(Debug)]
pub struct Aggregator<'t> {
    table: &'t LanguageTable,
    summary: Summary,
    by_language: BTreeMap<String, Summary>,
    by_ext: BTreeMap<String, Summary>,
    per_file: Vec<FileStats>,
    python_functions: Vec<FunctionStat>,
    c_functions: Vec<FunctionStat>,
}

impl<'t> Aggregator<'t> {
    pub fn new(table: &'t LanguageTable) -> Self {
        Self {
            table,
            summary: Summary::default(),
            by_language: BTreeMap::new(),
            by_ext: BTreeMap::new(),
            per_file: Vec::new(),
            python_functions: Vec::new(),
            c_functions: Vec::new(),
        }
    }

    /// Fold one counted file into every summary.
    pub fn add_file(&mut self, file: FileStats) {
        self.summary = fold_file(self.summary, &file);
        self.by_language = fold_language(std::mem::take(&mut self.by_language), self.table, &file);
        self.by_ext = fold_extension(std::mem::take(&mut self.by_ext), &file);
        self.per_file.push(file);
    }

    /// Record the functions found in one file.
    pub fn add_functions(&mut self, analyzer: FunctionAnalyzer, functions: Vec<FunctionStat>) {
        match analyzer {
            FunctionAnalyzer::Python => self.python_functions.extend(functions),
            FunctionAnalyzer::C => self.c_functions.extend(functions),
        }
    }

    /// Number of files folded so far.
    pub fn file_count(&self) -> u64 {
        self.summary.files
    }

    /// Build the final result.
    pub fn finish(self, shape: &ResultShape, elapsed_time: Duration) -> StatisticsResult {
        let table = self.table;
        let mut by_language = self.by_language;
        let mut by_ext = self.by_ext;
        if !shape.languages.is_empty() {
            by_language.retain(|language, _| language_selected(&shape.languages, language));
            by_ext.retain(|ext, _| {
                let ext = if ext == NO_EXTENSION { "" } else { ext.as_str() };
                language_selected(&shape.languages, table.language(ext))
            });
        }

        let mut per_file = self.per_file;
        per_file.sort_by(|a, b| a.path.cmp(&b.path));

        let mut result = StatisticsResult {
            summary: self.summary,
            by_language,
            by_ext,
            per_file,
            elapsed_time,
            python_function_stats: None,
            c_function_stats: None,
        };

        if shape.python_functions {
            result.python_function_stats = Some(function_stats(self.python_functions));
        }
        if shape.c_functions || result.has_c_like_language() {
            result.c_function_stats = Some(function_stats(self.c_functions));
        }

        result
    }
}

fn function_stats(mut functions: Vec<FunctionStat>) -> FunctionStats {
    functions.sort_by(|a, b| {
        a.file_path
            .cmp(&b.file_path)
            .then_with(|| a.start_line.cmp(&b.start_line))
    });
    FunctionStats::from_functions(functions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::classifier::LineKind;

    fn file(path: &str, code: u64, comment: u64, blank: u64) -> FileStats {
        let mut stats = FileStats::new(path);
        let kinds = std::iter::repeat(LineKind::Code)
            .take(code as usize)
            .chain(std::iter::repeat(LineKind::Comment).take(comment as usize))
            .chain(std::iter::repeat(LineKind::Blank).take(blank as usize));
        for kind in kinds {
            stats.add_line(kind);
        }
        stats
    }

    fn sample() -> Vec<FileStats> {
        vec![
            file("src/a.py", 10, 2, 1),
            file("src/b.py", 5, 0, 0),
            file("src/main.c", 20, 4, 3),
            file("src/util.H", 3, 1, 0),
            file("Makefile", 2, 0, 1),
            file("notes.xyz", 1, 0, 0),
        ]
    }

    #[test]
    fn test_fold_language() {
        let table = LanguageTable::builtin();
        let map = sample()
            .iter()
            .fold(BTreeMap::new(), |map, f| fold_language(map, table, f));

        assert_eq!(map["Python"].files, 2);
        assert_eq!(map["Python"].code, 15);
        assert_eq!(map["C"].code, 20);
        assert_eq!(map["C/C++ Header"].files, 1);
        assert_eq!(map["Other"].files, 2);
    }

    #[test]
    fn test_fold_extension() {
        let map = sample().iter().fold(BTreeMap::new(), fold_extension);

        assert_eq!(map[".py"].files, 2);
        assert_eq!(map[".h"].files, 1);
        assert_eq!(map[NO_EXTENSION].files, 1);
        assert_eq!(map[".xyz"].code, 1);
    }

    #[test]
    fn test_fold_order_does_not_matter() {
        let table = LanguageTable::builtin();
        let forward = sample();
        let mut backward = sample();
        backward.reverse();

        let sum = |files: &[FileStats]| {
            files.iter().fold(Summary::default(), fold_file)
        };
        let langs = |files: &[FileStats]| {
            files
                .iter()
                .fold(BTreeMap::new(), |map, f| fold_language(map, table, f))
        };

        assert_eq!(sum(&forward), sum(&backward));
        assert_eq!(langs(&forward), langs(&backward));
    }

    #[test]
    fn test_aggregator_finish() {
        let table = LanguageTable::builtin();
        let mut aggregator = Aggregator::new(table);
        for f in sample().into_iter().rev() {
            aggregator.add_file(f);
        }
        aggregator.add_functions(
            FunctionAnalyzer::Python,
            vec![FunctionStat::new("f", "src/a.py", 1, 4)],
        );
        assert_eq!(aggregator.file_count(), 6);

        let shape = ResultShape {
            python_functions: true,
            ..ResultShape::default()
        };
        let result = aggregator.finish(&shape, Duration::from_millis(5));

        assert_eq!(result.summary.files, 6);
        assert_eq!(result.summary.code, 41);
        assert_eq!(
            result.summary.total,
            result.summary.code + result.summary.comment + result.summary.blank
        );
        let paths: Vec<_> = result.per_file.iter().map(|f| f.path.clone()).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);

        let python = result.python_function_stats.unwrap();
        assert_eq!(python.total_functions, 1);
        assert_eq!(python.max_length, 4);

        // C-like languages are present, so C stats appear even though they
        // were not requested.
        let c = result.c_function_stats.unwrap();
        assert_eq!(c.total_functions, 0);
        assert_eq!(result.elapsed_time, Duration::from_millis(5));
    }

    #[test]
    fn test_aggregator_language_filter() {
        let table = LanguageTable::builtin();
        let mut aggregator = Aggregator::new(table);
        for f in sample() {
            aggregator.add_file(f);
        }

        let shape = ResultShape {
            languages: vec!["python".to_string()],
            ..ResultShape::default()
        };
        let result = aggregator.finish(&shape, Duration::ZERO);

        assert_eq!(result.by_language.keys().collect::<Vec<_>>(), vec!["Python"]);
        assert_eq!(result.by_ext.keys().collect::<Vec<_>>(), vec![".py"]);
        assert!(result.python_function_stats.is_none());
        assert!(result.c_function_stats.is_none());
    }

    #[test]
    fn test_other_filter_keeps_noext() {
        let table = LanguageTable::builtin();
        let mut aggregator = Aggregator::new(table);
        for f in sample() {
            aggregator.add_file(f);
        }

        let shape = ResultShape {
            languages: vec!["Other".to_string()],
            ..ResultShape::default()
        };
        let result = aggregator.finish(&shape, Duration::ZERO);

        assert_eq!(
            result.by_ext.keys().collect::<Vec<_>>(),
            vec![".xyz", NO_EXTENSION]
        );
    }

    #[test]
    fn test_language_selected() {
        assert!(language_selected(&[], "Python"));
        assert!(language_selected(&["c++".to_string()], "C++"));
        assert!(!language_selected(&["C".to_string()], "C++"));
    }
}
