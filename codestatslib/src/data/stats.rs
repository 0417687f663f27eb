//! Core data structures for line and function statistics.
//!
//! - [`FileStats`]: line tally of one file, built line by line
//! - [`Summary`]: additive aggregate over any number of files
//! - [`FunctionStat`]: span of one detected function
//! - [`FunctionStats`]: length distribution derived from a list of spans
//!
//! `Summary` is a monoid under `+` with `Summary::default()` as identity, so
//! folding file stats in any order gives the same totals.

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::path::PathBuf;

use super::classifier::LineKind;

/// Line counts for a single file.
///
/// Only [`FileStats::add_line`] changes the counts, which keeps
/// `total == code + comment + blank`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    /// Path to the file.
    pub path: PathBuf,
    /// Total number of lines.
    pub total: u64,
    /// Lines holding code (possibly with a trailing or leading comment).
    pub code: u64,
    /// Comment-only lines.
    pub comment: u64,
    /// Whitespace-only lines.
    pub blank: u64,
}

impl FileStats {
    /// Create an empty tally for a file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            total: 0,
            code: 0,
            comment: 0,
            blank: 0,
        }
    }

    /// Count one classified line.
    pub fn add_line(&mut self, kind: LineKind) {
        self.total += 1;
        match kind {
            LineKind::Code => self.code += 1,
            LineKind::Comment => self.comment += 1,
            LineKind::Blank => self.blank += 1,
        }
    }
}

/// Aggregated line counts over a set of files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of files folded in
    pub files: u64,
    /// Total line count
    pub total: u64,
    /// Code lines
    pub code: u64,
    /// Comment lines
    pub comment: u64,
    /// Blank lines
    pub blank: u64,
}

impl Summary {
    /// Create a new Summary with all zeros.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one file into this summary.
    pub fn add_file(&mut self, file: &FileStats) {
        *self += Summary::from(file);
    }
}

impl From<&FileStats> for Summary {
    fn from(file: &FileStats) -> Self {
        Self {
            files: 1,
            total: file.total,
            code: file.code,
            comment: file.comment,
            blank: file.blank,
        }
    }
}

impl Add for Summary {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            files: self.files + other.files,
            total: self.total + other.total,
            code: self.code + other.code,
            comment: self.comment + other.comment,
            blank: self.blank + other.blank,
        }
    }
}

impl AddAssign for Summary {
    fn add_assign(&mut self, other: Self) {
        self.files += other.files;
        self.total += other.total;
        self.code += other.code;
        self.comment += other.comment;
        self.blank += other.blank;
    }
}

impl Sum for Summary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Summary::default(), Add::add)
    }
}

impl<'a> Sum<&'a FileStats> for Summary {
    fn sum<I: Iterator<Item = &'a FileStats>>(iter: I) -> Self {
        iter.map(Summary::from).sum()
    }
}

/// One detected function.
///
/// Line numbers are 1-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionStat {
    pub name: String,
    pub file_path: PathBuf,
    pub line_count: u64,
    pub start_line: u64,
    pub end_line: u64,
}

impl FunctionStat {
    /// Build a span; `line_count` is derived from the two line numbers.
    pub fn new(
        name: impl Into<String>,
        file_path: impl Into<PathBuf>,
        start_line: u64,
        end_line: u64,
    ) -> Self {
        let end_line = end_line.max(start_line);
        Self {
            name: name.into(),
            file_path: file_path.into(),
            line_count: end_line - start_line + 1,
            start_line,
            end_line,
        }
    }
}

/// Length distribution over a set of functions.
///
/// Only constructed through [`FunctionStats::from_functions`], so the numbers
/// always agree with `functions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionStats {
    pub total_functions: u64,
    pub mean_length: f64,
    pub median_length: f64,
    pub min_length: u64,
    pub max_length: u64,
    pub functions: Vec<FunctionStat>,
}

impl FunctionStats {
    /// Compute the distribution of `line_count` over `functions`.
    ///
    /// An empty list gives all-zero statistics. The median of an even
    /// number of lengths is the mean of the two middle ones.
    ///
    /// ```rust
    /// use codestatslib::{FunctionStat, FunctionStats};
    ///
    /// let functions = [1, 3, 5, 7]
    ///     .iter()
    ///     .map(|&len| FunctionStat::new("f", "a.c", 1, len))
    ///     .collect();
    /// let stats = FunctionStats::from_functions(functions);
    ///
    /// assert_eq!(stats.mean_length, 4.0);
    /// assert_eq!(stats.median_length, 4.0);
    /// assert_eq!((stats.min_length, stats.max_length), (1, 7));
    /// ```
    pub fn from_functions(functions: Vec<FunctionStat>) -> Self {
        if functions.is_empty() {
            return Self::default();
        }

        let mut lengths: Vec<u64> = functions.iter().map(|f| f.line_count).collect();
        lengths.sort_unstable();

        let count = lengths.len();
        let sum: u64 = lengths.iter().sum();
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (lengths[mid - 1] + lengths[mid]) as f64 / 2.0
        } else {
            lengths[mid] as f64
        };

        Self {
            total_functions: count as u64,
            mean_length: sum as f64 / count as f64,
            median_length: median,
            min_length: lengths[0],
            max_length: lengths[count - 1],
            functions,
        }
    }

    /// The `n` longest functions, longest first.
    pub fn longest(&self, n: usize) -> Vec<&FunctionStat> {
        let mut sorted: Vec<&FunctionStat> = self.functions.iter().collect();
        sorted.sort_by(|a, b| {
            b.line_count
                .cmp(&a.line_count)
                .then_with(|| a.file_path.cmp(&b.file_path))
                .then_with(|| a.start_line.cmp(&b.start_line))
        });
        sorted.truncate(n);
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, code: u64, comment: u64, blank: u64) -> FileStats {
        let mut stats = FileStats::new(path);
        for _ in 0..code {
            stats.add_line(LineKind::Code);
        }
        for _ in 0..comment {
            stats.add_line(LineKind::Comment);
        }
        for _ in 0..blank {
            stats.add_line(LineKind::Blank);
        }
        stats
    }

    fn lengths(lengths: &[u64]) -> Vec<FunctionStat> {
        lengths
            .iter()
            .enumerate()
            .map(|(i, &len)| FunctionStat::new(format!("f{i}"), "src/a.c", 10, 10 + len - 1))
            .collect()
    }

    #[test]
    fn test_file_stats_total_invariant() {
        let stats = file("a.c", 3, 2, 4);
        assert_eq!(stats.total, 9);
        assert_eq!(stats.total, stats.code + stats.comment + stats.blank);
    }

    #[test]
    fn test_summary_default() {
        let summary = Summary::new();
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.files, 0);
        assert_eq!(summary.total, 0);
    }

    #[test]
    fn test_summary_add() {
        let a = Summary::from(&file("a.c", 10, 5, 1));
        let b = Summary::from(&file("b.c", 2, 0, 3));
        let sum = a + b;
        assert_eq!(sum.files, 2);
        assert_eq!(sum.total, 21);
        assert_eq!(sum.code, 12);
        assert_eq!(sum.comment, 5);
        assert_eq!(sum.blank, 4);
        assert_eq!(sum, b + a);
        assert_eq!(a + Summary::default(), a);
    }

    #[test]
    fn test_summary_sum_of_files() {
        let files = vec![file("a.py", 1, 1, 1), file("b.py", 4, 0, 0)];
        let summary: Summary = files.iter().sum();
        assert_eq!(summary.files, 2);
        assert_eq!(summary.total, 7);

        let mut folded = Summary::new();
        for f in &files {
            folded.add_file(f);
        }
        assert_eq!(folded, summary);
    }

    #[test]
    fn test_function_stat_line_count() {
        let f = FunctionStat::new("add", "a.c", 1, 3);
        assert_eq!(f.line_count, 3);
        assert_eq!(f.line_count, f.end_line - f.start_line + 1);

        let one_liner = FunctionStat::new("g", "a.c", 7, 7);
        assert_eq!(one_liner.line_count, 1);
    }

    #[test]
    fn test_function_stats_empty() {
        let stats = FunctionStats::from_functions(Vec::new());
        assert_eq!(stats.total_functions, 0);
        assert_eq!(stats.mean_length, 0.0);
        assert_eq!(stats.median_length, 0.0);
        assert_eq!(stats.min_length, 0);
        assert_eq!(stats.max_length, 0);
        assert!(stats.functions.is_empty());
    }

    #[test]
    fn test_function_stats_even_count() {
        let stats = FunctionStats::from_functions(lengths(&[7, 1, 5, 3]));
        assert_eq!(stats.total_functions, 4);
        assert_eq!(stats.mean_length, 4.0);
        assert_eq!(stats.median_length, 4.0);
        assert_eq!(stats.min_length, 1);
        assert_eq!(stats.max_length, 7);
        assert_eq!(stats.functions.len(), 4);
    }

    #[test]
    fn test_function_stats_odd_count() {
        let stats = FunctionStats::from_functions(lengths(&[10, 2, 3]));
        assert_eq!(stats.median_length, 3.0);
        assert_eq!(stats.mean_length, 5.0);
    }

    #[test]
    fn test_longest() {
        let stats = FunctionStats::from_functions(lengths(&[4, 9, 1, 9]));
        let top: Vec<u64> = stats.longest(3).iter().map(|f| f.line_count).collect();
        assert_eq!(top, vec![9, 9, 4]);
        assert_eq!(stats.longest(10).len(), 4);
    }
}
