//! Per-file line counting.
//!
//! Drives the line classifier over the lines of one file. The classifier
//! state starts at `Normal` for every file and is threaded from line to
//! line, so counts never leak between files.

use std::path::Path;

use super::classifier::{classify, ClassifierState};
use super::language::{extension_of, CommentSyntax, LanguageTable};
use super::stats::FileStats;
use crate::source::text::{read_source, split_lines};
use crate::Result;

/// Count already decoded lines.
///
/// Line terminators, if still present, are ignored.
pub fn count_lines<I, S>(path: impl AsRef<Path>, lines: I, syntax: &CommentSyntax) -> FileStats
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut stats = FileStats::new(path.as_ref());
    let mut state = ClassifierState::Normal;

    for line in lines {
        let (kind, next) = classify(line.as_ref(), syntax, state);
        stats.add_line(kind);
        state = next;
    }

    stats
}

/// Count a whole source string using the syntax registered for the path's
/// extension.
///
/// # Example
///
/// ```rust
/// use codestatslib::{count_source, LanguageTable};
///
/// let source = "/* header */\nint x = 1;\n\n// done\n";
/// let stats = count_source("a.c", source, LanguageTable::builtin());
///
/// assert_eq!(stats.total, 4);
/// assert_eq!(stats.code, 1);
/// assert_eq!(stats.comment, 2);
/// assert_eq!(stats.blank, 1);
/// ```
pub fn count_source(path: impl AsRef<Path>, source: &str, table: &LanguageTable) -> FileStats {
    let path = path.as_ref();
    let syntax = table.comment_syntax(&extension_of(path));
    count_lines(path, split_lines(source), syntax)
}

/// Read and count one file.
///
/// Returns `Ok(None)` when the file is sniffed as binary. Read failures are
/// returned so the caller can skip the file.
pub fn count_file(path: impl AsRef<Path>, table: &LanguageTable) -> Result<Option<FileStats>> {
    let path = path.as_ref();
    let Some(source) = read_source(path, table, None)? else {
        return Ok(None);
    };
    Ok(Some(count_source(path, &source, table)))
}
