//! Per-line classification into code, comment and blank lines.
//!
//! Classification is a pure function of the line, the comment syntax of the
//! file's extension and the state carried over from the previous line. The
//! state only tracks whether the previous line left a block comment open.
//!
//! Block comment openers are checked before single-line tokens, and a blank
//! line is always `Blank`, even in the middle of a block comment.

use serde::{Deserialize, Serialize};

use super::language::CommentSyntax;

/// What a single line of source counts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    Code,
    Comment,
    Blank,
}

/// Comment state carried from one line to the next within a file.
///
/// The tokens borrow from the [`CommentSyntax`] the line was classified
/// with, so a state never outlives the table it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierState<'a> {
    /// Not inside any comment.
    #[default]
    Normal,
    /// A block comment opened on an earlier line and has not closed yet.
    InBlockComment { open: &'a str, close: &'a str },
}

impl ClassifierState<'_> {
    pub fn is_in_block_comment(&self) -> bool {
        matches!(self, ClassifierState::InBlockComment { .. })
    }
}

/// Classify one line and compute the state for the next one.
///
/// # Example
///
/// ```rust
/// use codestatslib::{classify, ClassifierState, LanguageTable, LineKind};
///
/// let syntax = LanguageTable::builtin().comment_syntax(".c");
///
/// let (kind, state) = classify("/* hello", syntax, ClassifierState::Normal);
/// assert_eq!(kind, LineKind::Comment);
/// assert!(state.is_in_block_comment());
///
/// let (kind, state) = classify("hello */", syntax, state);
/// assert_eq!(kind, LineKind::Comment);
/// assert_eq!(state, ClassifierState::Normal);
/// ```
pub fn classify<'a>(
    line: &str,
    syntax: &'a CommentSyntax,
    state: ClassifierState<'a>,
) -> (LineKind, ClassifierState<'a>) {
    let line = line.trim_end_matches(['\n', '\r']);
    let stripped = line.trim_start();

    if stripped.is_empty() {
        return (LineKind::Blank, state);
    }

    if let ClassifierState::InBlockComment { close, .. } = state {
        return if line.contains(close) {
            (LineKind::Comment, ClassifierState::Normal)
        } else {
            (LineKind::Comment, state)
        };
    }

    for pair in &syntax.block {
        let Some(open_at) = line.find(pair.open.as_str()) else {
            continue;
        };
        let body_start = open_at + pair.open.len();

        return match line[body_start..].find(pair.close.as_str()) {
            Some(offset) => {
                let close_end = body_start + offset + pair.close.len();
                let before = line[..open_at].trim();
                let after = line[close_end..].trim();
                if before.is_empty() && after.is_empty() {
                    (LineKind::Comment, ClassifierState::Normal)
                } else {
                    (LineKind::Code, ClassifierState::Normal)
                }
            }
            None => (
                LineKind::Comment,
                ClassifierState::InBlockComment {
                    open: &pair.open,
                    close: &pair.close,
                },
            ),
        };
    }

    if syntax
        .line
        .iter()
        .any(|token| stripped.starts_with(token.as_str()))
    {
        return (LineKind::Comment, ClassifierState::Normal);
    }

    (LineKind::Code, ClassifierState::Normal)
}
