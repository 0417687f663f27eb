//! C/C++ function extraction.
//!
//! Two passes over the file:
//!
//! 1. A character-level lexer masks out comments and the contents of string
//!    and character literals, replacing them with spaces of the same byte
//!    width. What remains on every line is code, at its original offsets.
//! 2. Candidate signatures are searched on the masked lines, and the body of
//!    an accepted candidate is found by counting braces from its opening `{`.
//!
//! Because the brace counter only ever sees masked text, a `{` inside
//! `"..."`, `'{'` or `/* { */` never moves the depth.
//!
//! A body that is consumed is not searched again, so functions nested in
//! another function's body (lambdas, local classes) are not reported.

use std::path::Path;

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::data::stats::FunctionStat;
use crate::source::text::split_lines;

/// How many lines a parameter list may span before the candidate is dropped.
pub const MAX_SIGNATURE_LINES: usize = 8;

/// An identifier (optionally `Scope::`-qualified, or a `~Destructor`)
/// directly followed by `(`.
static CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<name>(?:\b[A-Za-z_]\w*\s*::\s*)*~?\b[A-Za-z_]\w*)\s*\(")
        .expect("candidate regex is valid")
});

static TYPE_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:typedef\s+)?(?:struct|union|enum)(?:\s+class)?\s+[A-Za-z_]\w*")
        .expect("type declaration regex is valid")
});

static CONTROL_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:if|while|for|switch|catch)\s*\(").expect("control regex is valid")
});

static QUALIFIERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\s*\b(?:const|noexcept|override|final|volatile)\b)*")
        .expect("qualifier regex is valid")
});

/// Words that look like calls but never name a function definition.
const KEYWORDS: &[&str] = &[
    "if",
    "else",
    "while",
    "for",
    "do",
    "switch",
    "case",
    "catch",
    "return",
    "throw",
    "sizeof",
    "alignof",
    "alignas",
    "decltype",
    "typeof",
    "noexcept",
    "new",
    "delete",
    "defined",
    "static_assert",
    "_Static_assert",
    "_Generic",
    "__attribute__",
    "__declspec",
    "asm",
    "__asm__",
];

/// Where the lexer resumes after an escaped character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    Code,
    InString,
    InChar,
}

/// Lexer state between two characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexState {
    #[default]
    Code,
    InString,
    InChar,
    InLineComment,
    InBlockComment,
    /// The previous character was a `\`; the next one is taken literally.
    Escaped(Resume),
}

impl From<Resume> for LexState {
    fn from(resume: Resume) -> Self {
        match resume {
            Resume::Code => LexState::Code,
            Resume::InString => LexState::InString,
            Resume::InChar => LexState::InChar,
        }
    }
}

impl LexState {
    /// State at the start of the next line.
    ///
    /// Line comments end with the line. Literals do too, unless the newline
    /// itself is escaped. Block comments carry over.
    fn at_line_end(self) -> Self {
        match self {
            LexState::InLineComment | LexState::InString | LexState::InChar => LexState::Code,
            LexState::Escaped(resume) => resume.into(),
            LexState::Code | LexState::InBlockComment => self,
        }
    }
}

fn blank(out: &mut String, c: char) {
    out.extend(std::iter::repeat(' ').take(c.len_utf8()));
}

/// Mask one line: comments and literal contents become spaces, quotes and
/// code are kept. Returns the masked line and the state for the next line.
pub fn mask_line(line: &str, mut state: LexState) -> (String, LexState) {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        let next = chars.peek().copied();
        state = match state {
            LexState::Code => match (c, next) {
                ('/', Some('/')) => {
                    chars.next();
                    out.push_str("  ");
                    LexState::InLineComment
                }
                ('/', Some('*')) => {
                    chars.next();
                    out.push_str("  ");
                    LexState::InBlockComment
                }
                ('"', _) => {
                    out.push(c);
                    LexState::InString
                }
                ('\'', _) => {
                    out.push(c);
                    LexState::InChar
                }
                ('\\', _) => {
                    out.push(c);
                    LexState::Escaped(Resume::Code)
                }
                _ => {
                    out.push(c);
                    LexState::Code
                }
            },
            LexState::InString | LexState::InChar => {
                let (quote, resume) = if state == LexState::InString {
                    ('"', Resume::InString)
                } else {
                    ('\'', Resume::InChar)
                };
                if c == quote {
                    out.push(c);
                    LexState::Code
                } else {
                    blank(&mut out, c);
                    if c == '\\' {
                        LexState::Escaped(resume)
                    } else {
                        state
                    }
                }
            }
            LexState::InLineComment => {
                blank(&mut out, c);
                state
            }
            LexState::InBlockComment => {
                if c == '*' && next == Some('/') {
                    chars.next();
                    out.push_str("  ");
                    LexState::Code
                } else {
                    blank(&mut out, c);
                    state
                }
            }
            LexState::Escaped(resume) => {
                if resume == Resume::Code {
                    out.push(c);
                } else {
                    blank(&mut out, c);
                }
                resume.into()
            }
        };
    }

    (out, state.at_line_end())
}

/// Mask every line of a source, threading the lexer state through.
pub fn mask_source(source: &str) -> Vec<String> {
    let mut state = LexState::Code;
    split_lines(source)
        .map(|line| {
            let (masked, next) = mask_line(line, state);
            state = next;
            masked
        })
        .collect()
}

/// Preprocessor lines, including `\` continuations.
fn directive_lines(source: &str, masked: &[String]) -> Vec<bool> {
    let mut directives = Vec::with_capacity(masked.len());
    let mut continued = false;
    for (line, text) in split_lines(source).zip(masked) {
        let is_directive = continued || text.trim_start().starts_with('#');
        continued = is_directive && line.trim_end().ends_with('\\');
        directives.push(is_directive);
    }
    directives
}

/// `struct|union|enum Name` lines, unless a parameter list precedes the
/// first `{` (a function returning a struct).
fn is_type_declaration(line: &str) -> bool {
    if !TYPE_DECLARATION.is_match(line) {
        return false;
    }
    let head = line.find('{').map_or(line, |at| &line[..at]);
    !head.contains('(')
}

fn is_keyword(name: &str) -> bool {
    let last = name.rsplit("::").next().unwrap_or(name);
    KEYWORDS.contains(&last)
}

/// Find the `)` matching the `(` at `(line, col)`.
fn close_paren(masked: &[String], line: usize, col: usize) -> Option<(usize, usize)> {
    let last = (line + MAX_SIGNATURE_LINES).min(masked.len());
    let mut depth = 0usize;

    for (l, text) in masked.iter().enumerate().take(last).skip(line) {
        let start = if l == line { col } else { 0 };
        for (offset, c) in text[start..].char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some((l, start + offset));
                    }
                }
                _ => {}
            }
        }
    }
    None
}

enum AfterParams {
    Body(usize, usize),
    Prototype,
    NotAFunction,
}

/// Decide what follows a parameter list that closes at `(line, col)`.
fn after_params(masked: &[String], line: usize, col: usize) -> AfterParams {
    let rest = &masked[line][col + 1..];
    let qualified = QUALIFIERS.find(rest).map_or(0, |m| m.end());
    let tail = &rest[qualified..];
    let trimmed = tail.trim_start();

    let offset = col + 1 + qualified + (tail.len() - trimmed.len());
    if trimmed.starts_with('{') {
        return AfterParams::Body(line, offset);
    }
    if is_initializer_list(trimmed) {
        return skip_initializers(masked, line, offset);
    }
    if trimmed.starts_with(';') {
        return AfterParams::Prototype;
    }
    if !trimmed.is_empty() {
        return AfterParams::NotAFunction;
    }

    let next = (line + 1..masked.len()).find(|&l| !masked[l].trim().is_empty());
    match next {
        Some(l) => {
            let text = &masked[l];
            let trimmed = text.trim_start();
            if trimmed.starts_with('{') {
                AfterParams::Body(l, text.len() - trimmed.len())
            } else if is_initializer_list(trimmed) {
                skip_initializers(masked, l, text.len() - trimmed.len())
            } else {
                AfterParams::NotAFunction
            }
        }
        None => AfterParams::NotAFunction,
    }
}

/// A constructor's member initializer list: `: a(1), b{2}`.
fn is_initializer_list(text: &str) -> bool {
    text.starts_with(':') && !text.starts_with("::")
}

/// Find the body `{` after the initializer list whose `:` is at
/// `(line, col)`. A `{` right after a name opens a braced initializer.
fn skip_initializers(masked: &[String], line: usize, col: usize) -> AfterParams {
    let last = (line + MAX_SIGNATURE_LINES).min(masked.len());
    let mut parens = 0usize;
    let mut braces = 0usize;
    let mut previous = ':';

    for (l, text) in masked.iter().enumerate().take(last).skip(line) {
        let start = if l == line { col + 1 } else { 0 };
        for (offset, c) in text[start..].char_indices() {
            let nested = parens > 0 || braces > 0;
            match c {
                '(' => parens += 1,
                ')' => parens = parens.saturating_sub(1),
                '{' if !nested && !(previous.is_alphanumeric() || "_>".contains(previous)) => {
                    return AfterParams::Body(l, start + offset);
                }
                '{' => braces += 1,
                '}' => braces = braces.saturating_sub(1),
                ';' if !nested => return AfterParams::NotAFunction,
                _ => {}
            }
            if !c.is_whitespace() {
                previous = c;
            }
        }
    }
    AfterParams::NotAFunction
}

struct Signature {
    name: String,
    body_line: usize,
    body_col: usize,
}

/// Look for a function definition whose name is on `line`.
fn find_signature(masked: &[String], line: usize) -> Option<Signature> {
    let text = &masked[line];
    if is_type_declaration(text) {
        trace!("line {}: type declaration", line + 1);
        return None;
    }

    for caps in CANDIDATE.captures_iter(text) {
        let (Some(whole), Some(name_match)) = (caps.get(0), caps.name("name")) else {
            continue;
        };
        let prefix = &text[..name_match.start()];
        if CONTROL_CALL.is_match(prefix) {
            trace!("line {}: inside a control statement", line + 1);
            return None;
        }

        let name: String = name_match.as_str().split_whitespace().collect();
        if is_keyword(&name) {
            continue;
        }
        if prefix.ends_with('*') || prefix.ends_with('&') {
            trace!("line {}: `{name}` looks like a pointer declaration", line + 1);
            continue;
        }

        let Some((close_line, close_col)) = close_paren(masked, line, whole.end() - 1) else {
            trace!("line {}: parameter list of `{name}` never closes", line + 1);
            continue;
        };

        match after_params(masked, close_line, close_col) {
            AfterParams::Body(body_line, body_col) => {
                return Some(Signature {
                    name,
                    body_line,
                    body_col,
                })
            }
            AfterParams::Prototype => trace!("line {}: `{name}` is a prototype", line + 1),
            AfterParams::NotAFunction => {}
        }
    }
    None
}

/// Line on which the body opened at `(line, col)` closes.
fn body_end(masked: &[String], line: usize, col: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (l, text) in masked.iter().enumerate().skip(line) {
        let start = if l == line { col } else { 0 };
        for c in text[start..].chars() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(l);
                    }
                }
                _ => {}
            }
        }
    }
    None
}

/// Extract the function definitions of a C or C++ source.
///
/// # Example
///
/// ```rust
/// use codestatslib::data::functions::c;
///
/// let source = "int add(int a, int b) {\n    return a + b;\n}\n";
/// let functions = c::analyze_source("math.c", source);
///
/// assert_eq!(functions.len(), 1);
/// assert_eq!(functions[0].name, "add");
/// assert_eq!((functions[0].start_line, functions[0].end_line), (1, 3));
/// ```
pub fn analyze_source(path: impl AsRef<Path>, source: &str) -> Vec<FunctionStat> {
    let path = path.as_ref();
    let masked = mask_source(source);
    let directives = directive_lines(source, &masked);
    let mut functions = Vec::new();

    let mut line = 0;
    while line < masked.len() {
        if directives[line] || masked[line].trim().is_empty() {
            line += 1;
            continue;
        }

        let Some(signature) = find_signature(&masked, line) else {
            line += 1;
            continue;
        };

        match body_end(&masked, signature.body_line, signature.body_col) {
            Some(end) => {
                functions.push(FunctionStat::new(
                    signature.name,
                    path,
                    line as u64 + 1,
                    end as u64 + 1,
                ));
                line = end + 1;
            }
            None => {
                trace!(
                    "{}:{}: body of `{}` never closes",
                    path.display(),
                    line + 1,
                    signature.name
                );
                line += 1;
            }
        }
    }

    functions
}
