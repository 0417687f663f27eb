//! Extension to language and comment-syntax tables.
//!
//! The builtin table is built once on first use and shared read-only by
//! every worker. Custom tables can be built with [`LanguageTable::empty`]
//! and the `with_*` builders and handed to the counter and the service.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use once_cell::sync::Lazy;

use super::classifier::{classify, ClassifierState, LineKind};

/// Language name used for extensions missing from the table.
pub const OTHER_LANGUAGE: &str = "Other";

/// Key used in per-extension summaries for files without an extension.
pub const NO_EXTENSION: &str = "<noext>";

/// A block comment delimiter pair such as `/*` ... `*/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockComment {
    pub open: String,
    pub close: String,
}

impl BlockComment {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

/// Comment tokens registered for one extension.
///
/// An empty syntax (the default) has no comment tokens at all, so every
/// non-blank line classifies as code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentSyntax {
    /// Tokens that start a comment running to end of line.
    pub line: Vec<String>,
    /// Block comment pairs, tried in order.
    pub block: Vec<BlockComment>,
}

impl CommentSyntax {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(mut self, token: impl Into<String>) -> Self {
        self.line.push(token.into());
        self
    }

    pub fn block(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.block.push(BlockComment::new(open, close));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty() && self.block.is_empty()
    }
}

/// Mapping from file extension to language name and comment syntax.
///
/// Extensions are stored lowercased with their leading dot (`".py"`).
#[derive(Debug, Clone, Default)]
pub struct LanguageTable {
    languages: HashMap<String, String>,
    comments: HashMap<String, CommentSyntax>,
    text_like: HashSet<String>,
}

static EMPTY_SYNTAX: CommentSyntax = CommentSyntax {
    line: Vec::new(),
    block: Vec::new(),
};

static BUILTIN: Lazy<LanguageTable> = Lazy::new(LanguageTable::build_builtin);

const LANGUAGES: &[(&str, &str)] = &[
    (".py", "Python"),
    (".pyw", "Python"),
    (".pyi", "Python Stub"),
    (".pyx", "Cython"),
    (".pxd", "Cython Header"),
    (".pxi", "Cython Include"),
    (".java", "Java"),
    (".c", "C"),
    (".cpp", "C++"),
    (".cc", "C++"),
    (".cxx", "C++"),
    (".h", "C/C++ Header"),
    (".hpp", "C++ Header"),
    (".hh", "C++ Header"),
    (".hin", "C/C++ Header"),
    (".cs", "C#"),
    (".js", "JavaScript"),
    (".ts", "TypeScript"),
    (".tsx", "TypeScript React"),
    (".jsx", "JavaScript React"),
    (".vue", "Vue"),
    (".go", "Go"),
    (".rs", "Rust"),
    (".swift", "Swift"),
    (".kt", "Kotlin"),
    (".scala", "Scala"),
    (".php", "PHP"),
    (".rb", "Ruby"),
    (".sql", "SQL"),
    (".html", "HTML"),
    (".htm", "HTML"),
    (".css", "CSS"),
    (".pcss", "PostCSS"),
    (".postcss", "PostCSS"),
    (".scss", "SCSS"),
    (".less", "LESS"),
    (".xml", "XML"),
    (".json", "JSON"),
    (".yaml", "YAML"),
    (".yml", "YAML"),
    (".cfg", "Config"),
    (".conf", "Config"),
    (".ini", "INI"),
    (".properties", "Properties"),
    (".toml", "TOML"),
    (".gradle", "Gradle"),
    (".md", "Markdown"),
    (".markdown", "Markdown"),
    (".rst", "reStructuredText"),
    (".tex", "TeX"),
    (".sty", "TeX"),
    (".cls", "TeX"),
    (".csv", "CSV"),
    (".tsv", "TSV"),
    (".txt", "Text"),
    (".mk", "Makefile"),
    (".make", "Makefile"),
    (".gmk", "Makefile"),
    (".thrift", "Thrift"),
    (".ps1", "PowerShell"),
    (".psm1", "PowerShell"),
    (".sh", "Shell"),
    (".bash", "Shell"),
    (".zsh", "Shell"),
    (".bat", "Batch"),
    (".cmd", "Batch"),
    (".m", "MATLAB"),
    (".r", "R"),
];

const HASH: &[&str] = &[
    ".py", ".pyw", ".sh", ".ps1", ".psm1", ".toml", ".yaml", ".yml", ".r",
];

const SLASH: &[&str] = &[
    ".c", ".h", ".cpp", ".cc", ".cxx", ".hpp", ".hh", ".cs", ".java", ".go", ".js", ".ts", ".tsx", ".jsx", ".kt",
    ".scala", ".swift", ".rs",
];

const SLASH_STAR: &[&str] = &[
    ".c", ".h", ".cpp", ".cc", ".cxx", ".hpp", ".hh", ".cs", ".java", ".go", ".js", ".ts", ".tsx", ".jsx", ".kt",
    ".scala", ".swift", ".rs", ".sql", ".css", ".scss", ".less",
];

const MARKUP: &[&str] = &[".html", ".htm", ".xml", ".vue"];

const EXTRA_TEXT: &[&str] = &[
    ".txt", ".md", ".csv", ".tsv", ".cfg", ".conf", ".gradle", ".properties",
];

impl LanguageTable {
    /// The process-wide builtin table.
    pub fn builtin() -> &'static LanguageTable {
        &BUILTIN
    }

    /// A table with no entries: every file is `Other` and all code.
    pub fn empty() -> Self {
        Self::default()
    }

    fn build_builtin() -> Self {
        let mut table = Self::empty();

        for (ext, language) in LANGUAGES {
            table = table.with_language(ext, language);
        }
        for ext in HASH {
            table.syntax_mut(ext).line.push("#".to_string());
        }
        for ext in SLASH {
            table.syntax_mut(ext).line.push("//".to_string());
        }
        for ext in [".bat", ".cmd"] {
            let syntax = table.syntax_mut(ext);
            syntax.line.extend(["::", "REM ", "rem "].map(String::from));
        }
        table.syntax_mut(".sql").line.push("--".to_string());
        table
            .syntax_mut(".ini")
            .line
            .extend([";", "#"].map(String::from));
        for ext in [".m", ".tex"] {
            table.syntax_mut(ext).line.push("%".to_string());
        }
        for ext in SLASH_STAR {
            table.syntax_mut(ext).block.push(BlockComment::new("/*", "*/"));
        }
        for ext in MARKUP {
            table
                .syntax_mut(ext)
                .block
                .push(BlockComment::new("<!--", "-->"));
        }
        for ext in EXTRA_TEXT {
            table.text_like.insert((*ext).to_string());
        }

        table
    }

    fn syntax_mut(&mut self, ext: &str) -> &mut CommentSyntax {
        let ext = normalize_extension(ext);
        self.text_like.insert(ext.clone());
        self.comments.entry(ext).or_default()
    }

    /// Register (or replace) the language name for an extension.
    pub fn with_language(mut self, ext: &str, language: &str) -> Self {
        let ext = normalize_extension(ext);
        self.text_like.insert(ext.clone());
        self.languages.insert(ext, language.to_string());
        self
    }

    /// Register (or replace) the comment syntax for an extension.
    pub fn with_comments(mut self, ext: &str, syntax: CommentSyntax) -> Self {
        let ext = normalize_extension(ext);
        self.text_like.insert(ext.clone());
        self.comments.insert(ext, syntax);
        self
    }

    /// Language name for an extension, `Other` when unknown.
    pub fn language(&self, ext: &str) -> &str {
        self.languages
            .get(&normalize_extension(ext))
            .map(String::as_str)
            .unwrap_or(OTHER_LANGUAGE)
    }

    /// Comment syntax for an extension; empty when none is registered.
    pub fn comment_syntax(&self, ext: &str) -> &CommentSyntax {
        self.comments
            .get(&normalize_extension(ext))
            .unwrap_or(&EMPTY_SYNTAX)
    }

    /// Whether files with this extension are known to be text, so binary
    /// sniffing can be skipped.
    pub fn is_text_like(&self, ext: &str) -> bool {
        self.text_like.contains(&normalize_extension(ext))
    }

    /// All extensions mapped to the given language name.
    pub fn extensions_for(&self, language: &str) -> Vec<&str> {
        let mut exts: Vec<&str> = self
            .languages
            .iter()
            .filter(|(_, name)| name.as_str() == language)
            .map(|(ext, _)| ext.as_str())
            .collect();
        exts.sort_unstable();
        exts
    }

    /// Classify one line using the syntax registered for `ext`.
    pub fn classify<'a>(
        &'a self,
        line: &str,
        ext: &str,
        state: ClassifierState<'a>,
    ) -> (LineKind, ClassifierState<'a>) {
        classify(line, self.comment_syntax(ext), state)
    }
}

/// Lowercase an extension and make sure it carries a leading dot.
pub fn normalize_extension(ext: &str) -> String {
    let lower = ext.to_lowercase();
    if lower.is_empty() || lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

/// Extension of a path in table form (`".py"`), or `""` when it has none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| normalize_extension(&ext.to_string_lossy()))
        .unwrap_or_default()
}
