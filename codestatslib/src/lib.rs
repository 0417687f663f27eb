//! # codestatslib
//!
//! A multi-language source statistics library: counts code, comment and
//! blank lines per language, extension and file, and measures function
//! lengths in Python and C/C++.
//!
//! ## Overview
//!
//! Every line of every file is classified by a small state machine that
//! knows the comment tokens of the file's language and whether the previous
//! line left a block comment open:
//!
//! - **Code**: any line with code on it, including code next to a comment
//! - **Comment**: lines holding only comment text (or sitting inside a
//!   block comment)
//! - **Blank**: whitespace-only lines, even inside a block comment
//!
//! On top of the line counts, functions are located and measured:
//!
//! - **Python**: parsed with tree-sitter; every `def` and `async def`,
//!   nested ones included
//! - **C/C++**: a lexer masks strings, characters and comments, then
//!   definitions are matched and their bodies found by brace counting
//!
//! ## Pipeline
//!
//! 1. [`source`]: discover files (glob filters, default excludes) and read
//!    them as text (binary sniffing, BOM-aware decoding)
//! 2. [`data`]: classify lines, count files, extract functions, aggregate
//! 3. [`output`]: shape results into tables for display
//!
//! [`StatisticsService`] runs the whole pipeline in parallel.
//!
//! ## Example
//!
//! ```rust
//! use codestatslib::{count_source, FilterConfig, LanguageTable, StatisticsService, StatsOptions};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! // Count a single source held in memory
//! let stats = count_source("lib.c", "// add\nint add(int a, int b) {\n    return a + b;\n}\n",
//!     LanguageTable::builtin());
//! assert_eq!(stats.code, 3);
//! assert_eq!(stats.comment, 1);
//!
//! // Count a directory tree
//! let dir = tempdir().unwrap();
//! fs::write(dir.path().join("app.py"), "def main():\n    pass\n").unwrap();
//! let result = StatisticsService::new(StatsOptions::new()).run(dir.path()).unwrap();
//! assert_eq!(result.by_language["Python"].code, 2);
//!
//! // Count with filtering
//! let filter = FilterConfig::with_default_excludes().exclude("**/generated/**").unwrap();
//! let result = StatisticsService::new(StatsOptions::new().filter(filter)).run(dir.path()).unwrap();
//! assert_eq!(result.summary.files, 1);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod options;
pub mod output;
pub mod service;
pub mod source;

pub use config::{discover_config, load_nearest, ConfigFile, CONFIG_FILE_NAME};
pub use data::{
    classify, count_file, count_lines, count_source, fold_extension, fold_file, fold_language,
    Aggregator, BlockComment, ClassifierState, CommentSyntax, FileStats, FunctionAnalyzer,
    FunctionStat, FunctionStats, LanguageTable, LineKind, StatisticsResult, Summary,
    NO_EXTENSION, OTHER_LANGUAGE,
};
pub use error::CodestatsError;
pub use options::{CancelFlag, StatsOptions};
pub use output::{Columns, Grouping, StatsTable, TableRow};
pub use service::{collect_statistics, StatisticsService};
pub use source::{discover_files, FilterConfig};

/// Result type for codestatslib operations
pub type Result<T> = std::result::Result<T, CodestatsError>;
