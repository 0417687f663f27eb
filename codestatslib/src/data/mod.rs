//! Data collection: classify lines, find functions and aggregate.
//!
//! This module handles the second stage of the pipeline. It provides:
//!
//! - **Languages**: extension to language name and comment tokens
//! - **Classification**: the per-line code / comment / blank state machine
//! - **Counting**: per-file tallies (`count_file`, `count_source`)
//! - **Functions**: Python and C/C++ function boundary detection
//! - **Aggregation**: summaries per language, extension and run
//!
//! ## Example
//!
//! ```rust
//! use codestatslib::data::{count_source, LanguageTable};
//!
//! let stats = count_source("app.py", "# hi\nx = 1\n", LanguageTable::builtin());
//! assert_eq!((stats.code, stats.comment), (1, 1));
//! ```

pub mod aggregate;
pub mod classifier;
pub mod counter;
pub mod functions;
pub mod language;
pub mod stats;

pub use aggregate::{
    fold_extension, fold_file, fold_language, language_selected, Aggregator, ResultShape,
    StatisticsResult,
};
pub use classifier::{classify, ClassifierState, LineKind};
pub use counter::{count_file, count_lines, count_source};
pub use functions::{FunctionAnalyzer, C_EXTENSIONS, C_LIKE_LANGUAGES, PYTHON_EXTENSIONS};
pub use language::{
    extension_of, normalize_extension, BlockComment, CommentSyntax, LanguageTable, NO_EXTENSION,
    OTHER_LANGUAGE,
};
pub use stats::{FileStats, FunctionStat, FunctionStats, Summary};
