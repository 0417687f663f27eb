//! Input options for a statistics run.
//!
//! [`StatsOptions`] is built with chained setters and handed to
//! [`StatisticsService`](crate::StatisticsService). Everything has a usable
//! default: default excludes, every language, Python function stats on, C
//! function stats only when C-like files are found.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::data::aggregate::ResultShape;
use crate::data::language::LanguageTable;
use crate::source::filter::FilterConfig;

/// Shared flag that stops a run from starting new files.
///
/// Files already being processed finish normally; the result covers what
/// was done before the flag was raised.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Options for a statistics run.
#[derive(Debug, Clone)]
pub struct StatsOptions {
    /// File filter configuration
    pub file_filter: FilterConfig,
    /// Languages to count (empty = all)
    pub languages: Vec<String>,
    /// Compute Python function statistics
    pub python_functions: bool,
    /// Always compute C/C++ function statistics
    pub c_functions: bool,
    /// Worker threads (`None` = rayon's global pool)
    pub threads: Option<usize>,
    /// Files above this many bytes are skipped
    pub max_file_size: Option<u64>,
    /// Cooperative cancellation
    pub cancel: CancelFlag,
    /// Language table override (`None` = builtin)
    pub table: Option<Arc<LanguageTable>>,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            file_filter: FilterConfig::with_default_excludes(),
            languages: Vec::new(),
            python_functions: true,
            c_functions: false,
            threads: None,
            max_file_size: None,
            cancel: CancelFlag::new(),
            table: None,
        }
    }
}

impl StatsOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set file filter.
    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.file_filter = filter;
        self
    }

    /// Restrict the run to these language names (case-insensitive).
    pub fn languages<S: Into<String>>(mut self, languages: impl IntoIterator<Item = S>) -> Self {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Turn Python function statistics on or off.
    pub fn python_functions(mut self, enabled: bool) -> Self {
        self.python_functions = enabled;
        self
    }

    /// Force C/C++ function statistics on.
    pub fn c_functions(mut self, enabled: bool) -> Self {
        self.c_functions = enabled;
        self
    }

    /// Use a dedicated pool of `threads` workers.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Skip files larger than `bytes`.
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    /// Share a cancellation flag with the run.
    pub fn cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Count with a custom language table.
    pub fn language_table(mut self, table: LanguageTable) -> Self {
        self.table = Some(Arc::new(table));
        self
    }

    /// The language table in effect.
    pub fn table(&self) -> &LanguageTable {
        self.table.as_deref().unwrap_or(LanguageTable::builtin())
    }

    pub(crate) fn result_shape(&self) -> ResultShape {
        ResultShape {
            languages: self.languages.clone(),
            python_functions: self.python_functions,
            c_functions: self.c_functions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_defaults() {
        let options = StatsOptions::new();
        assert!(options.python_functions);
        assert!(!options.c_functions);
        assert!(options.languages.is_empty());
        assert_eq!(options.threads, None);
        assert!(!options.file_filter.matches(Path::new("repo/.git/config")));
        assert!(options.file_filter.matches(Path::new("repo/src/main.c")));
    }

    #[test]
    fn test_builder() {
        let options = StatsOptions::new()
            .languages(["Python", "C"])
            .python_functions(false)
            .c_functions(true)
            .threads(2)
            .max_file_size(1024);

        assert_eq!(options.languages, vec!["Python", "C"]);
        assert!(!options.python_functions);
        assert!(options.c_functions);
        assert_eq!(options.threads, Some(2));
        assert_eq!(options.max_file_size, Some(1024));

        let shape = options.result_shape();
        assert_eq!(shape.languages, options.languages);
        assert!(shape.c_functions);
    }

    #[test]
    fn test_custom_table() {
        let options = StatsOptions::new().language_table(LanguageTable::empty());
        assert_eq!(options.table().language(".py"), "Other");
        assert_eq!(StatsOptions::new().table().language(".py"), "Python");
    }

    #[test]
    fn test_cancel_flag_is_shared() {
        let flag = CancelFlag::new();
        let options = StatsOptions::new().cancel_flag(flag.clone());
        assert!(!options.cancel.is_cancelled());
        flag.cancel();
        assert!(options.cancel.is_cancelled());
    }
}
