//! Orchestration of a whole statistics run.
//!
//! Files are discovered, read, counted and analyzed in parallel with rayon.
//! Workers only return per-file outcomes; one [`Aggregator`] folds them
//! afterwards, so nothing mutable is shared between threads.

use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::data::aggregate::{language_selected, Aggregator, StatisticsResult};
use crate::data::counter::count_source;
use crate::data::functions::FunctionAnalyzer;
use crate::data::language::extension_of;
use crate::data::stats::{FileStats, FunctionStat};
use crate::error::CodestatsError;
use crate::options::StatsOptions;
use crate::source::filter::discover_files;
use crate::source::text::read_source;
use crate::Result;

/// Everything one worker learns about one file.
#[derive(Debug)]
struct FileOutcome {
    stats: FileStats,
    functions: Option<(FunctionAnalyzer, Vec<FunctionStat>)>,
}

/// Runs statistics over a directory tree.
#[derive(Debug, Clone, Default)]
pub struct StatisticsService {
    options: StatsOptions,
}

impl StatisticsService {
    pub fn new(options: StatsOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &StatsOptions {
        &self.options
    }

    /// Count every matching file under `root`.
    ///
    /// Fails only for run-level problems: a missing root or a worker pool
    /// that cannot be built. Unreadable files are logged and skipped.
    ///
    /// # Example
    ///
    /// ```rust
    /// use codestatslib::{StatisticsService, StatsOptions};
    /// use std::fs;
    /// use tempfile::tempdir;
    ///
    /// let dir = tempdir().unwrap();
    /// fs::write(dir.path().join("app.py"), "def f():\n    return 1\n").unwrap();
    /// fs::write(dir.path().join("main.c"), "int main(void) {\n    return 0;\n}\n").unwrap();
    ///
    /// let result = StatisticsService::new(StatsOptions::new())
    ///     .run(dir.path())
    ///     .unwrap();
    ///
    /// assert_eq!(result.summary.files, 2);
    /// assert_eq!(result.python_function_stats.unwrap().total_functions, 1);
    /// assert_eq!(result.c_function_stats.unwrap().total_functions, 1);
    /// ```
    pub fn run(&self, root: impl AsRef<Path>) -> Result<StatisticsResult> {
        let started = Instant::now();
        let root = root.as_ref();
        let table = self.options.table();

        let files: Vec<PathBuf> = discover_files(root, &self.options.file_filter)?
            .into_iter()
            .filter(|path| self.is_routed(path))
            .collect();
        info!("analyzing {} files under {}", files.len(), root.display());

        let outcomes = match self.options.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| CodestatsError::ThreadPool(e.to_string()))?;
                pool.install(|| self.process_all(&files))
            }
            None => self.process_all(&files),
        };

        let mut aggregator = Aggregator::new(table);
        for outcome in outcomes {
            aggregator.add_file(outcome.stats);
            if let Some((analyzer, functions)) = outcome.functions {
                aggregator.add_functions(analyzer, functions);
            }
        }
        if self.options.cancel.is_cancelled() {
            info!("run cancelled after {} files", aggregator.file_count());
        }

        Ok(aggregator.finish(&self.options.result_shape(), started.elapsed()))
    }

    /// Whether the language filter lets this file through.
    fn is_routed(&self, path: &Path) -> bool {
        let language = self.options.table().language(&extension_of(path));
        let routed = language_selected(&self.options.languages, language);
        if !routed {
            debug!("{} ({language}) filtered out", path.display());
        }
        routed
    }

    fn process_all(&self, files: &[PathBuf]) -> Vec<FileOutcome> {
        files
            .par_iter()
            .filter_map(|path| {
                if self.options.cancel.is_cancelled() {
                    return None;
                }
                self.process_file(path)
            })
            .collect()
    }

    fn process_file(&self, path: &Path) -> Option<FileOutcome> {
        let table = self.options.table();
        let source = match read_source(path, table, self.options.max_file_size) {
            Ok(Some(source)) => source,
            Ok(None) => return None,
            Err(e) => {
                warn!("skipping {e}");
                return None;
            }
        };

        let stats = count_source(path, &source, table);
        let functions = FunctionAnalyzer::for_extension(&extension_of(path))
            .filter(|analyzer| self.wants_functions(*analyzer))
            .map(|analyzer| {
                debug!("{}: {analyzer:?} functions", path.display());
                (analyzer, analyzer.analyze_source(path, &source))
            });

        Some(FileOutcome { stats, functions })
    }

    /// C functions are always collected: whether they are reported depends
    /// on the languages found, which is only known at the end.
    fn wants_functions(&self, analyzer: FunctionAnalyzer) -> bool {
        match analyzer {
            FunctionAnalyzer::Python => self.options.python_functions,
            FunctionAnalyzer::C => true,
        }
    }
}

/// Run with the given options. Shorthand for
/// `StatisticsService::new(options).run(root)`.
pub fn collect_statistics(
    root: impl AsRef<Path>,
    options: StatsOptions,
) -> Result<StatisticsResult> {
    StatisticsService::new(options).run(root)
}
