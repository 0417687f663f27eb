//! File filtering and discovery with glob pattern support.
//!
//! Paths are matched with `\` normalised to `/`, so the same patterns work
//! on every platform. Directories matching an exclude pattern are pruned
//! during the walk instead of being descended into.

use std::path::{Path, PathBuf};

use glob::Pattern;
use log::debug;
use walkdir::WalkDir;

use crate::error::CodestatsError;
use crate::Result;

/// Exclude patterns applied by [`FilterConfig::with_default_excludes`].
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "**/.git/**",
    "**/.svn/**",
    "**/node_modules/**",
    "**/.venv/**",
    "**/dist/**",
    "**/build/**",
    "**/__pycache__/**",
    "**/.vscode/**",
    "**/.VSCodeCounter/**",
];

/// Configuration for file filtering.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Glob patterns to include (if empty, include every file)
    pub include: Vec<Pattern>,
    /// Glob patterns to exclude
    pub exclude: Vec<Pattern>,
}

fn parse_pattern(pattern: &str) -> Result<Pattern> {
    Pattern::new(&pattern.replace('\\', "/")).map_err(|e| CodestatsError::InvalidGlob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

impl FilterConfig {
    /// Create a new empty filter config (includes every file).
    pub fn new() -> Self {
        Self::default()
    }

    /// A filter carrying [`DEFAULT_EXCLUDES`].
    pub fn with_default_excludes() -> Self {
        let exclude = DEFAULT_EXCLUDES
            .iter()
            .filter_map(|pattern| Pattern::new(pattern).ok())
            .collect();
        Self {
            include: Vec::new(),
            exclude,
        }
    }

    /// Add an include pattern.
    pub fn include(mut self, pattern: &str) -> Result<Self> {
        self.include.push(parse_pattern(pattern)?);
        Ok(self)
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        self.exclude.push(parse_pattern(pattern)?);
        Ok(self)
    }

    /// Add multiple include patterns.
    pub fn include_many<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for pattern in patterns {
            self = self.include(pattern.as_ref())?;
        }
        Ok(self)
    }

    /// Add multiple exclude patterns.
    pub fn exclude_many<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for pattern in patterns {
            self = self.exclude(pattern.as_ref())?;
        }
        Ok(self)
    }

    /// Check if a file path matches the filter criteria.
    ///
    /// A path matches if it matches no exclude pattern and at least one
    /// include pattern (or include is empty).
    pub fn matches(&self, path: &Path) -> bool {
        let path_str = normalize(path);

        if self.exclude.iter().any(|p| p.matches(&path_str)) {
            return false;
        }

        self.include.is_empty() || self.include.iter().any(|p| p.matches(&path_str))
    }

    /// Whether a directory is excluded, so nothing below it can match.
    ///
    /// The directory is tested with a trailing `/`, which lets patterns
    /// like `**/build/**` prune `build` itself.
    pub fn excludes_dir(&self, dir: &Path) -> bool {
        let mut dir_str = normalize(dir);
        if !dir_str.ends_with('/') {
            dir_str.push('/');
        }
        self.exclude.iter().any(|p| p.matches(&dir_str))
    }
}

/// Discover source files under a directory.
///
/// Walks the directory tree and returns every file that matches the filter,
/// sorted by path. A root that is itself a file yields just that file.
pub fn discover_files(root: impl AsRef<Path>, filter: &FilterConfig) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();

    if !root.exists() {
        return Err(CodestatsError::PathNotFound(root.to_path_buf()));
    }

    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root).follow_links(true).into_iter();

    for entry in walker.filter_entry(|e| {
        if e.depth() == 0 || !e.file_type().is_dir() {
            return true;
        }
        let pruned = filter.excludes_dir(e.path());
        if pruned {
            debug!("pruning {}", e.path().display());
        }
        !pruned
    }) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                debug!("walk error: {err}");
                continue;
            }
        };

        let path = entry.path();

        if entry.file_type().is_file() && filter.matches(path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn create_test_files(dir: &Path) {
        fs::create_dir_all(dir.join("src/utils")).unwrap();
        fs::create_dir_all(dir.join("tests")).unwrap();
        fs::create_dir_all(dir.join("build/out")).unwrap();
        fs::create_dir_all(dir.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(dir.join(".git/objects")).unwrap();

        fs::write(dir.join("src/main.c"), "int main(void) { return 0; }\n").unwrap();
        fs::write(dir.join("src/app.py"), "def f():\n    pass\n").unwrap();
        fs::write(dir.join("src/utils/helper.h"), "int help(void);\n").unwrap();
        fs::write(dir.join("tests/test_app.py"), "def test():\n    pass\n").unwrap();
        fs::write(dir.join("build/out/gen.c"), "// generated\n").unwrap();
        fs::write(dir.join("node_modules/pkg/index.js"), "x;\n").unwrap();
        fs::write(dir.join(".git/objects/abc"), "blob").unwrap();
        fs::write(dir.join("README.md"), "# Readme\n").unwrap();
        fs::write(dir.join("Makefile"), "all:\n").unwrap();
    }

    #[test]
    fn test_filter_matches_everything_by_default() {
        let filter = FilterConfig::new();

        assert!(filter.matches(Path::new("src/main.c")));
        assert!(filter.matches(Path::new("README.md")));
        assert!(filter.matches(Path::new("Makefile")));
    }

    #[test]
    fn test_filter_with_include_pattern() {
        let filter = FilterConfig::new().include("**/*.py").unwrap();

        assert!(filter.matches(Path::new("src/app.py")));
        assert!(filter.matches(Path::new("app.py")));
        assert!(!filter.matches(Path::new("src/main.c")));
    }

    #[test]
    fn test_filter_with_exclude_pattern() {
        let filter = FilterConfig::new().exclude("**/tests/**").unwrap();

        assert!(filter.matches(Path::new("src/app.py")));
        assert!(!filter.matches(Path::new("tests/test_app.py")));
        assert!(!filter.matches(Path::new("src/tests/test.c")));
    }

    #[test]
    fn test_filter_with_multiple_patterns() {
        let filter = FilterConfig::new()
            .include_many(&["**/src/**", "**/tests/**"])
            .unwrap()
            .exclude("**/utils/**")
            .unwrap();

        assert!(filter.matches(Path::new("project/src/main.c")));
        assert!(filter.matches(Path::new("project/tests/test.py")));
        assert!(!filter.matches(Path::new("project/src/utils/helper.h")));
        assert!(!filter.matches(Path::new("project/docs/index.md")));
    }

    #[test]
    fn test_backslashes_are_normalised() {
        let filter = FilterConfig::new().exclude("**\\vendor\\**").unwrap();

        assert!(!filter.matches(Path::new("a/vendor/lib.c")));
        assert!(filter.excludes_dir(Path::new("a/vendor")));
    }

    #[test]
    fn test_excludes_dir() {
        let filter = FilterConfig::with_default_excludes();

        assert!(filter.excludes_dir(Path::new("project/.git")));
        assert!(filter.excludes_dir(Path::new("project/node_modules")));
        assert!(filter.excludes_dir(Path::new("build")));
        assert!(!filter.excludes_dir(Path::new("project/src")));
        assert!(!filter.excludes_dir(Path::new("project/builder")));
    }

    #[test]
    fn test_discover_files_prunes_default_excludes() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let files = discover_files(temp.path(), &FilterConfig::with_default_excludes()).unwrap();

        assert!(files.iter().any(|p| p.ends_with("src/main.c")));
        assert!(files.iter().any(|p| p.ends_with("src/app.py")));
        assert!(files.iter().any(|p| p.ends_with("src/utils/helper.h")));
        assert!(files.iter().any(|p| p.ends_with("tests/test_app.py")));
        assert!(files.iter().any(|p| p.ends_with("README.md")));
        assert!(files.iter().any(|p| p.ends_with("Makefile")));

        assert!(!files.iter().any(|p| p.ends_with("build/out/gen.c")));
        assert!(!files.iter().any(|p| p.ends_with("node_modules/pkg/index.js")));
        assert!(!files.iter().any(|p| p.ends_with(".git/objects/abc")));

        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn test_discover_files_with_filter() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let filter = FilterConfig::with_default_excludes()
            .include("**/*.py")
            .unwrap()
            .exclude("**/tests/**")
            .unwrap();

        let files = discover_files(temp.path(), &filter).unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/app.py"));
    }

    #[test]
    fn test_discover_single_file() {
        let temp = tempdir().unwrap();
        let file_path = temp.path().join("test.c");
        fs::write(&file_path, "int x;\n").unwrap();

        let files = discover_files(&file_path, &FilterConfig::new()).unwrap();

        assert_eq!(files, vec![file_path]);
    }

    #[test]
    fn test_discover_files_nonexistent() {
        let result = discover_files("/nonexistent/path", &FilterConfig::new());

        assert!(matches!(result, Err(CodestatsError::PathNotFound(_))));
    }

    #[test]
    fn test_invalid_glob_pattern() {
        let result = FilterConfig::new().include("[invalid");

        if let Err(CodestatsError::InvalidGlob { pattern, .. }) = result {
            assert_eq!(pattern, "[invalid");
        } else {
            panic!("Expected InvalidGlob error");
        }
    }
}
