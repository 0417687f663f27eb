//! `.codestats.toml` configuration files.
//!
//! A config file holds defaults for a project:
//!
//! ```toml
//! include = ["src/**"]
//! exclude = ["**/generated/**"]
//! languages = ["Python", "C"]
//! python_functions = true
//! c_functions = true
//! threads = 4
//! max_file_size = 1048576
//! ```
//!
//! Every key is optional. Patterns are added on top of the default
//! excludes.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;

use crate::error::CodestatsError;
use crate::options::StatsOptions;
use crate::source::filter::FilterConfig;
use crate::Result;

/// File name searched for by [`discover_config`].
pub const CONFIG_FILE_NAME: &str = ".codestats.toml";

/// How many directories [`discover_config`] climbs before giving up.
pub const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Contents of a `.codestats.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub python_functions: Option<bool>,
    pub c_functions: Option<bool>,
    pub threads: Option<usize>,
    pub max_file_size: Option<u64>,
}

impl ConfigFile {
    /// Parse TOML text. `path` is only used in the error.
    pub fn parse(contents: &str, path: &Path) -> Result<Self> {
        toml::from_str(contents).map_err(|e| CodestatsError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| CodestatsError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::parse(&contents, path)?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Build run options from this file on top of the defaults.
    pub fn to_options(&self) -> Result<StatsOptions> {
        let filter = FilterConfig::with_default_excludes()
            .include_many(&self.include)?
            .exclude_many(&self.exclude)?;

        let mut options = StatsOptions::new()
            .filter(filter)
            .languages(self.languages.iter().cloned());
        if let Some(enabled) = self.python_functions {
            options = options.python_functions(enabled);
        }
        if let Some(enabled) = self.c_functions {
            options = options.c_functions(enabled);
        }
        if let Some(threads) = self.threads {
            options = options.threads(threads);
        }
        if let Some(bytes) = self.max_file_size {
            options = options.max_file_size(bytes);
        }
        Ok(options)
    }
}

/// Ancestors of `start`, itself first, at most `max_depth` of them.
fn directory_ancestors(start: &Path, max_depth: usize) -> impl Iterator<Item = &Path> {
    start.ancestors().take(max_depth)
}

/// Find the nearest `.codestats.toml` at or above `start`.
///
/// `start` may be a file, in which case the search begins at its directory.
pub fn discover_config(start: impl AsRef<Path>) -> Option<PathBuf> {
    let start = start.as_ref();
    let start = if start.is_file() {
        start.parent().unwrap_or(start)
    } else {
        start
    };

    let found = directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file());
    if found.is_none() {
        debug!(
            "no {CONFIG_FILE_NAME} within {MAX_TRAVERSAL_DEPTH} directories of {}",
            start.display()
        );
    }
    found
}

/// Load the nearest config file, if any.
///
/// A discovered file that cannot be read or parsed is reported with a
/// warning and ignored.
pub fn load_nearest(start: impl AsRef<Path>) -> Option<ConfigFile> {
    let path = discover_config(start)?;
    match ConfigFile::load(&path) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("ignoring {}: {e}", path.display());
            None
        }
    }
}
