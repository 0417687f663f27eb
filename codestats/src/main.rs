//! # codestats
//!
//! Count code, comment and blank lines per language, extension or file,
//! and report function lengths for Python and C/C++.
//!
//! ## Usage
//!
//! ```bash
//! # Count the current directory
//! codestats
//!
//! # Only Python and C, broken down by extension
//! codestats src -l Python -l C --by-ext
//!
//! # Filter files with glob patterns
//! codestats . --include "src/**" --exclude "**/generated/**"
//!
//! # Ten longest functions of each kind, as JSON
//! codestats . --c-functions --top 10 --output json
//! ```
//!
//! Defaults are read from the nearest `.codestats.toml` (or `--config`);
//! command-line flags win over the file.

mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use codestatslib::output::{Columns, Grouping};
use codestatslib::{load_nearest, ConfigFile, StatisticsService, StatsOptions};
use log::{debug, LevelFilter};

use render::{OutputMode, ReportOptions};

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("codestats")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Multi-language line counter with function-length statistics")
        .arg(
            Arg::new("path")
                .help("Path to analyze (defaults to current directory)")
                .default_value("."),
        )
        .arg(
            Arg::new("include")
                .short('i')
                .long("include")
                .action(ArgAction::Append)
                .help("Include files matching glob pattern"),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .action(ArgAction::Append)
                .help("Exclude files matching glob pattern"),
        )
        .arg(
            Arg::new("language")
                .short('l')
                .long("language")
                .action(ArgAction::Append)
                .help("Only count this language (can be specified multiple times)"),
        )
        .arg(
            Arg::new("by-ext")
                .long("by-ext")
                .action(ArgAction::SetTrue)
                .conflicts_with("by-file")
                .help("Show breakdown by file extension"),
        )
        .arg(
            Arg::new("by-file")
                .short('f')
                .long("by-file")
                .action(ArgAction::SetTrue)
                .help("Show breakdown by file"),
        )
        .arg(
            Arg::new("no-python-functions")
                .long("no-python-functions")
                .action(ArgAction::SetTrue)
                .help("Skip Python function statistics"),
        )
        .arg(
            Arg::new("c-functions")
                .long("c-functions")
                .action(ArgAction::SetTrue)
                .help("Always report C/C++ function statistics"),
        )
        .arg(
            Arg::new("top")
                .long("top")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .default_value("0")
                .help("List the N longest functions of each kind"),
        )
        .arg(
            Arg::new("threads")
                .short('j')
                .long("threads")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Number of worker threads"),
        )
        .arg(
            Arg::new("max-file-size")
                .long("max-file-size")
                .value_name("BYTES")
                .value_parser(value_parser!(u64))
                .help("Skip files larger than BYTES"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Read defaults from FILE instead of the nearest .codestats.toml"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Output format"),
        )
        .arg(
            Arg::new("no-comment")
                .long("no-comment")
                .action(ArgAction::SetTrue)
                .help("Hide the comment column"),
        )
        .arg(
            Arg::new("no-blank")
                .long("no-blank")
                .action(ArgAction::SetTrue)
                .help("Hide the blank column"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("More log output (-v info, -vv debug, -vvv trace)"),
        )
}

/// `-v` count to log level. `RUST_LOG` still wins when set.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Config file defaults: `--config` must load, a discovered file may not.
fn load_config(matches: &ArgMatches, path: &Path) -> anyhow::Result<Option<ConfigFile>> {
    match matches.get_one::<PathBuf>("config") {
        Some(config_path) => {
            let config = ConfigFile::load(config_path)
                .with_context(|| format!("cannot use --config {}", config_path.display()))?;
            Ok(Some(config))
        }
        None => Ok(load_nearest(path)),
    }
}

fn strings(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|v| v.cloned().collect())
        .unwrap_or_default()
}

/// Build run options: config file first, then command-line flags.
fn build_options(matches: &ArgMatches, path: &Path) -> anyhow::Result<StatsOptions> {
    let mut options = match load_config(matches, path)? {
        Some(config) => config.to_options()?,
        None => StatsOptions::new(),
    };

    let filter = options
        .file_filter
        .clone()
        .include_many(&strings(matches, "include"))?
        .exclude_many(&strings(matches, "exclude"))?;
    options = options.filter(filter);

    let languages = strings(matches, "language");
    if !languages.is_empty() {
        options = options.languages(languages);
    }
    if matches.get_flag("no-python-functions") {
        options = options.python_functions(false);
    }
    if matches.get_flag("c-functions") {
        options = options.c_functions(true);
    }
    if let Some(threads) = matches.get_one::<usize>("threads") {
        options = options.threads(*threads);
    }
    if let Some(bytes) = matches.get_one::<u64>("max-file-size") {
        options = options.max_file_size(*bytes);
    }
    Ok(options)
}

fn report_options(matches: &ArgMatches) -> ReportOptions {
    let grouping = if matches.get_flag("by-file") {
        Grouping::ByFile
    } else if matches.get_flag("by-ext") {
        Grouping::ByExtension
    } else {
        Grouping::ByLanguage
    };

    ReportOptions {
        grouping,
        columns: Columns {
            comment: !matches.get_flag("no-comment"),
            blank: !matches.get_flag("no-blank"),
        },
        top: matches.get_one::<usize>("top").copied().unwrap_or(0),
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let path = matches
        .get_one::<String>("path")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let options = build_options(matches, &path)?;
    debug!("options: {options:?}");

    let result = StatisticsService::new(options).run(&path)?;

    let mode = match matches.get_one::<String>("output").map(String::as_str) {
        Some("json") => OutputMode::Json,
        _ => OutputMode::Text,
    };
    let output = render::render(&result, mode, &report_options(matches), &path)?;
    print!("{output}");
    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(matches.get_count("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["codestats"];
        argv.extend(args);
        build_command().try_get_matches_from(argv).unwrap()
    }

    #[test]
    fn test_command_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let matches = parse(&[
            "-l",
            "Python",
            "--no-python-functions",
            "--c-functions",
            "--threads",
            "2",
            "--max-file-size",
            "1000",
            "-e",
            "**/gen/**",
        ]);

        let options = build_options(&matches, dir.path()).unwrap();
        assert_eq!(options.languages, vec!["Python"]);
        assert!(!options.python_functions);
        assert!(options.c_functions);
        assert_eq!(options.threads, Some(2));
        assert_eq!(options.max_file_size, Some(1000));
        assert!(!options.file_filter.matches(Path::new("x/gen/a.py")));
        assert!(!options.file_filter.matches(Path::new("x/.git/a")));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".codestats.toml"),
            "languages = [\"C\"]\nthreads = 4\npython_functions = false\n",
        )
        .unwrap();

        let matches = parse(&["--threads", "1"]);
        let options = build_options(&matches, dir.path()).unwrap();
        assert_eq!(options.languages, vec!["C"]);
        assert_eq!(options.threads, Some(1));
        assert!(!options.python_functions);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let matches = parse(&["--config", missing.to_str().unwrap()]);
        assert!(build_options(&matches, dir.path()).is_err());
    }

    #[test]
    fn test_report_options() {
        let report = report_options(&parse(&["--by-ext", "--no-blank", "--top", "3"]));
        assert_eq!(report.grouping, Grouping::ByExtension);
        assert!(report.columns.comment);
        assert!(!report.columns.blank);
        assert_eq!(report.top, 3);

        let report = report_options(&parse(&[]));
        assert_eq!(report.grouping, Grouping::ByLanguage);
        assert_eq!(report.top, 0);
    }

    #[test]
    fn test_by_ext_conflicts_with_by_file() {
        let result = build_command().try_get_matches_from(["codestats", "--by-ext", "--by-file"]);
        assert!(result.is_err());
    }
}
