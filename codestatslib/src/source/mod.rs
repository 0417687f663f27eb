//! Source discovery: find files to analyze and read them as text.
//!
//! This module handles the first stage of the pipeline. It provides:
//!
//! - **File filtering**: Include/exclude files with glob patterns
//! - **Text reading**: Binary sniffing, size limits and BOM-aware decoding
//!
//! ## Example
//!
//! ```rust
//! use codestatslib::source::{discover_files, FilterConfig};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::create_dir(dir.path().join("node_modules")).unwrap();
//! fs::write(dir.path().join("node_modules/dep.js"), "x;\n").unwrap();
//! fs::write(dir.path().join("main.py"), "print(1)\n").unwrap();
//!
//! let filter = FilterConfig::with_default_excludes();
//! let files = discover_files(dir.path(), &filter).unwrap();
//! assert_eq!(files.len(), 1);
//! ```

pub mod filter;
pub mod text;

pub use filter::{discover_files, FilterConfig, DEFAULT_EXCLUDES};
pub use text::{decode, is_binary, read_source, split_lines, SourceLines};
