//! Output formatting: present results as tables.
//!
//! This is the last stage of the pipeline. It provides:
//!
//! - **StatsTable**: headers, rows and an optional footer, all as strings
//! - **TableRow**: one row with a label and formatted values
//! - **Grouping** / **Columns**: what the rows are and which counts show
//!
//! All counting and aggregation happens in [`data`](crate::data); this
//! module only formats.
//!
//! ## Example
//!
//! ```rust
//! use codestatslib::output::{Columns, Grouping, StatsTable};
//! use codestatslib::{Aggregator, FileStats, LanguageTable, LineKind};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! let mut file = FileStats::new("src/app.py");
//! file.add_line(LineKind::Code);
//! let mut aggregator = Aggregator::new(LanguageTable::builtin());
//! aggregator.add_file(file);
//! let result = aggregator.finish(&Default::default(), Duration::ZERO);
//!
//! let table = StatsTable::from_result(&result, Grouping::ByLanguage, Columns::default(), Path::new("."));
//! assert_eq!(table.rows[0].label, "Python");
//! assert_eq!(table.footer.unwrap().label, "Total (1 files)");
//! ```

pub mod table;

pub use table::{Columns, Grouping, StatsTable, TableRow};
