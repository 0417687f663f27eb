//! Function boundary detection for Python and C/C++.
//!
//! - [`python`]: tree-sitter based, reports every `def` and `async def`
//! - [`c`]: lexer plus brace counting, reports file-scope definitions
//!
//! [`FunctionAnalyzer::for_extension`] picks the analyzer for a file.

pub mod c;
pub mod python;

use std::path::Path;

use crate::data::language::{normalize_extension, LanguageTable};
use crate::data::stats::FunctionStat;
use crate::source::text::read_source;
use crate::Result;

/// Extensions routed to the Python analyzer.
pub const PYTHON_EXTENSIONS: &[&str] = &[".py", ".pyw"];

/// Extensions routed to the C/C++ analyzer.
pub const C_EXTENSIONS: &[&str] = &[".c", ".cpp", ".cc", ".cxx", ".h", ".hpp"];

/// Language names whose presence turns C/C++ function statistics on.
pub const C_LIKE_LANGUAGES: &[&str] = &["C", "C++", "C/C++ Header", "C++ Header"];

/// Which function analyzer handles a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionAnalyzer {
    Python,
    C,
}

impl FunctionAnalyzer {
    /// The analyzer for an extension, if any.
    pub fn for_extension(ext: &str) -> Option<Self> {
        let ext = normalize_extension(ext);
        if PYTHON_EXTENSIONS.contains(&ext.as_str()) {
            Some(FunctionAnalyzer::Python)
        } else if C_EXTENSIONS.contains(&ext.as_str()) {
            Some(FunctionAnalyzer::C)
        } else {
            None
        }
    }

    /// Extract functions from an already decoded source.
    pub fn analyze_source(self, path: &Path, source: &str) -> Vec<FunctionStat> {
        match self {
            FunctionAnalyzer::Python => python::analyze_source(path, source),
            FunctionAnalyzer::C => c::analyze_source(path, source),
        }
    }

    /// Read a file and extract its functions. Binary files yield nothing.
    pub fn analyze_file(self, path: impl AsRef<Path>) -> Result<Vec<FunctionStat>> {
        let path = path.as_ref();
        Ok(read_source(path, LanguageTable::builtin(), None)?
            .map(|source| self.analyze_source(path, &source))
            .unwrap_or_default())
    }
}
