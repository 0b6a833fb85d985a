// SPDX-License-Identifier: GPL-3.0-or-later

//! Build log parsing.
//!
//! A build log is the captured output of a build tool. The parsers in this
//! module scan it for compiler invocations of a toolset, and turn each into
//! the include path and macros its source files were compiled with. Lines
//! which are not understood are ignored.

pub mod msvc;
pub mod reader;
pub mod recognition;
pub mod switches;

pub use reader::{Charset, ReadError, read_log};

use crate::settings::CompilationUnitSettings;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// The compiler families which have a build log parser.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Toolset {
    VisualCpp,
}

impl Toolset {
    /// Finds the toolset by the key used in the configuration.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        ["Visual C++", "vc++", "msvc"]
            .iter()
            .any(|known| known.eq_ignore_ascii_case(key))
            .then_some(Toolset::VisualCpp)
    }

    pub fn key(&self) -> &'static str {
        match self {
            Toolset::VisualCpp => "Visual C++",
        }
    }

    pub fn parser(&self) -> Box<dyn BuildLogParser> {
        match self {
            Toolset::VisualCpp => Box::new(msvc::VisualCppParser::new()),
        }
    }
}

impl fmt::Display for Toolset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("Unsupported toolset: '{key}'")]
pub struct UnknownToolset {
    pub key: String,
}

impl FromStr for Toolset {
    type Err = UnknownToolset;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Toolset::from_key(key).ok_or_else(|| UnknownToolset { key: key.to_string() })
    }
}

/// The settings of one source file, as a compiler invocation in the log tells.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub source_file: PathBuf,
    pub settings: CompilationUnitSettings,
}

/// Turns the lines of a build log into compilation unit entries.
///
/// The entries are returned in the order of the log. When a file was
/// compiled more than once, it has more entries; the last one reflects the
/// latest state. Relative paths are resolved against the project directory
/// of the invocation, or the base directory when the log does not tell it.
pub trait BuildLogParser {
    fn parse(&self, lines: &mut dyn Iterator<Item = &str>, base_dir: &Path) -> Vec<LogEntry>;
}

/// Parses the lines with the parser of the toolset named by the key.
pub fn parse_log<'a, I>(lines: I, toolset_key: &str, base_dir: &Path) -> Result<Vec<LogEntry>, UnknownToolset>
where
    I: IntoIterator<Item = &'a str>,
{
    let toolset: Toolset = toolset_key.parse()?;
    let mut lines = lines.into_iter();
    Ok(toolset.parser().parse(&mut lines, base_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolset_keys() {
        assert_eq!(Toolset::from_key("Visual C++"), Some(Toolset::VisualCpp));
        assert_eq!(Toolset::from_key("visual c++"), Some(Toolset::VisualCpp));
        assert_eq!(Toolset::from_key(" MSVC "), Some(Toolset::VisualCpp));
        assert_eq!(Toolset::from_key("VC++"), Some(Toolset::VisualCpp));
        assert_eq!(Toolset::from_key("gcc"), None);

        assert_eq!("Borland".parse::<Toolset>(), Err(UnknownToolset { key: "Borland".into() }));
    }

    #[test]
    fn test_parse_log_empty_input() {
        let entries = parse_log(std::iter::empty(), "Visual C++", Path::new("/build")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_parse_log_unknown_toolset() {
        let result = parse_log(["cl /c main.cpp"], "Turbo C", Path::new("/build"));
        assert_eq!(result, Err(UnknownToolset { key: "Turbo C".into() }));
    }

    #[test]
    fn test_parse_log_later_entries_come_last() {
        let log = ["cl /c /DFIRST main.cpp", "cl /c /DSECOND main.cpp"];
        let entries = parse_log(log, "msvc", Path::new("/build")).unwrap();

        assert_eq!(entries.len(), 2);
        assert!(entries[0].settings.defines.contains("FIRST"));
        assert!(entries[1].settings.defines.contains("SECOND"));
        assert!(!entries[1].settings.defines.contains("FIRST"));
    }
}
