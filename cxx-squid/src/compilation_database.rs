// SPDX-License-Identifier: GPL-3.0-or-later

//! Reading JSON compilation databases.
//!
//! A compilation database is a JSON array of records, each describing the
//! compilation of one source file. The format is defined in the LLVM project
//! [documentation](https://clang.llvm.org/docs/JSONCompilationDatabase.html).
//!
//! Entries compiled with `cl` (or `clang-cl`) are interpreted with the MSVC
//! switches and get the predefined macros of the compiler. Other entries are
//! taken as GCC compatible, only their explicit include directories and
//! definitions are used.

use crate::buildlog::switches::{SwitchAnalyzer, split_command_line};
use crate::catalog::{self, ToolsetFamily, ToolsetProfile};
use crate::paths;
use crate::settings::{CompilationUnitSettings, Defines, IncludeDirectories};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;

/// Represents an entry of the compilation database.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// The main translation unit source processed by this compilation step.
    pub file: PathBuf,
    /// The compile command argv as list of strings, `arguments[0]` is the
    /// compiler executable.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub arguments: Vec<String>,
    /// The compile command as a single shell-escaped string.
    ///
    /// Either `arguments` or `command` is required.
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde(default)]
    pub command: String,
    /// The working directory of the compilation. Relative paths of the
    /// command and the file are relative to this directory.
    pub directory: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl Entry {
    pub fn from_arguments(file: impl Into<PathBuf>, arguments: Vec<String>, directory: impl Into<PathBuf>) -> Self {
        Entry { file: file.into(), arguments, command: String::default(), directory: directory.into(), output: None }
    }

    pub fn from_command(file: impl Into<PathBuf>, command: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Entry {
            file: file.into(),
            arguments: Vec::default(),
            command: command.into(),
            directory: directory.into(),
            output: None,
        }
    }

    /// Semantic validation of the entry.
    pub fn validate(&self) -> Result<(), EntryError> {
        if self.file.as_os_str().is_empty() {
            return Err(EntryError::EmptyFileName);
        }
        if self.directory.as_os_str().is_empty() {
            return Err(EntryError::EmptyDirectory);
        }
        if self.command.is_empty() && self.arguments.is_empty() {
            return Err(EntryError::CommandOrArgumentsAreMissing);
        }
        if !self.command.is_empty() && !self.arguments.is_empty() {
            return Err(EntryError::CommandOrArgumentsArePresent);
        }
        Ok(())
    }

    /// The compiler command line of the entry as a list of arguments.
    ///
    /// A `command` of the MSVC compiler is split with the Windows rules,
    /// since its paths are full of backslashes. Other commands are split with
    /// the shell rules.
    pub fn to_arguments(&self) -> Result<Vec<String>, EntryError> {
        self.validate()?;

        if !self.arguments.is_empty() {
            return Ok(self.arguments.clone());
        }
        let windows = split_command_line(&self.command);
        if windows.first().is_some_and(|compiler| is_msvc_compiler(compiler)) {
            return Ok(windows);
        }
        Ok(shell_words::split(&self.command)?)
    }
}

/// Represents the possible errors that can occur when validating an entry.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Entry has an empty file field")]
    EmptyFileName,
    #[error("Entry has an empty directory field")]
    EmptyDirectory,
    #[error("Both command and arguments fields are empty")]
    CommandOrArgumentsAreMissing,
    #[error("Both command and arguments fields are present")]
    CommandOrArgumentsArePresent,
    #[error("Entry has an invalid command field: {0}")]
    InvalidCommand(#[from] shell_words::ParseError),
}

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to open compilation database {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Compilation database {path} is not a JSON array: {source}")]
    Syntax {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads the entries of a compilation database.
///
/// An element of the array which is not an entry is logged and skipped.
pub fn read(path: &Path) -> Result<Vec<Entry>, DatabaseError> {
    let file = fs::File::open(path)
        .map(io::BufReader::new)
        .map_err(|source| DatabaseError::Io { path: path.to_path_buf(), source })?;

    let elements: Vec<serde_json::Value> =
        serde_json::from_reader(file).map_err(|source| DatabaseError::Syntax { path: path.to_path_buf(), source })?;

    let entries = elements
        .into_iter()
        .enumerate()
        .filter_map(|(idx, element)| match serde_json::from_value::<Entry>(element) {
            Ok(entry) => Some(entry),
            Err(error) => {
                log::warn!("Compilation database {}: element {idx} is not an entry: {error}", path.display());
                None
            }
        })
        .collect();
    Ok(entries)
}

/// Computes the source file and its settings from an entry.
pub fn unit_settings(entry: &Entry) -> Result<(PathBuf, CompilationUnitSettings), EntryError> {
    let arguments = entry.to_arguments()?;
    let directory = paths::normalize(&entry.directory);

    let msvc = arguments.first().is_some_and(|compiler| is_msvc_compiler(compiler));
    let analyzer = if msvc { SwitchAnalyzer::msvc() } else { SwitchAnalyzer::gcc() };
    let invocation = analyzer.analyze(arguments.get(1..).unwrap_or_default());

    // The database does not tell the toolset version nor the target architecture.
    let mut defines = if msvc {
        let profile = ToolsetProfile::new(ToolsetFamily::Msvc).with_features(invocation.features.iter().copied());
        catalog::resolve(&profile)
    } else {
        Defines::new()
    };
    invocation.apply_macros(&mut defines);

    let include_directories: IncludeDirectories = invocation
        .include_directories
        .iter()
        .map(|include| paths::absolute_to(&directory, &paths::from_log(include)))
        .collect();

    let file = paths::absolute_to(&directory, &entry.file);
    Ok((file, CompilationUnitSettings::new(include_directories, defines)))
}

fn is_msvc_compiler(executable: &str) -> bool {
    let name = paths::from_log(executable);
    let stem = name.file_stem().and_then(|stem| stem.to_str()).unwrap_or_default();
    stem.eq_ignore_ascii_case("cl") || stem.eq_ignore_ascii_case("clang-cl")
}
