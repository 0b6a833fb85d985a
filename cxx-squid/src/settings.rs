// SPDX-License-Identifier: GPL-3.0-or-later

//! Value types describing the preprocessor environment of a translation unit.
//!
//! - `MacroDefinition`: a single preprocessor symbol with an optional value.
//! - `Defines`: an insertion-ordered set of macros, unique by name. A later
//!   definition of the same name replaces the value but keeps the position.
//! - `IncludeDirectories`: an ordered search path without duplicates. The
//!   first occurrence of a directory decides its position.
//! - `CompilationUnitSettings`: the include path and macros of one source file.

use crate::paths;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// A preprocessor symbol.
///
/// A missing value means the macro is defined without a replacement list,
/// like `_CPPUNWIND`.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct MacroDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl MacroDefinition {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self { name: name.into(), value }
    }

    /// A macro which is only checked for presence.
    pub fn flag(name: impl Into<String>) -> Self {
        Self { name: name.into(), value: None }
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: Some(value.into()) }
    }
}

/// Renders the macro the way the preprocessor front-end expects it: the name,
/// and the value separated by a single space when there is one.
impl fmt::Display for MacroDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) if !value.is_empty() => write!(f, "{} {}", self.name, value),
            _ => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DefineError {
    #[error("Macro definition has an empty name: '{0}'")]
    EmptyName(String),
    #[error("Macro name contains white space: '{0}'")]
    InvalidName(String),
}

/// Parses the command line form of a definition.
///
/// Accepts `NAME`, `NAME=VALUE` and the MSVC specific `NAME#VALUE`.
impl FromStr for MacroDefinition {
    type Err = DefineError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let (name, value) = match text.find(['=', '#']) {
            Some(idx) => (&text[..idx], Some(text[idx + 1..].to_string())),
            None => (text, None),
        };
        if name.is_empty() {
            return Err(DefineError::EmptyName(text.to_string()));
        }
        if name.contains(char::is_whitespace) {
            return Err(DefineError::InvalidName(text.to_string()));
        }
        Ok(Self { name: name.to_string(), value })
    }
}

/// Macros unique by name, in the order their names were first seen.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Defines {
    entries: Vec<MacroDefinition>,
}

impl Defines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the macro. An existing macro with the same name is overwritten.
    pub fn insert(&mut self, define: MacroDefinition) {
        match self.entries.iter_mut().find(|existing| existing.name == define.name) {
            Some(existing) => *existing = define,
            None => self.entries.push(define),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<MacroDefinition> {
        let idx = self.entries.iter().position(|define| define.name == name)?;
        Some(self.entries.remove(idx))
    }

    pub fn get(&self, name: &str) -> Option<&MacroDefinition> {
        self.entries.iter().find(|define| define.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MacroDefinition> {
        self.entries.iter()
    }

    /// The macros in their textual form, see `MacroDefinition`'s `Display`.
    pub fn to_strings(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}

impl Extend<MacroDefinition> for Defines {
    fn extend<I: IntoIterator<Item = MacroDefinition>>(&mut self, iter: I) {
        for define in iter {
            self.insert(define);
        }
    }
}

impl FromIterator<MacroDefinition> for Defines {
    fn from_iter<I: IntoIterator<Item = MacroDefinition>>(iter: I) -> Self {
        let mut defines = Defines::new();
        defines.extend(iter);
        defines
    }
}

impl<'a> IntoIterator for &'a Defines {
    type Item = &'a MacroDefinition;
    type IntoIter = std::slice::Iter<'a, MacroDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Ordered include search path.
///
/// Entries are compared after lexical normalization, so `inc` and `./inc`
/// are the same directory.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IncludeDirectories {
    entries: Vec<PathBuf>,
}

impl IncludeDirectories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the directory unless it is already on the path.
    ///
    /// Returns `true` when the directory was added.
    pub fn push(&mut self, directory: impl AsRef<Path>) -> bool {
        let normalized = paths::normalize(directory.as_ref());
        if self.entries.contains(&normalized) {
            false
        } else {
            self.entries.push(normalized);
            true
        }
    }

    pub fn contains(&self, directory: impl AsRef<Path>) -> bool {
        self.entries.contains(&paths::normalize(directory.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.entries.iter()
    }
}

impl<P: AsRef<Path>> Extend<P> for IncludeDirectories {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        for directory in iter {
            self.push(directory);
        }
    }
}

impl<P: AsRef<Path>> FromIterator<P> for IncludeDirectories {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut directories = IncludeDirectories::new();
        directories.extend(iter);
        directories
    }
}

impl<'a> IntoIterator for &'a IncludeDirectories {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The preprocessor environment of one source file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CompilationUnitSettings {
    pub include_directories: IncludeDirectories,
    pub defines: Defines,
}

impl CompilationUnitSettings {
    pub fn new(include_directories: IncludeDirectories, defines: Defines) -> Self {
        Self { include_directories, defines }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_definitions() {
        assert_eq!("NDEBUG".parse(), Ok(MacroDefinition::flag("NDEBUG")));
        assert_eq!("VERSION=3".parse(), Ok(MacroDefinition::with_value("VERSION", "3")));
        assert_eq!("VERSION#3".parse(), Ok(MacroDefinition::with_value("VERSION", "3")));
        assert_eq!("EMPTY=".parse(), Ok(MacroDefinition::with_value("EMPTY", "")));
        assert_eq!(
            "GREETING=\"a=b\"".parse(),
            Ok(MacroDefinition::with_value("GREETING", "\"a=b\""))
        );

        assert_eq!("=1".parse::<MacroDefinition>(), Err(DefineError::EmptyName("=1".to_string())));
        assert_eq!(
            "TWO WORDS".parse::<MacroDefinition>(),
            Err(DefineError::InvalidName("TWO WORDS".to_string()))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(MacroDefinition::flag("_CPPUNWIND").to_string(), "_CPPUNWIND");
        assert_eq!(MacroDefinition::with_value("_M_IX86", "600").to_string(), "_M_IX86 600");
        assert_eq!(MacroDefinition::with_value("EMPTY", "").to_string(), "EMPTY");
    }

    #[test]
    fn test_defines_last_writer_wins_keeps_position() {
        let mut defines = Defines::new();
        defines.insert(MacroDefinition::with_value("A", "1"));
        defines.insert(MacroDefinition::flag("B"));
        defines.insert(MacroDefinition::with_value("A", "2"));

        assert_eq!(defines.len(), 2);
        assert_eq!(defines.to_strings(), vec!["A 2", "B"]);
    }

    #[test]
    fn test_defines_remove() {
        let mut defines: Defines =
            vec![MacroDefinition::flag("A"), MacroDefinition::flag("B")].into_iter().collect();

        assert_eq!(defines.remove("A"), Some(MacroDefinition::flag("A")));
        assert_eq!(defines.remove("A"), None);
        assert!(!defines.contains("A"));
        assert!(defines.contains("B"));
    }

    #[test]
    fn test_include_directories_keep_first_occurrence() {
        let directories: IncludeDirectories = ["dir1", "dir2", "./dir1", "dir3/../dir2"].into_iter().collect();

        let entries: Vec<_> = directories.iter().cloned().collect();
        assert_eq!(entries, vec![PathBuf::from("dir1"), PathBuf::from("dir2")]);
        assert!(directories.contains("dir1/."));
    }
}
