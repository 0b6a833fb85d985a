// SPDX-License-Identifier: GPL-3.0-or-later

//! The preprocessor configuration of a whole project.
//!
//! `SquidConfiguration` owns two independent things:
//!
//! - The project-wide defaults: include directories and macros set by the
//!   caller. These are used for files without a record of their own.
//! - The compilation unit records: one per source file, coming from build
//!   logs, compilation databases or direct calls. A new record for the same
//!   file replaces the old one as a whole.
//!
//! The merged view (`include_directories`, `defines`) is what the C++
//! front-end consumes when it does not ask for a single file.

use crate::buildlog::{self, Charset, LogEntry, Toolset};
use crate::compilation_database;
use crate::paths;
use crate::settings::{CompilationUnitSettings, Defines, IncludeDirectories, MacroDefinition};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Invalid arguments of the configuration calls.
///
/// Problems with the individual input files are not errors: those files are
/// reported in the log and contribute nothing.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("Unsupported charset: '{charset}'")]
    UnsupportedCharset { charset: String },
    #[error("Unsupported toolset: '{key}'")]
    UnsupportedToolset { key: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SquidConfiguration {
    base_dir: PathBuf,
    include_directories: IncludeDirectories,
    defines: Defines,
    units: BTreeMap<PathBuf, CompilationUnitSettings>,
    /// Unit keys in the order they were last written.
    write_order: Vec<PathBuf>,
}

impl Default for SquidConfiguration {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            include_directories: IncludeDirectories::default(),
            defines: Defines::default(),
            units: BTreeMap::new(),
            write_order: Vec::new(),
        }
    }
}

impl SquidConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relative paths in build logs are resolved against this directory.
    pub fn set_base_dir(&mut self, base_dir: impl AsRef<Path>) {
        self.base_dir = paths::normalize(base_dir.as_ref());
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn set_include_directories<P: AsRef<Path>>(&mut self, directories: impl IntoIterator<Item = P>) {
        self.include_directories = directories.into_iter().collect();
    }

    pub fn add_include_directory(&mut self, directory: impl AsRef<Path>) {
        self.include_directories.push(directory);
    }

    pub fn set_defines(&mut self, defines: impl IntoIterator<Item = MacroDefinition>) {
        self.defines = defines.into_iter().collect();
    }

    pub fn add_define(&mut self, define: MacroDefinition) {
        self.defines.insert(define);
    }

    pub fn default_include_directories(&self) -> &IncludeDirectories {
        &self.include_directories
    }

    pub fn default_defines(&self) -> &Defines {
        &self.defines
    }

    /// Installs the settings of the file, replacing what was there before.
    ///
    /// A replaced record counts as the latest write in the merged view.
    pub fn add_compilation_unit_settings(&mut self, file: impl AsRef<Path>, settings: CompilationUnitSettings) {
        let key = paths::normalize(file.as_ref());
        if self.units.insert(key.clone(), settings).is_some() {
            log::debug!("Compilation unit settings replaced: {}", file.as_ref().display());
            self.write_order.retain(|written| written != &key);
        }
        self.write_order.push(key);
    }

    /// The unit records in the order they were last written.
    fn units_in_write_order(&self) -> impl Iterator<Item = &CompilationUnitSettings> {
        self.write_order.iter().filter_map(|key| self.units.get(key))
    }

    pub fn compilation_unit_settings(&self, file: impl AsRef<Path>) -> Option<&CompilationUnitSettings> {
        self.units.get(&paths::normalize(file.as_ref()))
    }

    /// The files which have settings of their own, in sorted order.
    pub fn compilation_unit_source_files(&self) -> BTreeSet<&Path> {
        self.units.keys().map(PathBuf::as_path).collect()
    }

    /// The include path of the file: its own when it has a record, the
    /// project defaults otherwise.
    pub fn include_directories_for(&self, file: impl AsRef<Path>) -> &IncludeDirectories {
        self.compilation_unit_settings(file)
            .map_or(&self.include_directories, |settings| &settings.include_directories)
    }

    /// The macros of the file: its own when it has a record, the project
    /// defaults otherwise.
    pub fn defines_for(&self, file: impl AsRef<Path>) -> &Defines {
        self.compilation_unit_settings(file).map_or(&self.defines, |settings| &settings.defines)
    }

    /// The defaults followed by the include path of every file, in the
    /// order the files were written.
    pub fn include_directories(&self) -> IncludeDirectories {
        let mut result = self.include_directories.clone();
        for settings in self.units_in_write_order() {
            result.extend(settings.include_directories.iter());
        }
        result
    }

    /// The defaults followed by the macros of every file, in the order the
    /// files were written. The last value written for a name wins.
    pub fn defines(&self) -> Defines {
        let mut result = self.defines.clone();
        for settings in self.units_in_write_order() {
            result.extend(settings.defines.iter().cloned());
        }
        result
    }

    /// Installs the entries in order, later entries for a file replace
    /// earlier ones.
    pub fn add_log_entries(&mut self, entries: impl IntoIterator<Item = LogEntry>) {
        for entry in entries {
            self.add_compilation_unit_settings(entry.source_file, entry.settings);
        }
    }

    /// Reads the build logs and installs the compilation units they describe.
    ///
    /// The arguments are checked before any file is read. A log file which
    /// cannot be read is skipped, the others are still processed.
    pub fn set_compilation_properties_with_build_log<P: AsRef<Path>>(
        &mut self,
        log_files: &[P],
        toolset_key: &str,
        charset: &str,
    ) -> Result<(), ConfigurationError> {
        let charset = Charset::from_label(charset)
            .ok_or_else(|| ConfigurationError::UnsupportedCharset { charset: charset.to_string() })?;
        let toolset = Toolset::from_key(toolset_key)
            .ok_or_else(|| ConfigurationError::UnsupportedToolset { key: toolset_key.to_string() })?;

        let parser = toolset.parser();
        for log_file in log_files {
            let log_file = log_file.as_ref();
            match buildlog::read_log(log_file, charset) {
                Ok(text) => {
                    let entries = parser.parse(&mut text.lines(), &self.base_dir);
                    log::info!(
                        "Build log {} ({toolset}, {charset}) gave {} compilation unit entries",
                        log_file.display(),
                        entries.len()
                    );
                    self.add_log_entries(entries);
                }
                Err(error) => log::warn!("{error}, the build log is skipped"),
            }
        }
        Ok(())
    }

    /// Reads JSON compilation databases and installs the compilation units
    /// they describe.
    ///
    /// A database which cannot be read, and an entry which is not valid, is
    /// skipped.
    pub fn set_compilation_properties_with_compilation_database<P: AsRef<Path>>(&mut self, databases: &[P]) {
        for database in databases {
            let database = database.as_ref();
            let entries = match compilation_database::read(database) {
                Ok(entries) => entries,
                Err(error) => {
                    log::warn!("{error}, the compilation database is skipped");
                    continue;
                }
            };
            let mut installed = 0;
            for entry in &entries {
                match compilation_database::unit_settings(entry) {
                    Ok((file, settings)) => {
                        self.add_compilation_unit_settings(file, settings);
                        installed += 1;
                    }
                    Err(error) => log::warn!("Compilation database {}: {error}", database.display()),
                }
            }
            log::info!(
                "Compilation database {} gave {installed} of {} entries",
                database.display(),
                entries.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(directories: &[&str], defines: &[&str]) -> CompilationUnitSettings {
        CompilationUnitSettings::new(
            directories.iter().collect(),
            defines.iter().map(|define| define.parse::<MacroDefinition>().unwrap()).collect(),
        )
    }

    #[test]
    fn test_empty_configuration() {
        let configuration = SquidConfiguration::new();

        assert!(configuration.include_directories().is_empty());
        assert!(configuration.defines().is_empty());
        assert!(configuration.compilation_unit_source_files().is_empty());
    }

    #[test]
    fn test_replacement_keeps_one_record() {
        let mut configuration = SquidConfiguration::new();
        configuration.add_compilation_unit_settings("src/a.cpp", unit(&["first"], &["FIRST"]));
        configuration.add_compilation_unit_settings("src/./a.cpp", unit(&["second"], &["SECOND"]));

        assert_eq!(configuration.compilation_unit_source_files().len(), 1);
        let settings = configuration.compilation_unit_settings("src/a.cpp").unwrap();
        assert_eq!(settings, &unit(&["second"], &["SECOND"]));
    }

    #[test]
    fn test_distinct_keys_are_counted() {
        let mut configuration = SquidConfiguration::new();
        for file in ["a.cpp", "b.cpp", "c.cpp", "b.cpp"] {
            configuration.add_compilation_unit_settings(file, CompilationUnitSettings::default());
        }

        let files = configuration.compilation_unit_source_files();
        assert_eq!(files, BTreeSet::from([Path::new("a.cpp"), Path::new("b.cpp"), Path::new("c.cpp")]));
    }

    #[test]
    fn test_defaults_apply_to_files_without_record() {
        let mut configuration = SquidConfiguration::new();
        configuration.set_include_directories(["dir1", "dir2"]);
        configuration.add_define(MacroDefinition::flag("DEFAULT"));
        configuration.add_compilation_unit_settings("own.cpp", unit(&["own"], &["OWN"]));

        assert!(configuration.include_directories_for("other.cpp").contains("dir1"));
        assert!(configuration.defines_for("other.cpp").contains("DEFAULT"));

        assert!(!configuration.include_directories_for("own.cpp").contains("dir1"));
        assert!(configuration.defines_for("own.cpp").contains("OWN"));
        assert!(!configuration.defines_for("own.cpp").contains("DEFAULT"));
    }

    #[test]
    fn test_merged_view() {
        let mut configuration = SquidConfiguration::new();
        configuration.set_include_directories(["dir1", "dir2"]);
        configuration.set_defines([MacroDefinition::with_value("LEVEL", "1")]);
        configuration.add_compilation_unit_settings("b.cpp", unit(&["dir2", "dir4"], &["LEVEL=3"]));
        configuration.add_compilation_unit_settings("a.cpp", unit(&["dir3", "dir1"], &["LEVEL=2", "A"]));

        let directories: Vec<_> = configuration.include_directories().iter().cloned().collect();
        assert_eq!(directories, ["dir1", "dir2", "dir4", "dir3"].map(PathBuf::from).to_vec());

        assert_eq!(configuration.defines().to_strings(), vec!["LEVEL 2", "A"]);
    }

    #[test]
    fn test_merged_view_follows_write_order() {
        let mut configuration = SquidConfiguration::new();
        configuration.add_compilation_unit_settings("z.cpp", unit(&["zdir"], &["LEVEL=1"]));
        configuration.add_compilation_unit_settings("a.cpp", unit(&["adir"], &["LEVEL=2"]));

        let directories: Vec<_> = configuration.include_directories().iter().cloned().collect();
        assert_eq!(directories, ["zdir", "adir"].map(PathBuf::from).to_vec());
        assert_eq!(configuration.defines().get("LEVEL"), Some(&MacroDefinition::with_value("LEVEL", "2")));

        // A replaced record is the latest write.
        configuration.add_compilation_unit_settings("./z.cpp", unit(&["zdir2"], &["LEVEL=3"]));

        let directories: Vec<_> = configuration.include_directories().iter().cloned().collect();
        assert_eq!(directories, ["adir", "zdir2"].map(PathBuf::from).to_vec());
        assert_eq!(configuration.defines().get("LEVEL"), Some(&MacroDefinition::with_value("LEVEL", "3")));
        assert_eq!(configuration.compilation_unit_source_files().len(), 2);
    }

    #[test]
    fn test_invalid_arguments_are_reported() {
        let mut configuration = SquidConfiguration::new();
        let no_logs: [&str; 0] = [];

        assert_eq!(
            configuration.set_compilation_properties_with_build_log(&no_logs, "Visual C++", "no-such-charset"),
            Err(ConfigurationError::UnsupportedCharset { charset: "no-such-charset".into() })
        );
        assert_eq!(
            configuration.set_compilation_properties_with_build_log(&no_logs, "Borland", "UTF8"),
            Err(ConfigurationError::UnsupportedToolset { key: "Borland".into() })
        );
    }

    #[test]
    fn test_empty_log_list_is_a_no_op() {
        let mut configuration = SquidConfiguration::new();
        let no_logs: [PathBuf; 0] = [];

        assert_eq!(configuration.set_compilation_properties_with_build_log(&no_logs, "Visual C++", "UTF8"), Ok(()));
        assert!(configuration.include_directories().is_empty());
        assert!(configuration.defines().is_empty());
    }

    #[test]
    fn test_log_entries_replace_explicit_settings() {
        let mut configuration = SquidConfiguration::new();
        configuration.set_base_dir("/build");
        configuration.add_compilation_unit_settings("/build/main.cpp", unit(&["explicit"], &["EXPLICIT"]));

        let entries = buildlog::parse_log(["cl /c /Ilogged main.cpp"], "Visual C++", configuration.base_dir()).unwrap();
        configuration.add_log_entries(entries);

        let settings = configuration.compilation_unit_settings("/build/main.cpp").unwrap();
        assert!(settings.include_directories.contains("/build/logged"));
        assert!(!settings.defines.contains("EXPLICIT"));
    }
}
