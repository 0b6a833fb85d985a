// SPDX-License-Identifier: GPL-3.0-or-later

//! This module defines the configuration of the application.
//!
//! The configuration is either loaded from a file or used with default
//! values. The command line arguments can override each value.
//!
//! The configuration file syntax is based on the YAML format.
//! The default configuration file name is `cxx-squid.yml`.
//!
//! The configuration file location is searched in the following order:
//! 1. The current working directory
//! 2. The local configuration directory of the user
//! 3. The configuration directory of the user
//! 4. The local configuration directory of the application
//! 5. The configuration directory of the application
//!
//! ```yaml
//! schema: 1.0
//!
//! toolset: Visual C++
//! charset: UTF8
//! base_dir: /opt/project
//!
//! build_logs:
//!   - logs/msbuild.log
//! compilation_databases:
//!   - build/compile_commands.json
//!
//! include_directories:
//!   - /opt/project/include
//! defines:
//!   - NDEBUG
//!   - VERSION=3
//! ```

// Re-Export the types and the loader module content.
pub use loader::{ConfigError, Loader};
pub use types::*;
pub use validation::Validator;

mod types {
    use serde::Deserialize;
    use std::fmt;
    use std::path::PathBuf;

    pub(super) const SUPPORTED_SCHEMA_VERSION: &str = "1.0";
    pub const DEFAULT_TOOLSET: &str = "Visual C++";
    pub const DEFAULT_CHARSET: &str = "UTF8";

    /// Represents the application configuration.
    #[derive(Debug, PartialEq, serde::Deserialize, serde::Serialize)]
    pub struct Main {
        #[serde(deserialize_with = "validate_schema_version")]
        pub schema: String,
        /// Selects the build log recognition rules.
        #[serde(default = "default_toolset")]
        pub toolset: String,
        /// The encoding of the build logs.
        #[serde(default = "default_charset")]
        pub charset: String,
        /// Relative paths of the build logs are resolved against this.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub base_dir: Option<PathBuf>,
        #[serde(default)]
        pub build_logs: Vec<PathBuf>,
        #[serde(default)]
        pub compilation_databases: Vec<PathBuf>,
        /// Project wide include directories.
        #[serde(default)]
        pub include_directories: Vec<PathBuf>,
        /// Project wide macros in `NAME` or `NAME=VALUE` form.
        #[serde(default)]
        pub defines: Vec<String>,
    }

    impl Default for Main {
        fn default() -> Self {
            Self {
                schema: String::from(SUPPORTED_SCHEMA_VERSION),
                toolset: default_toolset(),
                charset: default_charset(),
                base_dir: None,
                build_logs: vec![],
                compilation_databases: vec![],
                include_directories: vec![],
                defines: vec![],
            }
        }
    }

    impl fmt::Display for Main {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            writeln!(f, "Configuration:")?;
            let yaml_string = serde_yml::to_string(self).map_err(|_| fmt::Error)?;
            for line in yaml_string.lines() {
                writeln!(f, "{line}")?;
            }
            Ok(())
        }
    }

    fn default_toolset() -> String {
        String::from(DEFAULT_TOOLSET)
    }

    fn default_charset() -> String {
        String::from(DEFAULT_CHARSET)
    }

    // Custom deserialization function to validate the schema version
    fn validate_schema_version<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let schema: String = Deserialize::deserialize(deserializer)?;
        if schema != SUPPORTED_SCHEMA_VERSION {
            use serde::de::Error;
            Err(Error::custom(format!(
                "Unsupported schema version: {schema}. Expected: {SUPPORTED_SCHEMA_VERSION}"
            )))
        } else {
            Ok(schema)
        }
    }
}

pub mod validation {
    use super::types::*;
    use crate::buildlog::{Charset, Toolset};
    use crate::settings::{DefineError, MacroDefinition};
    use std::collections::HashSet;
    use std::path::PathBuf;
    use thiserror::Error;

    /// Trait for validating configuration objects
    pub trait Validator<T> {
        type Error: std::error::Error;

        fn validate(config: &T) -> Result<(), Self::Error>;
    }

    /// Validation errors for configuration
    #[derive(Debug, Error)]
    pub enum ValidationError {
        #[error("Empty value for field '{field}' at: {idx}")]
        EmptyValue { field: &'static str, idx: usize },
        #[error("Duplicate {field} entry at: {idx}")]
        DuplicateEntry { field: &'static str, idx: usize },
        #[error("Unsupported toolset: '{key}'")]
        UnsupportedToolset { key: String },
        #[error("Unsupported charset: '{charset}'")]
        UnsupportedCharset { charset: String },
        #[error("Invalid define at {idx}: {source}")]
        InvalidDefine {
            idx: usize,
            #[source]
            source: DefineError,
        },
        #[error("Multiple validation errors: {errors:?}")]
        Multiple { errors: Vec<ValidationError> },
    }

    /// A single problem is reported as is, several as `Multiple`.
    fn into_result(mut errors: Vec<ValidationError>) -> Result<(), ValidationError> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple { errors }),
        }
    }

    /// Reports the empty and the repeated entries of a path list.
    fn check_paths(field: &'static str, paths: &[PathBuf], errors: &mut Vec<ValidationError>) {
        let mut seen = HashSet::new();
        for (idx, path) in paths.iter().enumerate() {
            if path.as_os_str().is_empty() {
                errors.push(ValidationError::EmptyValue { field, idx });
            } else if !seen.insert(path) {
                errors.push(ValidationError::DuplicateEntry { field, idx });
            }
        }
    }

    impl Validator<Main> for Main {
        type Error = ValidationError;

        fn validate(config: &Main) -> Result<(), Self::Error> {
            let mut errors = Vec::new();

            if Toolset::from_key(&config.toolset).is_none() {
                errors.push(ValidationError::UnsupportedToolset { key: config.toolset.clone() });
            }
            if Charset::from_label(&config.charset).is_none() {
                errors.push(ValidationError::UnsupportedCharset { charset: config.charset.clone() });
            }

            check_paths("build_logs", &config.build_logs, &mut errors);
            check_paths("compilation_databases", &config.compilation_databases, &mut errors);
            check_paths("include_directories", &config.include_directories, &mut errors);

            errors.extend(config.defines.iter().enumerate().filter_map(|(idx, define)| {
                define.parse::<MacroDefinition>().err().map(|source| ValidationError::InvalidDefine { idx, source })
            }));

            into_result(errors)
        }
    }

}

pub mod loader {
    use super::{Main, Validator};
    use directories::{BaseDirs, ProjectDirs};
    use log::{debug, info};
    use std::fs::File;
    use std::io::{BufReader, Read};
    use std::path::{Path, PathBuf};
    use thiserror::Error;

    const CONFIG_FILE_NAME: &str = "cxx-squid.yml";

    pub struct Loader {}

    impl Loader {
        /// Loads the configuration from the specified file or the default locations.
        ///
        /// If the configuration file is not found in the default locations,
        /// the default configuration is returned.
        pub fn load(context: &crate::context::Context, filename: &Option<String>) -> Result<Main, ConfigError> {
            if let Some(path) = filename {
                return Self::from_file(Path::new(path));
            }
            for location in Self::file_locations(context) {
                debug!("Checking configuration file: {}", location.display());
                if location.exists() {
                    return Self::from_file(location.as_path());
                }
            }
            debug!("Configuration file not found. Using the default configuration.");
            Ok(Main::default())
        }

        /// The candidate files: the current directory first, then the
        /// directories of the user configuration.
        fn file_locations(context: &crate::context::Context) -> Vec<PathBuf> {
            let user_dirs = BaseDirs::new()
                .map(|dirs| vec![dirs.config_local_dir().to_path_buf(), dirs.config_dir().to_path_buf()])
                .unwrap_or_default();
            let project_dirs = ProjectDirs::from("org", "sonar-cxx", "cxx-squid")
                .map(|dirs| vec![dirs.config_local_dir().to_path_buf(), dirs.config_dir().to_path_buf()])
                .unwrap_or_default();

            let mut directories = vec![context.current_directory.clone()];
            directories.extend(user_dirs);
            directories.extend(project_dirs);
            directories.dedup();
            directories.into_iter().map(|directory| directory.join(CONFIG_FILE_NAME)).collect()
        }

        /// Reads, parses and validates the configuration file.
        pub fn from_file(path: &Path) -> Result<Main, ConfigError> {
            info!("Loading configuration file: {}", path.display());

            let file = File::open(path).map_err(|source| ConfigError::FileAccess { path: path.to_path_buf(), source })?;
            let content = Self::parse(BufReader::new(file))
                .map_err(|source| ConfigError::ParseError { path: path.to_path_buf(), source })?;
            Main::validate(&content)
                .map_err(|source| ConfigError::ValidationError { path: path.to_path_buf(), source })?;

            Ok(content)
        }

        fn parse(reader: impl Read) -> serde_yml::Result<Main> {
            serde_yml::from_reader(reader)
        }
    }

    /// Represents all possible configuration-related errors.
    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("Failed to access configuration file '{path}': {source}")]
        FileAccess {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },
        #[error("Failed to parse configuration from file '{path}': {source}")]
        ParseError {
            path: PathBuf,
            #[source]
            source: serde_yml::Error,
        },
        #[error("Configuration validation failed in '{path}': {source}")]
        ValidationError {
            path: PathBuf,
            #[source]
            source: crate::config::validation::ValidationError,
        },
    }

}
