// SPDX-License-Identifier: GPL-3.0-or-later

//! The command line application: merges the command line arguments with the
//! configuration file, builds the project configuration and writes it out.

use crate::buildlog::{Charset, Toolset};
use crate::configuration::{ConfigurationError, SquidConfiguration};
use crate::settings::{DefineError, MacroDefinition};
use crate::{args, config, context, output, paths};
use anyhow::Context;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

pub struct Application {
    configuration: SquidConfiguration,
    toolset: String,
    charset: String,
    build_logs: Vec<PathBuf>,
    compilation_databases: Vec<PathBuf>,
    output: Option<PathBuf>,
}

/// Problems with the arguments of the application.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("Invalid define '{define}': {source}")]
    InvalidDefine {
        define: String,
        #[source]
        source: DefineError,
    },
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl Application {
    /// Merges the command line arguments over the configuration file values.
    ///
    /// Single values of the command line replace the file values. Include
    /// directories, macros and compilation databases of the command line are
    /// appended. Build logs given on the command line replace the ones of
    /// the file.
    pub fn configure(
        context: &context::Context,
        arguments: args::Arguments,
        config: config::Main,
    ) -> Result<Self, SetupError> {
        let current = context.current_directory.as_path();
        let resolve = |path: &Path| paths::absolute_to(current, path);

        let toolset = arguments.toolset.unwrap_or(config.toolset);
        if Toolset::from_key(&toolset).is_none() {
            return Err(ConfigurationError::UnsupportedToolset { key: toolset }.into());
        }
        let charset = arguments.charset.unwrap_or(config.charset);
        if Charset::from_label(&charset).is_none() {
            return Err(ConfigurationError::UnsupportedCharset { charset }.into());
        }

        let base_dir = arguments
            .base_dir
            .map(PathBuf::from)
            .or(config.base_dir)
            .map_or_else(|| current.to_path_buf(), |directory| resolve(&directory));

        let defines = config
            .defines
            .iter()
            .chain(arguments.defines.iter())
            .map(|define| {
                define
                    .parse::<MacroDefinition>()
                    .map_err(|source| SetupError::InvalidDefine { define: define.clone(), source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let include_directories = config
            .include_directories
            .into_iter()
            .chain(arguments.include_directories.into_iter().map(PathBuf::from))
            .map(|directory| paths::absolute_to(&base_dir, &directory));

        let build_logs = if arguments.build_logs.is_empty() {
            config.build_logs
        } else {
            arguments.build_logs.into_iter().map(PathBuf::from).collect()
        };

        let compilation_databases = config
            .compilation_databases
            .into_iter()
            .chain(arguments.compilation_databases.into_iter().map(PathBuf::from))
            .map(|database| resolve(&database))
            .collect();

        let mut configuration = SquidConfiguration::new();
        configuration.set_base_dir(&base_dir);
        configuration.set_include_directories(include_directories);
        configuration.set_defines(defines);

        Ok(Self {
            configuration,
            toolset,
            charset,
            build_logs: build_logs.iter().map(|file| resolve(file)).collect(),
            compilation_databases,
            output: arguments.output.map(PathBuf::from),
        })
    }

    /// Reads the inputs and writes the result.
    pub fn run(self) -> ExitCode {
        match self.execute() {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                log::error!("cxx-squid: {error:#}");
                ExitCode::FAILURE
            }
        }
    }

    fn execute(mut self) -> anyhow::Result<()> {
        self.configuration
            .set_compilation_properties_with_build_log(&self.build_logs, &self.toolset, &self.charset)?;
        self.configuration
            .set_compilation_properties_with_compilation_database(&self.compilation_databases);
        log::info!(
            "Configuration has {} compilation units",
            self.configuration.compilation_unit_source_files().len()
        );

        match &self.output {
            Some(path) => {
                let file = fs::File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                output::write_configuration(io::BufWriter::new(file), &self.configuration)
                    .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            }
            None => {
                output::write_configuration(io::stdout().lock(), &self.configuration)
                    .with_context(|| "Failed to write to standard output")?;
            }
        }
        Ok(())
    }
}
