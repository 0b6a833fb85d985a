// SPDX-License-Identifier: GPL-3.0-or-later

//! This module contains the command line interface of the application.
//!
//! The command line parsing is implemented using the `clap` library. Every
//! option is optional: what is not given on the command line is taken from
//! the configuration file.

use clap::{ArgAction, ArgMatches, Command, arg, command};
use std::fmt;

/// Represents the command line arguments of the application.
#[derive(Debug, Default, PartialEq)]
pub struct Arguments {
    /// The path of the configuration file.
    pub config: Option<String>,
    pub verbose: u8,
    pub toolset: Option<String>,
    pub charset: Option<String>,
    pub base_dir: Option<String>,
    pub include_directories: Vec<String>,
    pub defines: Vec<String>,
    pub compilation_databases: Vec<String>,
    /// The path of the result file, the standard output when missing.
    pub output: Option<String>,
    pub build_logs: Vec<String>,
}

impl TryFrom<ArgMatches> for Arguments {
    type Error = anyhow::Error;

    fn try_from(matches: ArgMatches) -> Result<Self, Self::Error> {
        let one = |id: &str| matches.get_one::<String>(id).cloned();
        let many = |id: &str| -> Vec<String> {
            matches.get_many::<String>(id).map(|values| values.cloned().collect()).unwrap_or_default()
        };

        Ok(Arguments {
            config: one("config"),
            verbose: matches.get_count("verbose"),
            toolset: one("toolset"),
            charset: one("charset"),
            base_dir: one("base-dir"),
            include_directories: many("include"),
            defines: many("define"),
            compilation_databases: many("compilation-database"),
            output: one("output"),
            build_logs: many("LOG"),
        })
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Arguments: {self:?}")
    }
}

impl Arguments {
    /// The log filter the verbosity flag asks for.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Represents the command line interface of the application.
pub fn cli() -> Command {
    command!().args(&[
        arg!(-v --verbose ... "Sets the level of verbosity").action(ArgAction::Count),
        arg!(-c --config <FILE> "Path of the config file"),
        arg!(--toolset <KEY> "Toolset which produced the build logs, like \"Visual C++\""),
        arg!(--charset <NAME> "Character encoding of the build logs"),
        arg!(--"base-dir" <DIR> "Directory to resolve relative paths of the build logs against"),
        arg!(-I --include <DIR> "Project wide include directory").action(ArgAction::Append),
        arg!(-D --define <DEFINE> "Project wide macro, NAME or NAME=VALUE").action(ArgAction::Append),
        arg!(--"compilation-database" <FILE> "JSON compilation database to read").action(ArgAction::Append),
        arg!(-o --output <FILE> "Path of the result file"),
        arg!([LOG] ... "Build log files").action(ArgAction::Append),
    ])
}
