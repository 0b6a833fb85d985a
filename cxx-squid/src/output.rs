// SPDX-License-Identifier: GPL-3.0-or-later

//! JSON rendering of the resolved configuration.
//!
//! The document has the merged view on the top level, and the settings of
//! every compilation unit in the `units` array (sorted by file). Macros are
//! written in the preprocessor form: `NAME` or `NAME VALUE`.
//!
//! ```json
//! {
//!   "include_directories": ["/src/include"],
//!   "defines": ["_WIN32", "_MSC_VER 1910"],
//!   "units": [
//!     { "file": "/src/main.cpp", "include_directories": ["/src/include"], "defines": ["_WIN32", "_MSC_VER 1910"] }
//!   ]
//! }
//! ```

use crate::configuration::SquidConfiguration;
use crate::settings::{Defines, IncludeDirectories};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct Document<'a> {
    include_directories: Vec<PathBuf>,
    defines: Vec<String>,
    units: Vec<Unit<'a>>,
}

#[derive(Debug, Serialize)]
struct Unit<'a> {
    file: &'a Path,
    include_directories: Vec<PathBuf>,
    defines: Vec<String>,
}

fn directories(directories: &IncludeDirectories) -> Vec<PathBuf> {
    directories.iter().cloned().collect()
}

fn defines(defines: &Defines) -> Vec<String> {
    defines.to_strings()
}

/// Writes the configuration as a pretty printed JSON document.
pub fn write_configuration<W: io::Write>(
    mut writer: W,
    configuration: &SquidConfiguration,
) -> Result<(), serde_json::Error> {
    let units = configuration
        .compilation_unit_source_files()
        .into_iter()
        .filter_map(|file| {
            let settings = configuration.compilation_unit_settings(file)?;
            Some(Unit {
                file,
                include_directories: directories(&settings.include_directories),
                defines: defines(&settings.defines),
            })
        })
        .collect();

    let document = Document {
        include_directories: directories(&configuration.include_directories()),
        defines: defines(&configuration.defines()),
        units,
    };

    serde_json::to_writer_pretty(&mut writer, &document)?;
    writeln!(writer).map_err(serde_json::Error::io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{CompilationUnitSettings, MacroDefinition};
    use serde_json::json;

    #[test]
    fn test_empty_configuration() {
        let mut buffer = Vec::new();
        write_configuration(&mut buffer, &SquidConfiguration::new()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value, json!({ "include_directories": [], "defines": [], "units": [] }));
    }

    #[test]
    fn test_configuration_with_units() {
        let mut configuration = SquidConfiguration::new();
        configuration.add_include_directory("/default");
        configuration.add_define(MacroDefinition::with_value("LEVEL", "1"));
        configuration.add_compilation_unit_settings(
            "/src/main.cpp",
            CompilationUnitSettings::new(
                ["/src/include"].into_iter().collect(),
                [MacroDefinition::flag("_WIN32"), MacroDefinition::with_value("LEVEL", "2")].into_iter().collect(),
            ),
        );

        let mut buffer = Vec::new();
        write_configuration(&mut buffer, &configuration).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(
            value,
            json!({
                "include_directories": ["/default", "/src/include"],
                "defines": ["LEVEL 2", "_WIN32"],
                "units": [{
                    "file": "/src/main.cpp",
                    "include_directories": ["/src/include"],
                    "defines": ["_WIN32", "LEVEL 2"],
                }],
            })
        );
    }
}
