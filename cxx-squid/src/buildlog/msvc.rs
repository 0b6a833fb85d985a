// SPDX-License-Identifier: GPL-3.0-or-later

//! Build log parser for the Microsoft C/C++ compiler.
//!
//! MSBuild logs of parallel builds interleave the output of several
//! projects; each line is prefixed with the number of the project context it
//! belongs to. The toolset version, the target architecture and the project
//! directory are therefore tracked per context. A context starts from what
//! was seen on the unprefixed lines.

use super::recognition::{self, Marker};
use super::switches::{SwitchAnalyzer, split_command_line};
use super::{BuildLogParser, LogEntry};
use crate::catalog::{self, Architecture, ToolsetFamily, ToolsetProfile, ToolsetVersion};
use crate::paths;
use crate::settings::{CompilationUnitSettings, IncludeDirectories};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default)]
struct BuildContext {
    project_dir: Option<PathBuf>,
    version: Option<ToolsetVersion>,
    full_version: Option<String>,
    architecture: Architecture,
}

pub struct VisualCppParser {
    analyzer: SwitchAnalyzer,
}

impl VisualCppParser {
    pub fn new() -> Self {
        Self { analyzer: SwitchAnalyzer::msvc() }
    }

    fn entries(&self, context: &BuildContext, arguments: &str, base_dir: &Path) -> Vec<LogEntry> {
        let invocation = self.analyzer.analyze(&split_command_line(arguments));
        if invocation.sources.is_empty() {
            log::debug!("Compiler invocation without source files: {arguments}");
            return vec![];
        }

        let working_dir = context.project_dir.as_deref().unwrap_or(base_dir);

        let profile = ToolsetProfile {
            family: ToolsetFamily::Msvc,
            version: context.version,
            full_version: context.full_version.clone(),
            architecture: context.architecture,
            features: invocation.features.clone(),
        };
        let mut defines = catalog::resolve(&profile);
        invocation.apply_macros(&mut defines);

        let include_directories: IncludeDirectories = invocation
            .include_directories
            .iter()
            .map(|directory| paths::absolute_to(working_dir, &paths::from_log(directory)))
            .collect();

        let settings = CompilationUnitSettings::new(include_directories, defines);
        log::debug!("Compiler invocation recognized as {profile}: {arguments}");

        invocation
            .sources
            .iter()
            .map(|source| LogEntry {
                source_file: paths::absolute_to(working_dir, &paths::from_log(source)),
                settings: settings.clone(),
            })
            .collect()
    }
}

impl Default for VisualCppParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildLogParser for VisualCppParser {
    fn parse(&self, lines: &mut dyn Iterator<Item = &str>, base_dir: &Path) -> Vec<LogEntry> {
        let mut shared = BuildContext::default();
        let mut contexts: HashMap<u32, BuildContext> = HashMap::new();
        let mut entries = Vec::new();

        for line in lines {
            let line = recognition::split_prefix(line);

            for marker in recognition::recognize(line.text) {
                if let Marker::Project { path, context } = &marker {
                    let project = paths::absolute_to(base_dir, &paths::from_log(path));
                    let directory = project.parent().map(Path::to_path_buf);
                    let target = match context.or(line.context) {
                        Some(id) => contexts.entry(id).or_insert_with(|| shared.clone()),
                        None => &mut shared,
                    };
                    target.project_dir = directory;
                    continue;
                }

                let context = match line.context {
                    Some(id) => contexts.entry(id).or_insert_with(|| shared.clone()),
                    None => &mut shared,
                };
                match marker {
                    Marker::Toolset(version) => context.version = Some(version),
                    Marker::Compiler { full_version, version, architecture } => {
                        if version.is_some() {
                            context.version = version;
                        }
                        if let Some(architecture) = architecture {
                            context.architecture = architecture;
                        }
                        context.full_version = Some(full_version);
                    }
                    Marker::Architecture(architecture) => context.architecture = architecture,
                    Marker::Invocation { arguments, .. } => {
                        entries.extend(self.entries(context, &arguments, base_dir));
                    }
                    Marker::Project { .. } => {}
                }
            }
        }

        log::debug!("Build log gave {} compilation unit entries", entries.len());
        entries
    }
}
