// SPDX-License-Identifier: GPL-3.0-or-later

//! Recognition of the interesting lines of an MSBuild or devenv log.
//!
//! A line can carry several markers at once: the echoed compiler command of
//! MSBuild contains the compiler path (which tells the toolset version and
//! the target architecture) and the compiler arguments.

use crate::catalog::{Architecture, ToolsetVersion};
use regex::Regex;
use std::sync::LazyLock;

/// A log line without its decorations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLine<'a> {
    /// The MSBuild project context number from the `2>` prefix.
    pub context: Option<u32>,
    pub text: &'a str,
}

/// Strips the byte order mark, the CI timestamp and the MSBuild node prefix.
pub fn split_prefix(line: &str) -> LogLine<'_> {
    let line = line.trim_start_matches('\u{feff}');
    match LINE_PREFIX.captures(line) {
        Some(captures) => {
            let end = captures.get(0).map_or(0, |m| m.end());
            let context = captures.name("context").and_then(|m| m.as_str().parse().ok());
            LogLine { context, text: &line[end..] }
        }
        None => LogLine { context: None, text: line },
    }
}

/// Facts a single log line tells about the build.
#[derive(Debug, Clone, PartialEq)]
pub enum Marker {
    /// A project file starts to build. The context is the number the project
    /// lines are prefixed with, when the log tells it.
    Project { path: String, context: Option<u32> },
    Toolset(ToolsetVersion),
    /// The banner the compiler prints when it is not run with `/nologo`.
    Compiler { full_version: String, version: Option<ToolsetVersion>, architecture: Option<Architecture> },
    Architecture(Architecture),
    Invocation { compiler: String, arguments: String },
}

/// Returns the markers of a line in the order they shall be applied: the
/// context markers first, the compiler invocation last.
pub fn recognize(text: &str) -> Vec<Marker> {
    let mut markers = Vec::new();

    if let Some(captures) = PROJECT.captures(text) {
        let (path, context) = match captures.name("child") {
            Some(child) => (child.as_str(), captures.name("child_id")),
            None => (&captures["parent"], captures.name("parent_id")),
        };
        let context = context.and_then(|m| m.as_str().parse().ok());
        markers.push(Marker::Project { path: path.to_string(), context });
    }

    for (pattern, conversion) in TOOLSET_MARKERS.iter() {
        if let Some(version) = pattern.captures(text).and_then(|captures| conversion(&captures[1])) {
            markers.push(Marker::Toolset(version));
        }
    }

    if let Some(captures) = COMPILER_BANNER.captures(text) {
        let full_version = captures["version"].to_string();
        markers.push(Marker::Compiler {
            version: ToolsetVersion::from_compiler_version(&full_version),
            architecture: Architecture::from_name(&captures["architecture"]),
            full_version,
        });
    }

    for (pattern, fixed) in ARCHITECTURE_MARKERS.iter() {
        let Some(captures) = pattern.captures(text) else {
            continue;
        };
        let architecture = fixed.or_else(|| captures.get(1).and_then(|m| Architecture::from_name(m.as_str())));
        if let Some(architecture) = architecture {
            markers.push(Marker::Architecture(architecture));
        }
    }

    if let Some(captures) = INVOCATION.captures(text) {
        markers.push(Marker::Invocation {
            compiler: captures["compiler"].trim().to_string(),
            arguments: captures["arguments"].to_string(),
        });
    }

    markers
}

static LINE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?Z\s+)?\s*(?:(?P<context>\d+)>)?")
        .expect("Invalid line prefix regex pattern")
});

// Project "C:\src\app.sln" (1) is building "C:\src\app\app.vcxproj" (2) on node 1 (default targets).
static PROJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"Project "(?P<parent>[^"]+)"(?: \((?P<parent_id>\d+)(?::\d+)?\))?(?: is building "(?P<child>[^"]+)"(?: \((?P<child_id>\d+)(?::\d+)?\))?)? on node \d+"#,
    )
    .expect("Invalid project regex pattern")
});

static COMPILER_BANNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Microsoft \(R\) (?:32-bit |64-bit )?C/C\+\+ (?:Optimizing )?Compiler Version (?P<version>\d+\.\d+\.\d+(?:\.\d+)?) for (?P<architecture>\w+)",
    )
    .expect("Invalid compiler banner regex pattern")
});

// The executable is `cl`, `cl.exe` or `CL.exe`, with or without a path, followed by a switch.
static INVOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?P<compiler>(?:.*?[\\/\s"])?(?i:cl)(?i:\.exe)?"?)\s+(?P<arguments>[/-].*)$"#)
        .expect("Invalid compiler invocation regex pattern")
});

type VersionConversion = fn(&str) -> Option<ToolsetVersion>;

static TOOLSET_MARKERS: LazyLock<Vec<(Regex, VersionConversion)>> = LazyLock::new(|| {
    let patterns: [(&str, VersionConversion); 6] = [
        // C:\Program Files (x86)\MSBuild\Microsoft.Cpp\v4.0\v110\Microsoft.CppBuild.targets
        (r"(?i)[\\/]v(\d{3})[\\/]Microsoft\.Cpp(?:Build|Common)\.targets", ToolsetVersion::from_platform_toolset),
        // Microsoft.Cpp.Win32.v110.targets
        (r"(?i)Microsoft\.Cpp\.\w+\.v(\d{3})\.targets", ToolsetVersion::from_platform_toolset),
        // Platforms\x64\PlatformToolsets\v141\Toolset.targets
        (r"(?i)PlatformToolsets[\\/]v(\d{3})[\\/]", ToolsetVersion::from_platform_toolset),
        // /p:PlatformToolset=v141 or PlatformToolset = v141
        (r#"PlatformToolset\s*=\s*"?[vV](\d{3})\b"#, ToolsetVersion::from_platform_toolset),
        // VC\Tools\MSVC\14.16.27023\bin\HostX86\x86\CL.exe
        (r"(?i)[\\/]VC[\\/]Tools[\\/]MSVC[\\/](\d+\.\d+)\.\d+[\\/]", ToolsetVersion::from_tools_version),
        // Microsoft Visual Studio 14.0\VC\bin\CL.exe
        (r"(?i)Microsoft Visual Studio (\d+\.0)[\\/]VC[\\/]bin", ToolsetVersion::from_tools_version),
    ];
    patterns
        .into_iter()
        .map(|(pattern, conversion)| (Regex::new(pattern).expect("Invalid toolset regex pattern"), conversion))
        .collect()
});

static ARCHITECTURE_MARKERS: LazyLock<Vec<(Regex, Option<Architecture>)>> = LazyLock::new(|| {
    let patterns: [(&str, Option<Architecture>); 6] = [
        // /p:Platform=x64 or Platform = "Win32"
        (r#"\bPlatform\s*=\s*"?(\w+)"#, None),
        // ------ Build started: Project: app, Configuration: Debug Win32 ------
        (r"Configuration: \w+ (\w+)", None),
        // Debug|x64
        (r"\w\|(\w+)", None),
        // VC\bin\x86_amd64\cl.exe
        (r"(?i)[\\/]bin[\\/](amd64|x86_amd64|x86_arm|amd64_arm|arm)[\\/]cl(?:\.exe)?\b", None),
        // VC\Tools\MSVC\14.16.27023\bin\HostX64\x64\cl.exe
        (r"(?i)[\\/]Host(?:x86|x64)[\\/](\w+)[\\/]cl(?:\.exe)?\b", None),
        // VC\bin\cl.exe hosts and targets x86
        (r"(?i)[\\/]VC[\\/]bin[\\/]cl(?:\.exe)?\b", Some(Architecture::X86)),
    ];
    patterns
        .into_iter()
        .map(|(pattern, fixed)| (Regex::new(pattern).expect("Invalid architecture regex pattern"), fixed))
        .collect()
});
