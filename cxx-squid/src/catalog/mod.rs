// SPDX-License-Identifier: GPL-3.0-or-later

//! Predefined macros of known compiler toolsets.
//!
//! A compiler defines a set of macros on its own, depending on its version,
//! the target architecture and the switches it was invoked with. This module
//! reproduces that set from a `ToolsetProfile` without running the compiler.
//!
//! The result is built in layers, each one able to override the previous:
//!
//! 1. baseline macros, present for every profile,
//! 2. toolset family macros (`_WIN32` for MSVC),
//! 3. toolset version macros (`_MSC_VER`, `_MSC_FULL_VER`, `_ATL_VER`, ...),
//! 4. architecture macros (`_M_IX86`, `_M_X64`, ...),
//! 5. feature macros, driven by the command line switches.
//!
//! Every layer is static data. Supporting a new toolset version means adding a
//! row to the table in the family module, not writing new control flow.

mod msvc;

use crate::settings::{Defines, MacroDefinition};
use std::collections::BTreeSet;
use std::fmt;

/// A macro as it is written in the static tables.
pub(crate) type Macro = (&'static str, Option<&'static str>);

/// Placeholders for the macros which depend on the build environment.
///
/// The real values (time of the build, current file) are not known from a
/// build log, but the symbols must exist for the preprocessor.
#[rustfmt::skip]
const BASELINE: &[Macro] = &[
    ("_INTEGRAL_MAX_BITS", Some("64")),
    ("_MSC_BUILD", Some("1")),
    ("__COUNTER__", Some("0")),
    ("__DATE__", Some("\"??? ?? ????\"")),
    ("__FILE__", Some("\"file\"")),
    ("__LINE__", Some("1")),
    ("__TIME__", Some("\"??:??:??\"")),
    ("__TIMESTAMP__", Some("\"??? ?? ???? ??:??:??\"")),
];

/// Compiler families with known predefined macros.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ToolsetFamily {
    #[default]
    Msvc,
}

impl ToolsetFamily {
    pub fn tag(&self) -> &'static str {
        match self {
            ToolsetFamily::Msvc => "msvc",
        }
    }
}

impl fmt::Display for ToolsetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// The platform toolset number, like `141` for the `v141` toolset.
///
/// Any number can be represented. Numbers without a catalog entry resolve
/// to no version specific macros.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ToolsetVersion(u16);

impl ToolsetVersion {
    pub const fn new(toolset: u16) -> Self {
        Self(toolset)
    }

    pub fn number(&self) -> u16 {
        self.0
    }

    /// Parses the platform toolset name: `v141`, `V141` or `141`.
    pub fn from_platform_toolset(text: &str) -> Option<Self> {
        let digits = text.trim().trim_start_matches(['v', 'V']);
        if digits.len() == 3 && digits.bytes().all(|b| b.is_ascii_digit()) {
            digits.parse().ok().map(Self)
        } else {
            None
        }
    }

    /// Parses the version of the tools directory: `14.1`, `14.16` or `14.16.27023`.
    pub fn from_tools_version(text: &str) -> Option<Self> {
        let (major, minor) = major_minor(text)?;
        msvc::release_by_tools_version(major, minor).map(|release| Self(release.toolset))
    }

    /// Maps the compiler version (`19.10.24629`) to the toolset that ships it.
    pub fn from_compiler_version(text: &str) -> Option<Self> {
        let (major, minor) = major_minor(text)?;
        msvc::release_by_compiler_version(major, minor).map(|release| Self(release.toolset))
    }

    /// Whether the catalog has version specific macros for this toolset.
    pub fn is_known(&self) -> bool {
        msvc::release_by_toolset(self.0).is_some()
    }
}

impl fmt::Display for ToolsetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Splits a dotted version into major and a two digit minor number.
///
/// A single digit minor is a short form of the two digit one (`14.1` means
/// the `14.1x` series).
fn major_minor(text: &str) -> Option<(u16, u16)> {
    let mut parts = text.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor_text = parts.next()?;
    let minor: u16 = minor_text.parse().ok()?;
    let minor = if minor_text.len() == 1 { minor * 10 } else { minor };
    Some((major, minor))
}

/// Target architecture of the compilation.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Architecture {
    X86,
    X64,
    Arm,
    #[default]
    Unspecified,
}

impl Architecture {
    pub const ALL: [Architecture; 4] =
        [Architecture::X86, Architecture::X64, Architecture::Arm, Architecture::Unspecified];

    /// Maps the names used by MSBuild and the compiler directories.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "x86" | "win32" | "80x86" | "i386" => Some(Architecture::X86),
            "x64" | "amd64" | "x86_amd64" | "x86_64" => Some(Architecture::X64),
            "arm" | "x86_arm" | "amd64_arm" => Some(Architecture::Arm),
            _ => None,
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Architecture::X86 => "x86",
            Architecture::X64 => "x64",
            Architecture::Arm => "arm",
            Architecture::Unspecified => "unspecified",
        };
        write!(f, "{name}")
    }
}

/// Compiler features which imply predefined macros.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Feature {
    OpenMp,
    WinRt,
    Clr,
    ClrPure,
    ClrSafe,
    Exceptions,
    Rtti,
    MultithreadedRuntime,
    DebugRuntime,
    DynamicRuntime,
    NoDefaultLib,
    NativeWcharT,
    UnsignedChar,
    Wp64,
    RuntimeChecks,
    Avx,
    Avx2,
    Avx512,
    ArmFp,
    FpIa32,
    FpSse,
    Cpp14,
    Cpp17,
    Cpp20,
    CppLatest,
    ConformantCplusplus,
}

impl Feature {
    #[rustfmt::skip]
    pub const ALL: [Feature; 26] = [
        Feature::OpenMp, Feature::WinRt, Feature::Clr, Feature::ClrPure, Feature::ClrSafe,
        Feature::Exceptions, Feature::Rtti, Feature::MultithreadedRuntime, Feature::DebugRuntime,
        Feature::DynamicRuntime, Feature::NoDefaultLib, Feature::NativeWcharT, Feature::UnsignedChar,
        Feature::Wp64, Feature::RuntimeChecks, Feature::Avx, Feature::Avx2, Feature::Avx512,
        Feature::ArmFp, Feature::FpIa32, Feature::FpSse, Feature::Cpp14, Feature::Cpp17,
        Feature::Cpp20, Feature::CppLatest, Feature::ConformantCplusplus,
    ];

    /// The language standard features are mutually exclusive.
    pub fn is_language_standard(&self) -> bool {
        matches!(self, Feature::Cpp14 | Feature::Cpp17 | Feature::Cpp20 | Feature::CppLatest)
    }
}

/// A recognized compiler configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ToolsetProfile {
    pub family: ToolsetFamily,
    pub version: Option<ToolsetVersion>,
    /// The vendor build number as it was found, like `19.10.24629`.
    pub full_version: Option<String>,
    pub architecture: Architecture,
    pub features: BTreeSet<Feature>,
}

impl ToolsetProfile {
    pub fn new(family: ToolsetFamily) -> Self {
        Self { family, ..Default::default() }
    }

    pub fn with_version(mut self, version: ToolsetVersion) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = architecture;
        self
    }

    pub fn with_features(mut self, features: impl IntoIterator<Item = Feature>) -> Self {
        self.features.extend(features);
        self
    }
}

impl fmt::Display for ToolsetProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.family)?;
        match (&self.version, &self.full_version) {
            (Some(version), Some(full)) => write!(f, " {version} ({full})")?,
            (Some(version), None) => write!(f, " {version}")?,
            (None, Some(full)) => write!(f, " ({full})")?,
            (None, None) => write!(f, " (unknown version)")?,
        }
        write!(f, " {}", self.architecture)
    }
}

/// Computes the predefined macros of the profile.
///
/// The function is pure: the same profile always gives the same macros in
/// the same order.
pub fn resolve(profile: &ToolsetProfile) -> Defines {
    let mut defines = Defines::new();
    apply(&mut defines, BASELINE);
    match profile.family {
        ToolsetFamily::Msvc => msvc::resolve_into(profile, &mut defines),
    }
    defines
}

fn apply(defines: &mut Defines, table: &[Macro]) {
    defines.extend(table.iter().map(|(name, value)| MacroDefinition::new(*name, value.map(str::to_string))));
}
