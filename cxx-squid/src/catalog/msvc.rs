// SPDX-License-Identifier: GPL-3.0-or-later

//! Predefined macros of the Microsoft C/C++ compiler.
//!
//! https://learn.microsoft.com/en-us/cpp/preprocessor/predefined-macros

use super::{Architecture, Feature, Macro, ToolsetProfile, apply};
use crate::settings::Defines;

/// One toolset release and the macros identifying it.
pub(super) struct Release {
    /// Platform toolset number (`v141` is 141).
    pub toolset: u16,
    /// Major version of the tools directory (`VC\Tools\MSVC\14.16.27023`).
    pub tools_major: u16,
    /// Major version of the compiler (`cl.exe` 19.16.27023).
    pub compiler_major: u16,
    /// Minor versions, shared by the tools directory and the compiler.
    pub minor: (u16, u16),
    pub macros: &'static [Macro],
}

const CPP_DEFAULTS: [Macro; 2] = [("__cplusplus", Some("199711L")), ("_MSVC_LANG", Some("201402L"))];

#[rustfmt::skip]
static RELEASES: &[Release] = &[
    Release {
        toolset: 100, tools_major: 10, compiler_major: 16, minor: (0, 9),
        macros: &[("_MSC_VER", Some("1600")), ("_MSC_FULL_VER", Some("160040219")), ("_ATL_VER", Some("0x0A00"))],
    },
    Release {
        toolset: 110, tools_major: 11, compiler_major: 17, minor: (0, 9),
        macros: &[("_MSC_VER", Some("1700")), ("_MSC_FULL_VER", Some("1700610301")), ("_ATL_VER", Some("0x0B00"))],
    },
    Release {
        toolset: 120, tools_major: 12, compiler_major: 18, minor: (0, 9),
        macros: &[("_MSC_VER", Some("1800")), ("_MSC_FULL_VER", Some("180031101")), ("_ATL_VER", Some("0x0C00"))],
    },
    Release {
        toolset: 140, tools_major: 14, compiler_major: 19, minor: (0, 9),
        macros: &[("_MSC_VER", Some("1900")), ("_MSC_FULL_VER", Some("190024215")), ("_ATL_VER", Some("0x0E00"))],
    },
    Release {
        toolset: 141, tools_major: 14, compiler_major: 19, minor: (10, 19),
        macros: &[
            ("_MSC_VER", Some("1910")), ("_MSC_FULL_VER", Some("191024629")), ("_ATL_VER", Some("0x0E00")),
            CPP_DEFAULTS[0], CPP_DEFAULTS[1],
        ],
    },
    Release {
        toolset: 142, tools_major: 14, compiler_major: 19, minor: (20, 29),
        macros: &[
            ("_MSC_VER", Some("1920")), ("_MSC_FULL_VER", Some("192027508")), ("_ATL_VER", Some("0x0E00")),
            CPP_DEFAULTS[0], CPP_DEFAULTS[1],
        ],
    },
    Release {
        toolset: 143, tools_major: 14, compiler_major: 19, minor: (30, 49),
        macros: &[
            ("_MSC_VER", Some("1930")), ("_MSC_FULL_VER", Some("193030705")), ("_ATL_VER", Some("0x0E00")),
            CPP_DEFAULTS[0], CPP_DEFAULTS[1],
        ],
    },
];

/// The compiler only targets Windows.
const FAMILY: &[Macro] = &[("_WIN32", None)];

#[rustfmt::skip]
static ARCHITECTURES: &[(Architecture, &[Macro])] = &[
    (Architecture::X86, &[("_M_IX86", Some("600")), ("_M_IX86_FP", Some("2"))]),
    (Architecture::X64, &[("_WIN64", None), ("_M_X64", Some("100")), ("_M_AMD64", Some("100"))]),
    (Architecture::Arm, &[("_M_ARM", Some("7"))]),
];

/// Macros enabled when all the `when` features are present.
///
/// The rules are applied in order, a later rule overrides the value of an
/// earlier one.
struct FeatureRule {
    when: &'static [Feature],
    architecture: Option<Architecture>,
    macros: &'static [Macro],
}

impl FeatureRule {
    const fn new(when: &'static [Feature], macros: &'static [Macro]) -> Self {
        Self { when, architecture: None, macros }
    }

    const fn only_on(when: &'static [Feature], architecture: Architecture, macros: &'static [Macro]) -> Self {
        Self { when, architecture: Some(architecture), macros }
    }

    fn matches(&self, profile: &ToolsetProfile) -> bool {
        self.architecture.is_none_or(|architecture| architecture == profile.architecture)
            && self.when.iter().all(|feature| profile.features.contains(feature))
    }
}

#[rustfmt::skip]
static FEATURES: &[FeatureRule] = &[
    FeatureRule::new(&[Feature::OpenMp], &[("_OPENMP", Some("200203"))]),
    FeatureRule::new(&[Feature::WinRt], &[("__cplusplus_winrt", Some("201009"))]),
    FeatureRule::new(&[Feature::Clr], &[("__cplusplus_cli", Some("200406")), ("_MANAGED", Some("1")), ("_M_CEE", Some("001"))]),
    FeatureRule::new(&[Feature::ClrPure], &[("_M_CEE_PURE", Some("001"))]),
    FeatureRule::new(&[Feature::ClrSafe], &[("_M_CEE_SAFE", Some("001"))]),
    FeatureRule::new(&[Feature::Exceptions], &[("_CPPUNWIND", None)]),
    FeatureRule::new(&[Feature::Rtti], &[("_CPPRTTI", None)]),
    FeatureRule::new(&[Feature::MultithreadedRuntime], &[("_MT", None)]),
    FeatureRule::new(&[Feature::DynamicRuntime], &[("_DLL", None)]),
    FeatureRule::new(&[Feature::DebugRuntime], &[("_DEBUG", None)]),
    FeatureRule::new(&[Feature::NoDefaultLib], &[("_VC_NODEFAULTLIB", None)]),
    FeatureRule::new(&[Feature::NativeWcharT], &[("_WCHAR_T_DEFINED", Some("1")), ("_NATIVE_WCHAR_T_DEFINED", Some("1"))]),
    FeatureRule::new(&[Feature::UnsignedChar], &[("_CHAR_UNSIGNED", Some("1"))]),
    FeatureRule::new(&[Feature::Wp64], &[("_Wp64", None)]),
    FeatureRule::new(&[Feature::RuntimeChecks], &[("__MSVC_RUNTIME_CHECKS", None)]),
    FeatureRule::new(&[Feature::Avx], &[("__AVX__", Some("1"))]),
    FeatureRule::new(&[Feature::Avx2], &[("__AVX__", Some("1")), ("__AVX2__", Some("1"))]),
    FeatureRule::new(&[Feature::Avx512], &[
        ("__AVX__", Some("1")), ("__AVX2__", Some("1")), ("__AVX512F__", Some("1")), ("__AVX512CD__", Some("1")),
        ("__AVX512BW__", Some("1")), ("__AVX512DQ__", Some("1")), ("__AVX512VL__", Some("1")),
    ]),
    FeatureRule::new(&[Feature::ArmFp], &[("_M_ARM_FP", None)]),
    FeatureRule::only_on(&[Feature::FpIa32], Architecture::X86, &[("_M_IX86_FP", Some("0"))]),
    FeatureRule::only_on(&[Feature::FpSse], Architecture::X86, &[("_M_IX86_FP", Some("1"))]),
    FeatureRule::new(&[Feature::Cpp14], &[("_MSVC_LANG", Some("201402L"))]),
    FeatureRule::new(&[Feature::Cpp17], &[("_MSVC_LANG", Some("201703L"))]),
    FeatureRule::new(&[Feature::Cpp20], &[("_MSVC_LANG", Some("202002L"))]),
    FeatureRule::new(&[Feature::CppLatest], &[("_MSVC_LANG", Some("202004L"))]),
    FeatureRule::new(&[Feature::ConformantCplusplus], &[("__cplusplus", Some("201402L"))]),
    FeatureRule::new(&[Feature::ConformantCplusplus, Feature::Cpp17], &[("__cplusplus", Some("201703L"))]),
    FeatureRule::new(&[Feature::ConformantCplusplus, Feature::Cpp20], &[("__cplusplus", Some("202002L"))]),
    FeatureRule::new(&[Feature::ConformantCplusplus, Feature::CppLatest], &[("__cplusplus", Some("202004L"))]),
];

pub(super) fn release_by_toolset(toolset: u16) -> Option<&'static Release> {
    RELEASES.iter().find(|release| release.toolset == toolset)
}

pub(super) fn release_by_tools_version(major: u16, minor: u16) -> Option<&'static Release> {
    RELEASES
        .iter()
        .find(|release| release.tools_major == major && (release.minor.0..=release.minor.1).contains(&minor))
}

pub(super) fn release_by_compiler_version(major: u16, minor: u16) -> Option<&'static Release> {
    RELEASES
        .iter()
        .find(|release| release.compiler_major == major && (release.minor.0..=release.minor.1).contains(&minor))
}

pub(super) fn resolve_into(profile: &ToolsetProfile, defines: &mut Defines) {
    apply(defines, FAMILY);

    if let Some(release) = profile.version.and_then(|version| release_by_toolset(version.number())) {
        apply(defines, release.macros);
    }

    if let Some((_, macros)) = ARCHITECTURES.iter().find(|(architecture, _)| *architecture == profile.architecture) {
        apply(defines, macros);
    }

    for rule in FEATURES.iter().filter(|rule| rule.matches(profile)) {
        apply(defines, rule.macros);
    }
}
