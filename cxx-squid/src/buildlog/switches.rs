// SPDX-License-Identifier: GPL-3.0-or-later

//! Compiler switch pattern matching.
//!
//! This module separates HOW a switch consumes the command line (the pattern)
//! from WHAT the switch means for the preprocessor (the kind). Two switch
//! dialects are supported: the MSVC one (`/I`, `/D`, also written with `-`)
//! and the GCC one (`-I`, `-D`, `-isystem`), the latter being used for
//! compilation database entries.

use crate::catalog::Feature;
use crate::settings::{Defines, MacroDefinition};
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

/// Describes HOW a switch consumes arguments from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchPattern {
    /// Match the switch exactly: "/GR"
    Exactly(&'static str),
    /// Match exactly with 1 required argument, glued or separate: "/Iinc", "/I inc"
    GluedOrSep(&'static str),
    /// Match as prefix, the rest of the token is the argument: "/EHsc", "/std:c++17"
    Prefix(&'static str),
}

impl SwitchPattern {
    pub fn switch(&self) -> &'static str {
        match self {
            SwitchPattern::Exactly(switch) => switch,
            SwitchPattern::GluedOrSep(switch) => switch,
            SwitchPattern::Prefix(switch) => switch,
        }
    }
}

/// Describes WHAT a switch means for the preprocessor environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchKind {
    Include,
    Define,
    Undefine,
    Source,
    /// `/EH` followed by the exception model letters.
    ExceptionModel,
    /// `/arch:` followed by the instruction set name.
    InstructionSet,
    /// `/std:` followed by the language standard name.
    LanguageStandard,
    Enables(&'static [Feature]),
    Disables(&'static [Feature]),
    /// Everything after this switch is passed to the linker.
    EndOfOptions,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct SwitchRule {
    pub pattern: SwitchPattern,
    pub kind: SwitchKind,
}

impl SwitchRule {
    pub const fn new(pattern: SwitchPattern, kind: SwitchKind) -> Self {
        Self { pattern, kind }
    }
}

/// Result of matching a switch against the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchMatch {
    pub kind: SwitchKind,
    /// The argument of the switch, if the pattern takes one.
    pub argument: Option<String>,
    /// How many tokens the switch took from the command line.
    pub consumed: usize,
}

/// The command line syntax conventions of a compiler family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Switches start with `/` or `-`, they are matched in the `/` form.
    Msvc,
    /// Switches start with `-`.
    Gcc,
}

/// What the switches of one compiler invocation say about the preprocessor.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Invocation {
    pub sources: Vec<String>,
    pub include_directories: Vec<String>,
    /// Explicit definitions and removals, in command line order.
    pub macros: Vec<MacroSwitch>,
    pub features: BTreeSet<Feature>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MacroSwitch {
    Define(MacroDefinition),
    Undefine(String),
}

impl Invocation {
    /// Applies the explicit definitions in order, then the removals.
    ///
    /// A removal also takes away a macro the compiler would define itself.
    pub fn apply_macros(&self, defines: &mut Defines) {
        for switch in &self.macros {
            if let MacroSwitch::Define(define) = switch {
                defines.insert(define.clone());
            }
        }
        for switch in &self.macros {
            if let MacroSwitch::Undefine(name) = switch {
                defines.remove(name);
            }
        }
    }
}

/// Matches the switches of a compiler dialect.
pub struct SwitchAnalyzer {
    /// All rules, sorted with the longer switches first.
    rules: &'static [SwitchRule],
    dialect: Dialect,
}

impl SwitchAnalyzer {
    pub fn msvc() -> Self {
        Self { rules: &MSVC_SWITCHES, dialect: Dialect::Msvc }
    }

    pub fn gcc() -> Self {
        Self { rules: &GCC_SWITCHES, dialect: Dialect::Gcc }
    }

    /// Try to match a switch against the remaining command line arguments.
    pub fn match_switch(&self, args: &[String]) -> Option<SwitchMatch> {
        let current = self.canonical(args.first()?)?;

        for rule in self.rules {
            let switch = rule.pattern.switch();
            let matched = match rule.pattern {
                SwitchPattern::Exactly(_) if current == switch => Some((None, 1)),
                SwitchPattern::GluedOrSep(_) if current == switch => args.get(1).map(|next| (Some(next.clone()), 2)),
                SwitchPattern::GluedOrSep(_) | SwitchPattern::Prefix(_)
                    if current.len() > switch.len() && current.starts_with(switch) =>
                {
                    Some((Some(current[switch.len()..].to_string()), 1))
                }
                _ => None,
            };
            if let Some((argument, consumed)) = matched {
                return Some(SwitchMatch { kind: rule.kind, argument, consumed });
            }
        }
        None
    }

    /// Walks the arguments (without the compiler executable) and collects the
    /// switches relevant for the preprocessor.
    pub fn analyze(&self, args: &[String]) -> Invocation {
        let mut invocation = Invocation::default();
        let mut idx = 0;
        while idx < args.len() {
            let remaining = &args[idx..];
            let token = &remaining[0];

            if token.starts_with('@') {
                log::debug!("Response file is not followed: {token}");
                idx += 1;
                continue;
            }

            let Some(matched) = self.match_switch(remaining) else {
                if self.is_source(token) {
                    invocation.sources.push(token.clone());
                }
                idx += 1;
                continue;
            };
            idx += matched.consumed;

            if matched.kind == SwitchKind::EndOfOptions {
                break;
            }
            apply(&mut invocation, matched);
        }
        invocation
    }

    /// The switch in the form the rules are written in, `None` for non-switch tokens.
    fn canonical<'a>(&self, token: &'a str) -> Option<std::borrow::Cow<'a, str>> {
        match self.dialect {
            Dialect::Msvc if token.len() > 1 && token.starts_with('-') => Some(format!("/{}", &token[1..]).into()),
            Dialect::Msvc if token.len() > 1 && token.starts_with('/') => Some(token.into()),
            Dialect::Gcc if token.len() > 1 && token.starts_with('-') => Some(token.into()),
            _ => None,
        }
    }

    fn is_source(&self, token: &str) -> bool {
        match self.dialect {
            // An unknown `/` token is only a source when it is a Unix path.
            Dialect::Msvc if token.starts_with('/') => token[1..].contains('/') && looks_like_a_source_file(token),
            _ => !token.starts_with('-') && looks_like_a_source_file(token),
        }
    }
}

fn apply(invocation: &mut Invocation, matched: SwitchMatch) {
    let argument = matched.argument.unwrap_or_default();
    match matched.kind {
        SwitchKind::Include => invocation.include_directories.push(argument),
        SwitchKind::Source => invocation.sources.push(argument),
        SwitchKind::Define => match argument.parse::<MacroDefinition>() {
            Ok(define) => invocation.macros.push(MacroSwitch::Define(define)),
            Err(error) => log::warn!("Ignoring definition: {error}"),
        },
        SwitchKind::Undefine => invocation.macros.push(MacroSwitch::Undefine(argument.trim().to_string())),
        SwitchKind::ExceptionModel => match exception_model(&argument) {
            Some(true) => {
                invocation.features.insert(Feature::Exceptions);
            }
            Some(false) => {
                invocation.features.remove(&Feature::Exceptions);
            }
            None => {}
        },
        SwitchKind::InstructionSet => {
            invocation.features.retain(|feature| !INSTRUCTION_SETS.contains(feature));
            match instruction_set(&argument) {
                Some(feature) => {
                    invocation.features.insert(feature);
                }
                None => log::debug!("Instruction set without predefined macros: {argument}"),
            }
        }
        SwitchKind::LanguageStandard => {
            invocation.features.retain(|feature| !feature.is_language_standard());
            if let Some(feature) = language_standard(&argument) {
                invocation.features.insert(feature);
            }
        }
        SwitchKind::Enables(features) => invocation.features.extend(features.iter().copied()),
        SwitchKind::Disables(features) => invocation.features.retain(|feature| !features.contains(feature)),
        SwitchKind::EndOfOptions | SwitchKind::Ignored => {}
    }
}

/// Interprets the letters of the `/EH` switch.
///
/// Returns whether C++ exceptions are enabled, `None` when the letters do
/// not say anything about it (like `/EHc` alone).
fn exception_model(letters: &str) -> Option<bool> {
    let mut synchronous = None;
    let mut asynchronous = None;
    let mut chars = letters.chars().peekable();
    while let Some(letter) = chars.next() {
        let enabled = chars.next_if_eq(&'-').is_none();
        match letter {
            's' => synchronous = Some(enabled),
            'a' => asynchronous = Some(enabled),
            _ => {}
        }
    }
    match (synchronous, asynchronous) {
        (None, None) => None,
        (s, a) => Some(s.unwrap_or(false) || a.unwrap_or(false)),
    }
}

const INSTRUCTION_SETS: [Feature; 6] =
    [Feature::FpIa32, Feature::FpSse, Feature::Avx, Feature::Avx2, Feature::Avx512, Feature::ArmFp];

fn instruction_set(name: &str) -> Option<Feature> {
    match name {
        "IA32" => Some(Feature::FpIa32),
        "SSE" => Some(Feature::FpSse),
        "AVX" => Some(Feature::Avx),
        "AVX2" => Some(Feature::Avx2),
        "AVX512" => Some(Feature::Avx512),
        "ARMv7VE" | "VFPv4" => Some(Feature::ArmFp),
        _ => None,
    }
}

fn language_standard(name: &str) -> Option<Feature> {
    match name {
        "c++14" => Some(Feature::Cpp14),
        "c++17" => Some(Feature::Cpp17),
        "c++20" => Some(Feature::Cpp20),
        "c++latest" => Some(Feature::CppLatest),
        _ => None,
    }
}

/// Splits a command line the way the Windows C runtime does it.
///
/// White space separates arguments outside of double quotes. Backslashes
/// are literal, unless they precede a double quote: then each pair is one
/// backslash, and an odd one escapes the quote.
pub fn split_command_line(text: &str) -> Vec<String> {
    let mut arguments = Vec::new();
    let mut current = String::new();
    let mut in_argument = false;
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let mut backslashes = 1;
                while chars.next_if_eq(&'\\').is_some() {
                    backslashes += 1;
                }
                if chars.peek() == Some(&'"') {
                    current.extend(std::iter::repeat_n('\\', backslashes / 2));
                    if backslashes % 2 == 1 {
                        chars.next();
                        current.push('"');
                    }
                } else {
                    current.extend(std::iter::repeat_n('\\', backslashes));
                }
                in_argument = true;
            }
            '"' => {
                quoted = !quoted;
                in_argument = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_argument {
                    arguments.push(std::mem::take(&mut current));
                    in_argument = false;
                }
            }
            c => {
                current.push(c);
                in_argument = true;
            }
        }
    }
    if in_argument {
        arguments.push(current);
    }
    arguments
}

pub fn looks_like_a_source_file(argument: &str) -> bool {
    if let Some((_, extension)) = argument.rsplit_once('.') {
        return SOURCE_EXTENSIONS.contains(extension);
    }
    false
}

#[rustfmt::skip]
static SOURCE_EXTENSIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        // header files
        "h", "hh", "H", "hp", "hxx", "hpp", "HPP", "h++", "tcc",
        // C
        "c", "C",
        // C++
        "cc", "CC", "c++", "C++", "cxx", "cpp", "CPP", "cp",
        // C++/CX and C++/CLI sources compiled by cl.exe
        "ixx", "cppm",
    ])
});

fn sorted(mut rules: Vec<SwitchRule>) -> Vec<SwitchRule> {
    // Longer switches are tried first: "/MDd" before "/MD", "/clr:pure" before "/clr".
    rules.sort_by(|a, b| b.pattern.switch().len().cmp(&a.pattern.switch().len()));
    rules
}

/// MSVC switch definitions.
///
/// https://learn.microsoft.com/en-us/cpp/build/reference/compiler-options-listed-alphabetically
#[rustfmt::skip]
pub static MSVC_SWITCHES: LazyLock<Vec<SwitchRule>> = LazyLock::new(|| {
    use SwitchKind::*;
    use SwitchPattern::*;
    sorted(vec![
        // Preprocessor
        SwitchRule::new(GluedOrSep("/I"), Include),
        SwitchRule::new(GluedOrSep("/external:I"), Include),
        SwitchRule::new(GluedOrSep("/D"), Define),
        SwitchRule::new(GluedOrSep("/U"), Undefine),
        SwitchRule::new(GluedOrSep("/FI"), Ignored),
        SwitchRule::new(GluedOrSep("/AI"), Ignored),
        SwitchRule::new(GluedOrSep("/FU"), Ignored),
        // Sources with an explicit language
        SwitchRule::new(GluedOrSep("/Tp"), Source),
        SwitchRule::new(GluedOrSep("/Tc"), Source),
        // Language
        SwitchRule::new(Prefix("/EH"), ExceptionModel),
        SwitchRule::new(Exactly("/GX"), Enables(&[Feature::Exceptions])),
        SwitchRule::new(Exactly("/GX-"), Disables(&[Feature::Exceptions])),
        SwitchRule::new(Exactly("/GR"), Enables(&[Feature::Rtti])),
        SwitchRule::new(Exactly("/GR-"), Disables(&[Feature::Rtti])),
        SwitchRule::new(Exactly("/openmp"), Enables(&[Feature::OpenMp])),
        SwitchRule::new(Prefix("/openmp:"), Enables(&[Feature::OpenMp])),
        SwitchRule::new(Exactly("/ZW"), Enables(&[Feature::WinRt])),
        SwitchRule::new(Prefix("/ZW:"), Enables(&[Feature::WinRt])),
        SwitchRule::new(Exactly("/clr"), Enables(&[Feature::Clr])),
        SwitchRule::new(Exactly("/clr:pure"), Enables(&[Feature::Clr, Feature::ClrPure])),
        SwitchRule::new(Exactly("/clr:safe"), Enables(&[Feature::Clr, Feature::ClrSafe])),
        SwitchRule::new(Prefix("/clr:"), Enables(&[Feature::Clr])),
        SwitchRule::new(Prefix("/std:"), LanguageStandard),
        SwitchRule::new(Exactly("/Zc:__cplusplus"), Enables(&[Feature::ConformantCplusplus])),
        SwitchRule::new(Exactly("/Zc:__cplusplus-"), Disables(&[Feature::ConformantCplusplus])),
        SwitchRule::new(Exactly("/Zc:wchar_t"), Enables(&[Feature::NativeWcharT])),
        SwitchRule::new(Exactly("/Zc:wchar_t-"), Disables(&[Feature::NativeWcharT])),
        SwitchRule::new(Exactly("/J"), Enables(&[Feature::UnsignedChar])),
        // Runtime library
        SwitchRule::new(Exactly("/MT"), Enables(&[Feature::MultithreadedRuntime])),
        SwitchRule::new(Exactly("/MTd"), Enables(&[Feature::MultithreadedRuntime, Feature::DebugRuntime])),
        SwitchRule::new(Exactly("/MD"), Enables(&[Feature::MultithreadedRuntime, Feature::DynamicRuntime])),
        SwitchRule::new(Exactly("/MDd"), Enables(&[Feature::MultithreadedRuntime, Feature::DynamicRuntime, Feature::DebugRuntime])),
        SwitchRule::new(Exactly("/LD"), Enables(&[Feature::MultithreadedRuntime])),
        SwitchRule::new(Exactly("/LDd"), Enables(&[Feature::MultithreadedRuntime, Feature::DebugRuntime])),
        SwitchRule::new(Exactly("/Zl"), Enables(&[Feature::NoDefaultLib])),
        // Code generation
        SwitchRule::new(Prefix("/arch:"), InstructionSet),
        SwitchRule::new(Exactly("/Wp64"), Enables(&[Feature::Wp64])),
        SwitchRule::new(Prefix("/RTC"), Enables(&[Feature::RuntimeChecks])),
        // Linker
        SwitchRule::new(Exactly("/link"), EndOfOptions),
    ])
});

/// GCC and Clang switch definitions relevant for the preprocessor.
///
/// https://gcc.gnu.org/onlinedocs/gcc/Preprocessor-Options.html
#[rustfmt::skip]
pub static GCC_SWITCHES: LazyLock<Vec<SwitchRule>> = LazyLock::new(|| {
    use SwitchKind::*;
    use SwitchPattern::*;
    sorted(vec![
        SwitchRule::new(GluedOrSep("-I"), Include),
        SwitchRule::new(GluedOrSep("-isystem"), Include),
        SwitchRule::new(GluedOrSep("-iquote"), Include),
        SwitchRule::new(GluedOrSep("-idirafter"), Include),
        SwitchRule::new(GluedOrSep("-D"), Define),
        SwitchRule::new(GluedOrSep("-U"), Undefine),
        // Switches with a separate argument, which must not be taken for a source.
        SwitchRule::new(GluedOrSep("-include"), Ignored),
        SwitchRule::new(GluedOrSep("-imacros"), Ignored),
        SwitchRule::new(GluedOrSep("-o"), Ignored),
        SwitchRule::new(GluedOrSep("-x"), Ignored),
        SwitchRule::new(GluedOrSep("-MF"), Ignored),
        SwitchRule::new(GluedOrSep("-MT"), Ignored),
        SwitchRule::new(GluedOrSep("-MQ"), Ignored),
        SwitchRule::new(Exactly("-isysroot"), Ignored),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    fn args(text: &str) -> Vec<String> {
        split_command_line(text)
    }

    #[test]
    fn test_split_command_line() {
        assert_eq!(args("/c /nologo  main.cpp"), vec!["/c", "/nologo", "main.cpp"]);
        assert_eq!(
            args(r#"/I"C:\Program Files\include" /D "NAME=VALUE""#),
            vec![r"/IC:\Program Files\include", "/D", "NAME=VALUE"]
        );
        assert_eq!(args(r#"/Fo"Debug\\" /Fd"Debug\vc141.pdb""#), vec![r"/FoDebug\", r"/FdDebug\vc141.pdb"]);
        assert_eq!(args(r#"/DGREETING=\"hello\""#), vec![r#"/DGREETING="hello""#]);
        assert_eq!(args(r"..\src\a.cpp"), vec![r"..\src\a.cpp"]);
        assert_eq!(args(r#""""#), vec![""]);
        assert!(args("   ").is_empty());
    }

    #[test]
    fn test_glued_or_separate_matching() {
        let analyzer = SwitchAnalyzer::msvc();

        let glued = analyzer.match_switch(&args("/Iinclude")).unwrap();
        assert_eq!(glued, SwitchMatch { kind: SwitchKind::Include, argument: Some("include".into()), consumed: 1 });

        let separate = analyzer.match_switch(&args("/I include")).unwrap();
        assert_eq!(separate, SwitchMatch { kind: SwitchKind::Include, argument: Some("include".into()), consumed: 2 });

        let dashed = analyzer.match_switch(&args("-DNAME")).unwrap();
        assert_eq!(dashed.kind, SwitchKind::Define);
        assert_eq!(dashed.argument.as_deref(), Some("NAME"));

        assert!(analyzer.match_switch(&args("/I")).is_none());
    }

    #[test]
    fn test_longer_switches_win() {
        let analyzer = SwitchAnalyzer::msvc();

        let debug_dll = analyzer.match_switch(&args("/MDd")).unwrap();
        assert_eq!(
            debug_dll.kind,
            SwitchKind::Enables(&[Feature::MultithreadedRuntime, Feature::DynamicRuntime, Feature::DebugRuntime])
        );

        let pure = analyzer.match_switch(&args("/clr:pure")).unwrap();
        assert_eq!(pure.kind, SwitchKind::Enables(&[Feature::Clr, Feature::ClrPure]));

        let external = analyzer.match_switch(&args("/external:I third_party")).unwrap();
        assert_eq!(external.kind, SwitchKind::Include);
        assert_eq!(external.argument.as_deref(), Some("third_party"));
    }

    #[test]
    fn test_no_match() {
        let analyzer = SwitchAnalyzer::msvc();

        assert!(analyzer.match_switch(&args("/nologo")).is_none());
        assert!(analyzer.match_switch(&args("/MP")).is_none());
        assert!(analyzer.match_switch(&args("main.cpp")).is_none());
    }

    #[test]
    fn test_analyze_msvc_invocation() {
        let analyzer = SwitchAnalyzer::msvc();
        let invocation = analyzer.analyze(&args(
            r#"/c /I"inc" /Ishared /D WIN32 /D "_DEBUG" /DVERSION=2 /U WIN32 /EHsc /MDd /Zc:wchar_t /Zc:forScope /Yc"stdafx.h" /Fo"Debug\\" /Gd /TP stdafx.cpp main.cpp"#,
        ));

        assert_eq!(invocation.sources, vec!["stdafx.cpp", "main.cpp"]);
        assert_eq!(invocation.include_directories, vec!["inc", "shared"]);
        assert_eq!(
            invocation.macros,
            vec![
                MacroSwitch::Define(MacroDefinition::flag("WIN32")),
                MacroSwitch::Define(MacroDefinition::flag("_DEBUG")),
                MacroSwitch::Define(MacroDefinition::with_value("VERSION", "2")),
                MacroSwitch::Undefine("WIN32".into()),
            ]
        );
        assert_eq!(
            invocation.features,
            BTreeSet::from([
                Feature::Exceptions,
                Feature::MultithreadedRuntime,
                Feature::DebugRuntime,
                Feature::DynamicRuntime,
                Feature::NativeWcharT,
            ])
        );
    }

    #[test]
    fn test_apply_macros() {
        let analyzer = SwitchAnalyzer::msvc();
        let invocation = analyzer.analyze(&args("/UOLD /DNEW=2 /DOLD /DKEPT=1 /DKEPT=3 a.cpp"));

        let mut defines: Defines = [MacroDefinition::flag("OLD"), MacroDefinition::with_value("NEW", "1")]
            .into_iter()
            .collect();
        invocation.apply_macros(&mut defines);

        assert_eq!(defines.to_strings(), vec!["NEW 2", "KEPT 3"]);
    }

    #[test]
    fn test_exception_model() {
        assert_eq!(exception_model("sc"), Some(true));
        assert_eq!(exception_model("a"), Some(true));
        assert_eq!(exception_model("s-c-"), Some(false));
        assert_eq!(exception_model("c"), None);
        assert_eq!(exception_model("a-s"), Some(true));
    }

    #[test]
    fn test_last_switch_wins() {
        let analyzer = SwitchAnalyzer::msvc();

        let invocation = analyzer.analyze(&args("/EHsc /EHs- /arch:AVX /arch:AVX2 /std:c++14 /std:c++17 a.cpp"));
        assert_eq!(invocation.features, BTreeSet::from([Feature::Avx2, Feature::Cpp17]));

        let invocation = analyzer.analyze(&args("/Zc:wchar_t /Zc:wchar_t- /GR /GR- a.cpp"));
        assert!(invocation.features.is_empty());
    }

    #[test]
    fn test_linker_options_are_not_compiler_options() {
        let analyzer = SwitchAnalyzer::msvc();
        let invocation = analyzer.analyze(&args("/DAPP main.cpp /link /DEBUG /INCREMENTAL"));

        assert_eq!(invocation.macros, vec![MacroSwitch::Define(MacroDefinition::flag("APP"))]);
        assert_eq!(invocation.sources, vec!["main.cpp"]);
        assert!(invocation.include_directories.is_empty());
    }

    #[test]
    fn test_sources() {
        let analyzer = SwitchAnalyzer::msvc();
        let invocation =
            analyzer.analyze(&args("/Tpsrc\\code.inl /Tc legacy.x /Ycstdafx.h /home/user/unix.cpp @rsp.txt"));

        assert_eq!(invocation.sources, vec!["src\\code.inl", "legacy.x", "/home/user/unix.cpp"]);
    }

    #[test]
    fn test_analyze_gcc_invocation() {
        let analyzer = SwitchAnalyzer::gcc();
        let invocation = analyzer.analyze(&args(
            "-c -Iinclude -isystem /usr/local/include -DNDEBUG -D VERSION=3 -UVERSION -o main.o main.c",
        ));

        assert_eq!(invocation.sources, vec!["main.c"]);
        assert_eq!(invocation.include_directories, vec!["include", "/usr/local/include"]);
        assert_eq!(
            invocation.macros,
            vec![
                MacroSwitch::Define(MacroDefinition::flag("NDEBUG")),
                MacroSwitch::Define(MacroDefinition::with_value("VERSION", "3")),
                MacroSwitch::Undefine("VERSION".into()),
            ]
        );
        assert!(invocation.features.is_empty());
    }

    #[test]
    fn test_filenames() {
        assert!(looks_like_a_source_file("source.c"));
        assert!(looks_like_a_source_file("source.cpp"));
        assert!(looks_like_a_source_file("source.cxx"));
        assert!(looks_like_a_source_file("source.hpp"));

        assert!(!looks_like_a_source_file("cl.exe"));
        assert!(!looks_like_a_source_file("main.obj"));
        assert!(!looks_like_a_source_file("/nologo"));
    }
}
