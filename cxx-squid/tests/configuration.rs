// SPDX-License-Identifier: GPL-3.0-or-later

use cxx_squid::configuration::{ConfigurationError, SquidConfiguration};
use cxx_squid::paths;
use cxx_squid::settings::{CompilationUnitSettings, MacroDefinition};
use std::path::{Path, PathBuf};

const VISUAL_CPP: &str = "Visual C++";

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/logfile").join(name)
}

fn configuration_of(logs: &[&str]) -> SquidConfiguration {
    let logs: Vec<PathBuf> = logs.iter().map(|name| fixture(name)).collect();
    let mut configuration = SquidConfiguration::new();
    configuration.set_base_dir("/build");
    configuration
        .set_compilation_properties_with_build_log(&logs, VISUAL_CPP, "UTF8")
        .expect("valid arguments");
    configuration
}

#[test]
fn log_without_switches_gives_empty_configuration() {
    let configuration = configuration_of(&["no_invocation.txt"]);

    assert_eq!(configuration.include_directories().len(), 0);
    assert_eq!(configuration.defines().len(), 0);
    assert!(configuration.compilation_unit_source_files().is_empty());
}

#[test]
fn x86_invocation_gets_the_toolset_macros() {
    let configuration = configuration_of(&["msvc141_x86.txt"]);
    let source = paths::from_log(r"C:\src\sample\main.cpp");

    assert_eq!(configuration.compilation_unit_source_files().len(), 1);
    let defines = configuration.defines_for(&source).to_strings();
    for expected in [
        "_CPPUNWIND",
        "_M_IX86 600",
        "_M_IX86_FP 2",
        "_MSC_VER 1910",
        "_MSC_FULL_VER 191024629",
        "_ATL_VER 0x0E00",
        "_WIN32",
        "__LINE__ 1",
        "_INTEGRAL_MAX_BITS 64",
        "WIN32",
        "UNICODE",
    ] {
        assert!(defines.contains(&expected.to_string()), "missing '{expected}' in {defines:?}");
    }
    assert!(!defines.contains(&"_WIN64".to_string()));

    let directories = configuration.include_directories_for(&source);
    assert!(directories.contains(paths::from_log(r"C:\src\sample\include")));
}

#[test]
fn x64_invocation_has_no_x86_macros() {
    let configuration = configuration_of(&["msvc141_x64.txt"]);
    let defines = configuration.defines();

    assert!(defines.contains("_CPPUNWIND"));
    assert!(defines.contains("_WIN64"));
    assert!(defines.contains("_M_X64"));
    assert!(!defines.contains("_M_IX86"));
    assert!(!defines.contains("_M_IX86_FP"));
}

#[test]
fn parallel_projects_keep_their_own_context() {
    let configuration = configuration_of(&["parallel.txt"]);

    let files = configuration.compilation_unit_source_files();
    assert_eq!(files.len(), 3);

    let main = configuration.defines_for(paths::from_log(r"C:\src\app\main.cpp"));
    assert!(main.contains("APP"));
    assert!(main.contains("_M_X64"));
    assert_eq!(main.get("_MSC_VER"), Some(&MacroDefinition::with_value("_MSC_VER", "1910")));
    assert_eq!(main.get("_MSVC_LANG"), Some(&MacroDefinition::with_value("_MSVC_LANG", "201703L")));

    let lib = configuration.defines_for(paths::from_log(r"C:\src\lib\lib.cpp"));
    assert!(lib.contains("LIB"));
    assert!(!lib.contains("APP"));
    assert!(lib.contains("_M_IX86"));
    assert_eq!(lib.get("_MSC_VER"), Some(&MacroDefinition::with_value("_MSC_VER", "1920")));

    let lib_directories = configuration.include_directories_for(paths::from_log(r"C:\src\lib\lib.cpp"));
    assert!(lib_directories.contains(paths::from_log(r"C:\src\common")));
}

#[test]
fn include_directories_keep_their_order() {
    let configuration = configuration_of(&["include_order.txt"]);

    let directories: Vec<_> = configuration.include_directories().iter().cloned().collect();
    assert_eq!(directories, vec![PathBuf::from("/build/dir1"), PathBuf::from("/build/dir2")]);

    let defines = configuration.defines_for("/build/main.cpp");
    assert_eq!(defines.get("SECOND"), Some(&MacroDefinition::with_value("SECOND", "2")));
}

#[test]
fn defaults_are_kept_with_an_empty_log() {
    let mut configuration = SquidConfiguration::new();
    configuration.set_include_directories(["dir1", "dir2"]);
    configuration
        .set_compilation_properties_with_build_log(&[fixture("no_invocation.txt")], VISUAL_CPP, "UTF8")
        .expect("valid arguments");

    assert_eq!(configuration.include_directories().len(), 2);
}

#[test]
fn unreadable_log_is_skipped() {
    let logs = [fixture("does_not_exist.txt"), fixture("include_order.txt")];
    let mut configuration = SquidConfiguration::new();
    configuration.set_base_dir("/build");

    let result = configuration.set_compilation_properties_with_build_log(&logs, VISUAL_CPP, "UTF8");

    assert_eq!(result, Ok(()));
    assert_eq!(configuration.compilation_unit_source_files().len(), 1);
}

#[test]
fn invalid_arguments_are_rejected_before_reading() {
    let logs = [fixture("include_order.txt")];
    let mut configuration = SquidConfiguration::new();

    let result = configuration.set_compilation_properties_with_build_log(&logs, VISUAL_CPP, "EBCDIC-42");
    assert_eq!(result, Err(ConfigurationError::UnsupportedCharset { charset: "EBCDIC-42".into() }));

    let result = configuration.set_compilation_properties_with_build_log(&logs, "Turbo C", "UTF8");
    assert_eq!(result, Err(ConfigurationError::UnsupportedToolset { key: "Turbo C".into() }));

    assert!(configuration.compilation_unit_source_files().is_empty());
}

#[test]
fn direct_settings_are_counted_per_file() {
    let mut configuration = SquidConfiguration::new();
    for file in ["a.cpp", "b.cpp", "c.cpp"] {
        configuration.add_compilation_unit_settings(file, CompilationUnitSettings::default());
    }

    let files = configuration.compilation_unit_source_files();
    assert_eq!(files.len(), 3);
    for file in ["a.cpp", "b.cpp", "c.cpp"] {
        assert!(files.contains(Path::new(file)));
    }
}

#[test]
fn compilation_database_entries_are_installed() {
    let directory = tempfile::tempdir().unwrap();
    let database = directory.path().join("compile_commands.json");
    std::fs::write(
        &database,
        r#"[
            { "directory": "/work", "file": "main.c", "arguments": ["gcc", "-c", "-Iinc", "-DDEBUG=1", "main.c"] },
            { "directory": "/work", "file": "util.cpp", "command": "cl.exe /c /EHsc util.cpp" },
            { "directory": "/work", "file": "" }
        ]"#,
    )
    .unwrap();

    let mut configuration = SquidConfiguration::new();
    configuration.set_compilation_properties_with_compilation_database(&[database]);

    assert_eq!(configuration.compilation_unit_source_files().len(), 2);
    let main = configuration.compilation_unit_settings("/work/main.c").unwrap();
    assert!(main.include_directories.contains("/work/inc"));
    assert_eq!(main.defines.to_strings(), vec!["DEBUG 1"]);

    let util = configuration.defines_for("/work/util.cpp");
    assert!(util.contains("_CPPUNWIND"));
    assert!(util.contains("_WIN32"));
}
