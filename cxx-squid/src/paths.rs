// SPDX-License-Identifier: GPL-3.0-or-later

//! Lexical path handling for paths found in build logs.
//!
//! Build logs are usually written on Windows, while the analysis may run on
//! any host. Paths are never resolved against the file system: they are
//! joined and normalized textually, so the result does not depend on what
//! exists on the machine doing the analysis.

use std::path::{Component, Path, PathBuf};

/// Converts a path as written in a build log into a `PathBuf`.
///
/// Surrounding quotes are dropped. On non-Windows hosts the backslash
/// separators are turned into forward slashes, so the components are
/// recognized by `std::path`.
pub fn from_log(raw: &str) -> PathBuf {
    let trimmed = raw.trim().trim_matches('"');
    if cfg!(windows) {
        PathBuf::from(trimmed)
    } else {
        PathBuf::from(trimmed.replace('\\', "/"))
    }
}

/// Tells whether the path is absolute on the machine that wrote the log.
///
/// A drive letter prefix (`C:/...`) counts as absolute even on hosts where
/// `Path::is_absolute` would disagree.
pub fn is_absolute(path: &Path) -> bool {
    path.has_root() || has_drive_letter(path)
}

/// Compute the absolute path from the root directory if the path is relative.
pub fn absolute_to(root: &Path, path: &Path) -> PathBuf {
    if is_absolute(path) {
        normalize(path)
    } else {
        normalize(&root.join(path))
    }
}

/// Removes `.` components and folds `..` into the preceding component.
///
/// Leading `..` components of a relative path are kept, a `..` right after
/// the root (or a drive letter) is dropped.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match result.components().next_back() {
                Some(Component::Normal(_)) if !is_bare_drive(&result) => {
                    result.pop();
                }
                Some(Component::Normal(_)) | Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => result.push(Component::ParentDir),
            },
            other => result.push(other),
        }
    }
    if result.as_os_str().is_empty() {
        result.push(Component::CurDir);
    }
    result
}

fn has_drive_letter(path: &Path) -> bool {
    match path.components().next() {
        Some(Component::Prefix(_)) => true,
        Some(Component::Normal(first)) => {
            let bytes = first.as_encoded_bytes();
            bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
        }
        _ => false,
    }
}

fn is_bare_drive(path: &Path) -> bool {
    path.components().count() == 1 && has_drive_letter(path)
}
