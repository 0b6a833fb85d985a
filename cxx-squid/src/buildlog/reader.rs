// SPDX-License-Identifier: GPL-3.0-or-later

use encoding_rs::Encoding;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The character encoding of build log files.
///
/// Accepts the WHATWG encoding labels (`UTF-8`, `UTF8`, `windows-1252`,
/// `ISO-8859-1`, `UTF-16LE`...), compared without regard to case.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Charset(&'static Encoding);

impl Charset {
    pub fn from_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.trim().as_bytes()).map(Self)
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self(encoding_rs::UTF_8)
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Failed to read build log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads the whole log file and decodes it.
///
/// A byte order mark overrides the given charset. Malformed sequences are
/// replaced, and reported as a warning.
pub fn read_log(path: &Path, charset: Charset) -> Result<String, ReadError> {
    let bytes = std::fs::read(path).map_err(|source| ReadError::Io { path: path.to_path_buf(), source })?;

    let (text, used, had_errors) = charset.0.decode(&bytes);
    if had_errors {
        log::warn!("Build log {} is not valid {}, malformed sequences were replaced", path.display(), used.name());
    }
    Ok(text.into_owned())
}
