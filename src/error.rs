//! Error types for directory selection.
//!
//! A malformed path is always a caller bug, so it is reported rather than
//! normalized away: an inconsistently spelled path breaks the ancestor checks
//! the selection set depends on.

use std::path::PathBuf;
use thiserror::Error;

/// Why a path was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPathReason {
    #[error("path is empty")]
    Empty,

    #[error("path is not absolute")]
    Relative,

    /// `..` cannot be resolved without asking the filesystem.
    #[error("path contains a '..' segment")]
    ParentSegment,

    /// Non-Unicode segments cannot be case-folded.
    #[error("path is not valid unicode")]
    NotUnicode,
}

/// A path that cannot be used as a selection key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid directory path '{}': {reason}", path.display())]
pub struct InvalidPathError {
    pub path: PathBuf,
    pub reason: InvalidPathReason,
}

impl InvalidPathError {
    pub fn new(path: impl Into<PathBuf>, reason: InvalidPathReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}
