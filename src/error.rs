use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{Segment, Version};

/// Unified error type for bumpversion operations
#[derive(Error, Debug)]
pub enum BumpError {
    #[error("git not found: {0}")]
    NoBackend(String),

    #[error("not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("no such remote: {0}")]
    NoRemote(String),

    #[error(
        "tags differ on remote (local only: {}; remote only: {})",
        list_versions(.local_only),
        list_versions(.remote_only)
    )]
    TagsDiffer {
        local_only: Vec<Version>,
        remote_only: Vec<Version>,
    },

    #[error("{0}")]
    Usage(String),

    #[error("version component out of range: {0}")]
    VersionOutOfRange(String),

    #[error("cannot bump {segment} of {version}: component already at maximum")]
    BumpOverflow { version: Version, segment: Segment },

    #[error("Tag creation failed: {0}")]
    Tag(String),

    #[error("Push failed: {0}")]
    Push(String),

    #[error("git command failed: {0}")]
    Command(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in bumpversion
pub type Result<T> = std::result::Result<T, BumpError>;

fn list_versions(versions: &[Version]) -> String {
    if versions.is_empty() {
        return "none".to_string();
    }
    versions
        .iter()
        .map(Version::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl BumpError {
    /// Create a usage error (bad segment selection)
    pub fn usage(msg: impl Into<String>) -> Self {
        BumpError::Usage(msg.into())
    }

    /// Create a tag creation error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        BumpError::Tag(msg.into())
    }

    /// Create a push error with context
    pub fn push(msg: impl Into<String>) -> Self {
        BumpError::Push(msg.into())
    }

    /// Create a generic git invocation error with context
    pub fn command(msg: impl Into<String>) -> Self {
        BumpError::Command(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BumpError::Config(msg.into())
    }

    /// Whether the error was raised before any git interaction
    pub fn is_usage(&self) -> bool {
        matches!(self, BumpError::Usage(_))
    }
}
