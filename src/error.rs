use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LockfileError>;

/// Errors surfaced by the lockfile engine. Every variant maps to a stable code via [`LockfileError::code`].
#[derive(Debug, Error)]
pub enum LockfileError {
    #[error("No lockfile found")]
    LockfileNotFound,

    #[error("No yarn.lock found")]
    YarnLockfileNotFound,

    #[error("No package-lock.json or npm-shrinkwrap.json found")]
    NpmLockfileNotFound,

    #[error("Yarn.lock file was {kind}")]
    YarnLockfileParse { kind: String },

    #[error("Invalid npm lockfile at \"{}\": {message}", path.display())]
    NpmLockfileParse { path: PathBuf, message: String },

    #[error("The lockfile at \"{}\" is broken: {message}", path.display())]
    BrokenLockfile { path: PathBuf, message: String },

    #[error("Lockfile {} not compatible with current pacm", path.display())]
    LockfileBreakingChange { path: PathBuf },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize lockfile: {0}")]
    Serialize(String),
}

impl LockfileError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::LockfileNotFound => "LOCKFILE_NOT_FOUND",
            Self::YarnLockfileNotFound => "YARN_LOCKFILE_NOT_FOUND",
            Self::NpmLockfileNotFound => "NPM_LOCKFILE_NOT_FOUND",
            Self::YarnLockfileParse { .. } => "YARN_LOCKFILE_PARSE_FAILED",
            Self::NpmLockfileParse { .. } => "NPM_LOCKFILE_PARSE_FAILED",
            Self::BrokenLockfile { .. } => "BROKEN_LOCKFILE",
            Self::LockfileBreakingChange { .. } => "LOCKFILE_BREAKING_CHANGE",
            Self::Io { .. } => "IO",
            Self::Serialize(_) => "SERIALIZE",
        }
    }

    /// Offending file, when the error is tied to one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::BrokenLockfile { path, .. }
            | Self::LockfileBreakingChange { path }
            | Self::NpmLockfileParse { path, .. }
            | Self::Io { path, .. } => Some(path),
            _ => None,
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }

    pub(crate) fn broken(path: &Path, message: impl Into<String>) -> Self {
        Self::BrokenLockfile { path: path.to_path_buf(), message: message.into() }
    }
}

impl From<serde_yaml::Error> for LockfileError {
    fn from(e: serde_yaml::Error) -> Self { Self::Serialize(e.to_string()) }
}

impl From<serde_json::Error> for LockfileError {
    fn from(e: serde_json::Error) -> Self { Self::Serialize(e.to_string()) }
}
