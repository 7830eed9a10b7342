use std::path::PathBuf;

use thiserror::Error;

/// The core error taxonomy. CLI code converts these into `anyhow::Error`
/// at the command boundary; library code never panics on malformed
/// repository state.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("not a git repository (or any parent up to mount point {at})")]
    NoRepository { at: PathBuf },

    #[error("unsupported repositoryformatversion {found} (only 0 is supported)")]
    UnsupportedFormat { found: i64 },

    #[error("malformed object {oid}: {reason}")]
    MalformedObject { oid: String, reason: String },

    #[error("unknown object kind '{0}'")]
    UnknownKind(String),

    #[error("no such reference or object: {0}")]
    NoSuchRef(String),

    #[error("ambiguous reference {name}: candidates {candidates:?}")]
    AmbiguousRef { name: String, candidates: Vec<String> },

    #[error("malformed index: {0}")]
    MalformedIndex(String),

    #[error("{0}")]
    UsageError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GitError>;
