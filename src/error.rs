//! Library error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::call::CallError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Call(#[from] CallError),

    /// The normalized call has no `repo` entry to intercept.
    #[error("call has no `repo` argument")]
    MissingRepo,

    #[error("failed to create temporary directory")]
    TempDir(#[source] io::Error),

    #[error("failed to clone `{url}`")]
    Clone {
        url: String,
        #[source]
        source: git2::Error,
    },

    #[error("failed to open repository at `{path}`")]
    Open {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("failed to push tags to `{remote}`")]
    PushTags {
        remote: String,
        #[source]
        source: git2::Error,
    },

    #[error("failed to remove temporary directory `{path}`")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Annotate filesystem errors that legacy Windows runtimes are known to raise
/// when creating or tearing down a just-used checkout. The error kind and
/// original text are preserved; the message gains a remediation hint. Every
/// other error passes through untouched.
pub(crate) fn hint_legacy_platform(err: io::Error) -> io::Error {
    match err.kind() {
        io::ErrorKind::NotADirectory | io::ErrorKind::PermissionDenied => io::Error::new(
            err.kind(),
            format!("{err}; legacy Windows runtimes mishandle temporary checkout removal, upgrading the runtime fixes it"),
        ),
        _ => err,
    }
}
