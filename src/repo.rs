//! Repository arguments and remote-URL classification.

use std::fmt;
use std::path::Path;

use git2::Repository;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Matches the remote URL forms git accepts: scheme-qualified URLs (`https`,
/// `http`, `ssh`, `git`, `file`) and scp-like `git@host:path` remotes. A
/// trailing `.git` (and a trailing `/`) is equivalent to its absence.
static REMOTE_GIT_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:https?|ssh|git|file)://|git@[\w.-]+:)[\w.@:/~+-]+$").expect("valid regex")
});

/// Classify a string repository reference.
///
/// Returns `true` for remote git URLs; everything else, filesystem paths
/// included, is treated as local. Never fails.
pub fn is_remote_url(repo: &str) -> bool {
    if REMOTE_GIT_URL.is_match(repo) {
        debug!("{repo} recognized as a remote git repository");
        true
    } else {
        debug!("{repo} not recognized as a remote git repository");
        false
    }
}

/// Seam between the wrapper and the caller's argument values.
///
/// Callers usually carry `repo` inside their own argument-value type; this
/// trait is how the wrapper reads the repository spec out of such a value and
/// rebuilds it once a remote has been swapped for a local checkout.
pub trait RepoParam: Sized {
    /// The string spec, if this value carries one. Already-open handles and
    /// non-repository values return `None`.
    fn repo_spec(&self) -> Option<&str>;

    /// Build the value pointing at a local checkout.
    fn local(path: &Path) -> Self;
}

/// A repository argument: an already-open handle, or a string naming a path
/// or remote URL.
pub enum RepoArg {
    /// An open repository handle. Always treated as local.
    Handle(Repository),
    /// A filesystem path or remote URL.
    Spec(String),
}

impl RepoParam for RepoArg {
    fn repo_spec(&self) -> Option<&str> {
        match self {
            RepoArg::Spec(spec) => Some(spec),
            RepoArg::Handle(_) => None,
        }
    }

    fn local(path: &Path) -> Self {
        RepoArg::Spec(path.display().to_string())
    }
}

impl From<String> for RepoArg {
    fn from(spec: String) -> Self {
        RepoArg::Spec(spec)
    }
}

impl From<&str> for RepoArg {
    fn from(spec: &str) -> Self {
        RepoArg::Spec(spec.to_owned())
    }
}

impl From<Repository> for RepoArg {
    fn from(handle: Repository) -> Self {
        RepoArg::Handle(handle)
    }
}

// git2::Repository has no Debug impl; show its path instead.
impl fmt::Debug for RepoArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoArg::Handle(handle) => f.debug_tuple("Handle").field(&handle.path()).finish(),
            RepoArg::Spec(spec) => f.debug_tuple("Spec").field(spec).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_common_remote_forms() {
        assert!(is_remote_url("https://github.com/org/repo.git"));
        assert!(is_remote_url("https://github.com/org/repo"));
        assert!(is_remote_url("https://github.com/org/repo/"));
        assert!(is_remote_url("http://host.example/org/repo"));
        assert!(is_remote_url("ssh://git@github.com/org/repo.git"));
        assert!(is_remote_url("git://host.example/repo"));
        assert!(is_remote_url("git@github.com:org/repo.git"));
        assert!(is_remote_url("git@github.com:org/repo"));
        assert!(is_remote_url("file:///srv/git/project.git"));
    }

    #[test]
    fn rejects_local_references() {
        assert!(!is_remote_url("/local/path"));
        assert!(!is_remote_url("local/path"));
        assert!(!is_remote_url("."));
        assert!(!is_remote_url("meaningless_string"));
        assert!(!is_remote_url(""));
        assert!(!is_remote_url(r"C:\repos\project"));
    }

    #[test]
    fn rejects_degenerate_remote_prefixes() {
        assert!(!is_remote_url("https://"));
        assert!(!is_remote_url("git@"));
        assert!(!is_remote_url("git@host.example:"));
    }

    #[test]
    fn spec_values_expose_their_string() {
        let arg = RepoArg::from("https://github.com/org/repo");
        assert_eq!(arg.repo_spec(), Some("https://github.com/org/repo"));
    }

    #[test]
    fn local_builds_a_path_spec() {
        let arg = RepoArg::local(Path::new("/tmp/checkout"));
        assert_eq!(arg.repo_spec(), Some("/tmp/checkout"));
    }
}
