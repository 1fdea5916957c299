//! Scoped temporary clones of remote repositories.

use std::io;
use std::path::{Path, PathBuf};

use git2::Repository;
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{hint_legacy_platform, Error};

/// Prefix for clone directories under the system temp dir, so stray leftovers
/// are attributable.
const TMP_PREFIX: &str = "repo-scope-";

/// A full clone of a remote repository in a uniquely-named temporary
/// directory.
///
/// The directory is removed when the value is dropped, on every exit path
/// including panic unwinding. Call [`ClonedRepo::close`] instead of relying
/// on drop to surface removal errors.
#[derive(Debug)]
pub struct ClonedRepo {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl ClonedRepo {
    /// Clone `url` into a fresh temporary directory.
    ///
    /// Clone failures surface the underlying git error and leave nothing
    /// behind on disk.
    pub fn clone(url: &str) -> Result<Self, Error> {
        Self::clone_with(url, tempfile::Builder::new().prefix(TMP_PREFIX).tempdir())
    }

    /// Like [`ClonedRepo::clone`], but the temporary directory is created
    /// under `parent` instead of the system temp dir.
    pub fn clone_in(url: &str, parent: &Path) -> Result<Self, Error> {
        Self::clone_with(url, tempfile::Builder::new().prefix(TMP_PREFIX).tempdir_in(parent))
    }

    fn clone_with(url: &str, dir: io::Result<TempDir>) -> Result<Self, Error> {
        let dir = dir.map_err(|err| Error::TempDir(hint_legacy_platform(err)))?;
        debug!("created temporary directory {}", dir.path().display());
        debug!("cloning {url} into {}", dir.path().display());
        Repository::clone(url, dir.path()).map_err(|source| Error::Clone {
            url: url.to_owned(),
            source,
        })?;
        Ok(Self {
            path: dir.path().to_path_buf(),
            dir: Some(dir),
        })
    }

    /// Path of the local checkout, valid for this value's lifetime.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Push all local tags in the clone to `remote`.
    pub fn push_tags(&self, remote: &str) -> Result<(), Error> {
        push_tags(&self.path, remote)
    }

    /// Remove the temporary directory, surfacing the error if removal fails.
    pub fn close(mut self) -> Result<(), Error> {
        match self.dir.take() {
            Some(dir) => {
                debug!("removing temporary directory {}", self.path.display());
                dir.close().map_err(|err| Error::Cleanup {
                    path: self.path.clone(),
                    source: hint_legacy_platform(err),
                })
            }
            None => Ok(()),
        }
    }
}

impl Drop for ClonedRepo {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            debug!("removing temporary directory {}", self.path.display());
            if let Err(err) = dir.close() {
                warn!("failed to remove temporary directory {}: {err}", self.path.display());
            }
        }
    }
}

/// Push every local tag in the repository at `path` to `remote`.
///
/// A repository with no tags is a no-op. Push failures surface the
/// underlying git error; there is no retry.
pub fn push_tags(path: &Path, remote: &str) -> Result<(), Error> {
    let repo = Repository::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let tags = repo.tag_names(None).map_err(|source| Error::PushTags {
        remote: remote.to_owned(),
        source,
    })?;
    let refspecs: Vec<String> = tags
        .iter()
        .flatten()
        .map(|tag| format!("refs/tags/{tag}:refs/tags/{tag}"))
        .collect();
    if refspecs.is_empty() {
        debug!("no tags to push from {}", path.display());
        return Ok(());
    }
    let mut target = repo.find_remote(remote).map_err(|source| Error::PushTags {
        remote: remote.to_owned(),
        source,
    })?;
    debug!("pushing {} tag(s) to {remote}", refspecs.len());
    let refs: Vec<&str> = refspecs.iter().map(String::as_str).collect();
    target.push(&refs, None).map_err(|source| Error::PushTags {
        remote: remote.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use git2::Signature;
    use tempfile::TempDir;

    /// Build a local repository with one commit to clone from.
    fn sample_repo() -> (TempDir, PathBuf) {
        let dir = TempDir::new().expect("temp dir");
        let repo = Repository::init(dir.path()).expect("init");
        let sig = Signature::now("tester", "tester@example.com").expect("signature");
        std::fs::write(dir.path().join("README.md"), "sample\n").expect("write file");
        let mut index = repo.index().expect("index");
        index.add_path(Path::new("README.md")).expect("add");
        index.write().expect("write index");
        let tree_id = index.write_tree().expect("write tree");
        let tree = repo.find_tree(tree_id).expect("find tree");
        repo.commit(Some("HEAD"), &sig, &sig, "initial commit", &tree, &[])
            .expect("commit");
        let path = dir.path().to_path_buf();
        (dir, path)
    }

    #[test]
    fn clone_yields_a_checkout_and_drop_removes_it() {
        let (_src, src_path) = sample_repo();
        let clone = ClonedRepo::clone(&src_path.display().to_string()).expect("clone");
        let clone_path = clone.path().to_path_buf();
        assert!(clone_path.join(".git").is_dir());
        assert!(clone_path.join(".git/HEAD").is_file());
        drop(clone);
        assert!(!clone_path.exists());
    }

    #[test]
    fn close_removes_the_checkout() {
        let (_src, src_path) = sample_repo();
        let clone = ClonedRepo::clone(&src_path.display().to_string()).expect("clone");
        let clone_path = clone.path().to_path_buf();
        clone.close().expect("close");
        assert!(!clone_path.exists());
    }

    #[test]
    fn failed_clone_leaves_no_directory_behind() {
        let parent = TempDir::new().expect("temp dir");
        let err = ClonedRepo::clone_in("file:///definitely/not/a/repository", parent.path())
            .expect_err("clone of a missing remote must fail");
        assert!(matches!(err, Error::Clone { .. }), "got: {err:?}");
        let leftovers: Vec<_> = std::fs::read_dir(parent.path())
            .expect("read dir")
            .collect();
        assert!(leftovers.is_empty(), "got: {leftovers:?}");
    }

    #[test]
    fn push_tags_without_tags_is_a_no_op() {
        let (_src, src_path) = sample_repo();
        push_tags(&src_path, "origin").expect("nothing to push");
    }

    #[test]
    fn push_tags_to_unknown_remote_fails() {
        let (_src, src_path) = sample_repo();
        let repo = Repository::open(&src_path).expect("open");
        let head = repo.head().expect("head").peel_to_commit().expect("commit");
        repo.tag_lightweight("v0.1.0", head.as_object(), false).expect("tag");
        let err = push_tags(&src_path, "origin").expect_err("no origin configured");
        assert!(matches!(err, Error::PushTags { .. }), "got: {err:?}");
    }

    #[test]
    fn push_tags_on_a_non_repository_fails_to_open() {
        let dir = TempDir::new().expect("temp dir");
        let err = push_tags(dir.path(), "origin").expect_err("not a repository");
        assert!(matches!(err, Error::Open { .. }), "got: {err:?}");
    }
}
