//! Call-rewriting wrapper that substitutes temporary clones for remote repos.
//!
//! The decorator of the original tool becomes explicit composition here: a
//! [`RemoteClone`] value takes a callable plus configuration and yields a new
//! callable with the same calling convention, remote-awareness added.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::call::{CallNormalizer, NormalizedCall};
use crate::clone::ClonedRepo;
use crate::error::Error;
use crate::repo::{is_remote_url, RepoParam};

/// Name of the intercepted parameter.
pub const REPO_PARAM: &str = "repo";

/// Wrapper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloneOptions {
    /// Push all local tags from the clone back to its remote before the
    /// temporary directory is removed.
    pub push_tags: bool,
    /// Remote the tags are pushed to.
    pub remote: String,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            push_tags: false,
            remote: "origin".to_owned(),
        }
    }
}

/// Lets repository-taking callables operate transparently on remote
/// repositories.
///
/// Calls are first normalized to all-keyword form so `repo` is addressable
/// however the caller passed it. A `repo` value naming a remote repository is
/// swapped for a scoped temporary clone; everything else reaches the callable
/// unmodified. The clone is gone by the time the call returns, whatever the
/// outcome.
pub struct RemoteClone {
    normalizer: CallNormalizer,
    options: CloneOptions,
}

impl RemoteClone {
    /// Wrapper over a callable declaring the given parameter names, with
    /// default options.
    pub fn new<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_options(params, CloneOptions::default())
    }

    pub fn with_options<I, S>(params: I, options: CloneOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            normalizer: CallNormalizer::new(params),
            options,
        }
    }

    /// Invoke `f` once with the given call, returning its result unchanged.
    ///
    /// A call without a `repo` entry fails with [`Error::MissingRepo`]. When
    /// `repo` names a remote repository, `f` receives the path of a temporary
    /// clone instead; the clone is removed on success, error, and panic.
    pub fn call<V, R, F>(
        &self,
        f: F,
        positional: Vec<V>,
        keyword: Vec<(String, V)>,
    ) -> Result<R, Error>
    where
        V: RepoParam,
        F: FnOnce(NormalizedCall<V>) -> R,
    {
        let mut call = self.normalizer.normalize(positional, keyword)?;
        let repo = call.get(REPO_PARAM).ok_or(Error::MissingRepo)?;
        let remote_url = repo
            .repo_spec()
            .filter(|spec| is_remote_url(spec))
            .map(str::to_owned);

        let Some(url) = remote_url else {
            return Ok(f(call));
        };

        let clone = ClonedRepo::clone(&url)?;
        debug!("substituting {url} with {}", clone.path().display());
        call.insert(REPO_PARAM.to_owned(), V::local(clone.path()));
        let result = f(call);
        if self.options.push_tags {
            clone.push_tags(&self.options.remote)?;
        }
        clone.close()?;
        Ok(result)
    }

    /// Decorator-style composition: consume the wrapper and a callable,
    /// yield a callable with the contract of [`RemoteClone::call`].
    pub fn wrap<V, R, F>(self, f: F) -> impl Fn(Vec<V>, Vec<(String, V)>) -> Result<R, Error>
    where
        V: RepoParam,
        F: Fn(NormalizedCall<V>) -> R,
    {
        move |positional, keyword| self.call(&f, positional, keyword)
    }
}
