//! repo-scope: transparent scoped access to remote git repositories
//!
//! Repository-taking callables normally expect a local path. This crate wraps
//! them so they can be invoked with a remote URL instead: the wrapper clones
//! the remote into a uniquely-named temporary directory, hands the callable
//! the local path, optionally pushes tags back to the remote, and removes the
//! directory on every exit path.
//!
//! ```no_run
//! # fn main() -> Result<(), repo_scope::Error> {
//! use repo_scope::{RemoteClone, RepoArg};
//!
//! let wrapper = RemoteClone::new(["repo"]);
//! let seen = wrapper.call(
//!     |mut call| call.remove("repo"),
//!     vec![RepoArg::from("https://github.com/org/project.git")],
//!     vec![],
//! )?;
//! # let _ = seen;
//! # Ok(())
//! # }
//! ```
//!
//! Anything that does not classify as a remote URL, including already-open
//! repository handles, reaches the callable untouched.

pub mod call;
pub mod clone;
pub mod error;
pub mod repo;
pub mod wrap;

pub use call::{CallError, CallNormalizer, NormalizedCall};
pub use clone::{push_tags, ClonedRepo};
pub use error::Error;
pub use repo::{is_remote_url, RepoArg, RepoParam};
pub use wrap::{CloneOptions, RemoteClone, REPO_PARAM};
