//! Commit lookup seam used by the short commit hash processor.

use std::path::Path;

use crate::error::LookupError;

/// Confirms that a candidate hash names a commit in a repository.
///
/// Implementations are called synchronously once per candidate hash and must
/// not retry. Any error leaves the hash unlinked; only errors other than
/// [`LookupError::NotFound`] are logged.
pub trait CommitResolver: Send + Sync {
    /// Succeed if `hash` resolves to a commit in the repository at `repo_path`.
    fn resolve(&self, repo_path: &Path, hash: &str) -> Result<(), LookupError>;
}

impl<F> CommitResolver for F
where
    F: Fn(&Path, &str) -> Result<(), LookupError> + Send + Sync,
{
    fn resolve(&self, repo_path: &Path, hash: &str) -> Result<(), LookupError> {
        self(repo_path, hash)
    }
}

/// Resolver for setups without repository access: nothing resolves.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCommits;

impl CommitResolver for NoCommits {
    fn resolve(&self, _repo_path: &Path, hash: &str) -> Result<(), LookupError> {
        Err(LookupError::NotFound(hash.to_owned()))
    }
}
