//! Git-backed commit lookup.
//!
//! [`GitCommitResolver`] confirms that a hash found in rendered text names a
//! commit in a local repository, so the markup engine only links real
//! commits.

use std::path::Path;

use gix::object::Kind;
use xref_markup::{CommitResolver, LookupError};

/// Resolves commit hashes by opening the repository with `gix`.
///
/// The repository is opened on every call; nothing is cached.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCommitResolver;

impl GitCommitResolver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CommitResolver for GitCommitResolver {
    fn resolve(&self, repo_path: &Path, hash: &str) -> Result<(), LookupError> {
        let repo = gix::open(repo_path).map_err(|e| {
            tracing::debug!(path = %repo_path.display(), error = %e, "Failed to open repository");
            LookupError::backend(e)
        })?;

        // Unknown and ambiguous prefixes both mean "no such revision".
        let id = repo
            .rev_parse_single(hash)
            .map_err(|_| LookupError::NotFound(hash.to_owned()))?;

        let object = id.object().map_err(LookupError::backend)?;
        if object.kind != Kind::Commit {
            return Err(LookupError::NotFound(hash.to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::process::Command;

    use tempfile::TempDir;

    use super::*;

    fn git(dir: &Path, args: &[&str]) -> Option<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .ok()?;
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).trim().to_owned())
    }

    /// Repository with one commit, or `None` when git is unavailable.
    fn repo_with_commit() -> Option<(TempDir, String)> {
        let dir = TempDir::new().ok()?;
        let path = dir.path();
        git(path, &["init", "--quiet"])?;
        git(path, &["config", "user.name", "Test User"])?;
        git(path, &["config", "user.email", "test@example.com"])?;
        fs::write(path.join("README.md"), "widget\n").ok()?;
        git(path, &["add", "README.md"])?;
        git(path, &["commit", "--quiet", "-m", "Initial commit"])?;
        let head = git(path, &["rev-parse", "HEAD"])?;
        Some((dir, head))
    }

    #[test]
    fn test_resolve_full_and_short_hash() {
        let Some((dir, head)) = repo_with_commit() else {
            return;
        };
        let resolver = GitCommitResolver::new();

        assert!(resolver.resolve(dir.path(), &head).is_ok());
        assert!(resolver.resolve(dir.path(), &head[..7]).is_ok());
    }

    #[test]
    fn test_unknown_hash_not_found() {
        let Some((dir, _)) = repo_with_commit() else {
            return;
        };

        let result = GitCommitResolver::new().resolve(dir.path(), "deadbeefdeadbeef");
        assert!(matches!(result, Err(LookupError::NotFound(hash)) if hash == "deadbeefdeadbeef"));
    }

    #[test]
    fn test_blob_hash_not_found() {
        let Some((dir, _)) = repo_with_commit() else {
            return;
        };
        let Some(blob) = git(dir.path(), &["rev-parse", "HEAD:README.md"]) else {
            return;
        };

        let result = GitCommitResolver::new().resolve(dir.path(), &blob);
        assert!(matches!(result, Err(LookupError::NotFound(_))));
    }

    #[test]
    fn test_missing_repository_is_backend_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent");

        let result = GitCommitResolver::new().resolve(&missing, "abcdef0");
        assert!(matches!(result, Err(LookupError::Backend(_))));
    }
}
