//! Git operations abstraction layer
//!
//! Trait-based abstraction over the git operations the release workflow
//! needs, with a real implementation backed by the `git2` crate and a mock
//! implementation for testing.
//!
//! The release core never parses git output beyond what these methods
//! return; tag sorting and version parsing happen in [crate::version].
//!
//! - [repository::Git2Backend]: real implementation using `git2`
//! - [mock::MockGit]: in-memory implementation for tests

pub mod mock;
pub mod repository;

pub use mock::MockGit;
pub use repository::Git2Backend;

use crate::error::Result;

/// Capability surface the release workflow consumes.
///
/// All calls are blocking and synchronous; the workflow is single-threaded
/// and issues them only at the boundaries between state transitions.
pub trait GitBackend {
    /// Name of the currently checked-out branch
    fn current_branch(&self) -> Result<String>;

    /// Whether a branch exists locally or on the given remote
    fn branch_exists(&self, branch: &str, remote: &str) -> Result<bool>;

    /// Whether a tag exists locally
    fn tag_exists(&self, tag: &str) -> Result<bool>;

    /// Tag names matching a glob pattern (e.g. `v2.6.*`), unsorted
    fn list_tags(&self, pattern: &str) -> Result<Vec<String>>;

    /// Whether the working tree has uncommitted changes to tracked files
    fn has_uncommitted_changes(&self) -> Result<bool>;

    /// Whether commit/tag signing is configured for this repository
    fn signing_configured(&self) -> Result<bool>;

    /// Fetch branches and tags from the remote
    fn fetch(&self, remote: &str) -> Result<()>;

    /// Whether the local branch head matches its remote counterpart.
    /// A branch with no remote counterpart counts as in sync.
    fn in_sync_with_remote(&self, branch: &str, remote: &str) -> Result<bool>;

    /// Create an annotated tag at HEAD with the given message
    fn create_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Push an existing tag to the remote
    fn push_tag(&self, name: &str, remote: &str) -> Result<()>;

    /// Create a branch at HEAD
    fn create_branch(&self, name: &str) -> Result<()>;

    /// Push an existing branch to the remote
    fn push_branch(&self, name: &str, remote: &str) -> Result<()>;
}
