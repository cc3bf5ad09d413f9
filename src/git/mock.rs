use std::cell::RefCell;
use std::collections::HashSet;

use crate::error::{ReleaseError, Result};
use crate::git::GitBackend;

/// Mock git backend for testing without a real repository.
///
/// Built up with the `with_*` builder methods; mutating calls are recorded
/// so tests can assert which tags and branches a run created or pushed.
pub struct MockGit {
    branch: String,
    branches: HashSet<String>,
    tags: Vec<String>,
    uncommitted: bool,
    signing: bool,
    in_sync: bool,
    fetch_fails: bool,
    push_fails: bool,
    pub created_tags: RefCell<Vec<(String, String)>>,
    pub pushed_tags: RefCell<Vec<String>>,
    pub created_branches: RefCell<Vec<String>>,
    pub pushed_branches: RefCell<Vec<String>>,
}

impl MockGit {
    /// A clean repository checked out on the given branch
    pub fn new(branch: impl Into<String>) -> Self {
        let branch = branch.into();
        let mut branches = HashSet::new();
        branches.insert(branch.clone());

        MockGit {
            branch,
            branches,
            tags: Vec::new(),
            uncommitted: false,
            signing: true,
            in_sync: true,
            fetch_fails: false,
            push_fails: false,
            created_tags: RefCell::new(Vec::new()),
            pushed_tags: RefCell::new(Vec::new()),
            created_branches: RefCell::new(Vec::new()),
            pushed_branches: RefCell::new(Vec::new()),
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_branches(mut self, branches: &[&str]) -> Self {
        self.branches.extend(branches.iter().map(|b| b.to_string()));
        self
    }

    pub fn with_uncommitted_changes(mut self) -> Self {
        self.uncommitted = true;
        self
    }

    pub fn without_signing(mut self) -> Self {
        self.signing = false;
        self
    }

    pub fn out_of_sync(mut self) -> Self {
        self.in_sync = false;
        self
    }

    pub fn failing_fetch(mut self) -> Self {
        self.fetch_fails = true;
        self
    }

    pub fn failing_push(mut self) -> Self {
        self.push_fails = true;
        self
    }

    // Glob matching limited to the patterns the workflow uses: a literal
    // prefix followed by a single trailing '*'.
    fn glob_match(pattern: &str, name: &str) -> bool {
        match pattern.strip_suffix('*') {
            Some(prefix) => name.starts_with(prefix),
            None => name == pattern,
        }
    }
}

impl GitBackend for MockGit {
    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn branch_exists(&self, branch: &str, _remote: &str) -> Result<bool> {
        Ok(self.branches.contains(branch))
    }

    fn tag_exists(&self, tag: &str) -> Result<bool> {
        Ok(self.tags.iter().any(|t| t == tag))
    }

    fn list_tags(&self, pattern: &str) -> Result<Vec<String>> {
        Ok(self
            .tags
            .iter()
            .filter(|t| Self::glob_match(pattern, t))
            .cloned()
            .collect())
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        Ok(self.uncommitted)
    }

    fn signing_configured(&self) -> Result<bool> {
        Ok(self.signing)
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        if self.fetch_fails {
            Err(ReleaseError::remote(format!(
                "fetch from '{}' failed: connection refused",
                remote
            )))
        } else {
            Ok(())
        }
    }

    fn in_sync_with_remote(&self, _branch: &str, _remote: &str) -> Result<bool> {
        Ok(self.in_sync)
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        self.created_tags
            .borrow_mut()
            .push((name.to_string(), message.to_string()));
        Ok(())
    }

    fn push_tag(&self, name: &str, remote: &str) -> Result<()> {
        if self.push_fails {
            return Err(ReleaseError::remote(format!(
                "failed to push '{}' to '{}'",
                name, remote
            )));
        }
        self.pushed_tags.borrow_mut().push(name.to_string());
        Ok(())
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        self.created_branches.borrow_mut().push(name.to_string());
        Ok(())
    }

    fn push_branch(&self, name: &str, remote: &str) -> Result<()> {
        if self.push_fails {
            return Err(ReleaseError::remote(format!(
                "failed to push '{}' to '{}'",
                name, remote
            )));
        }
        self.pushed_branches.borrow_mut().push(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_defaults_are_clean() {
        let git = MockGit::new("master");
        assert_eq!(git.current_branch().unwrap(), "master");
        assert!(!git.has_uncommitted_changes().unwrap());
        assert!(git.signing_configured().unwrap());
        assert!(git.in_sync_with_remote("master", "origin").unwrap());
        assert!(git.list_tags("v*").unwrap().is_empty());
    }

    #[test]
    fn test_mock_tag_listing_respects_pattern() {
        let git = MockGit::new("master").with_tags(&["v2.5.0", "v2.5.1", "v2.6.0", "other"]);
        assert_eq!(git.list_tags("v2.5.*").unwrap(), vec!["v2.5.0", "v2.5.1"]);
        assert_eq!(
            git.list_tags("v*").unwrap(),
            vec!["v2.5.0", "v2.5.1", "v2.6.0"]
        );
    }

    #[test]
    fn test_mock_records_mutations() {
        let git = MockGit::new("master");
        git.create_branch("release-2.7").unwrap();
        git.create_tag("v2.7.0", "Release app v2.7.0").unwrap();
        git.push_tag("v2.7.0", "origin").unwrap();

        assert_eq!(git.created_branches.borrow().as_slice(), ["release-2.7"]);
        assert_eq!(
            git.created_tags.borrow().as_slice(),
            [("v2.7.0".to_string(), "Release app v2.7.0".to_string())]
        );
        assert_eq!(git.pushed_tags.borrow().as_slice(), ["v2.7.0"]);
    }

    #[test]
    fn test_mock_branch_exists() {
        let git = MockGit::new("master").with_branches(&["release-2.6"]);
        assert!(git.branch_exists("master", "origin").unwrap());
        assert!(git.branch_exists("release-2.6", "origin").unwrap());
        assert!(!git.branch_exists("release-2.7", "origin").unwrap());
    }
}
