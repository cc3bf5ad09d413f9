use std::path::Path;

use git2::{BranchType, Repository, StatusOptions};

use crate::error::{ReleaseError, Result};
use crate::git::GitBackend;

/// Wrapper around git2::Repository implementing [GitBackend]
pub struct Git2Backend {
    repo: Repository,
}

impl Git2Backend {
    /// Open or discover a git repository at or above the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(Git2Backend { repo })
    }

    /// Name of the repository's working directory, used as the default
    /// application name in tag messages.
    pub fn workdir_name(&self) -> Option<String> {
        self.repo
            .workdir()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }

    fn credential_callbacks() -> git2::RemoteCallbacks<'static> {
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                let key_paths = vec![
                    format!("{}/.ssh/id_ed25519", home),
                    format!("{}/.ssh/id_rsa", home),
                    format!("{}/.ssh/id_ecdsa", home),
                ];

                for key_path in key_paths {
                    let path = std::path::Path::new(&key_path);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(
                            username_from_url.unwrap_or("git"),
                            None,
                            path,
                            None,
                        ) {
                            return Ok(cred);
                        }
                    }
                }

                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
                {
                    return Ok(cred);
                }
            }

            git2::Cred::default()
        });
        callbacks
    }

    fn push_refspec(&self, refspec: &str, remote_name: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|_| ReleaseError::remote(format!("no remote named '{}'", remote_name)))?;

        let mut push_options = git2::PushOptions::new();
        let mut callbacks = Self::credential_callbacks();

        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                Err(git2::Error::from_str(&format!(
                    "push rejected for {}: {}",
                    refname, status
                )))
            } else {
                Ok(())
            }
        });

        push_options.remote_callbacks(callbacks);

        remote
            .push(&[refspec], Some(&mut push_options))
            .map_err(|e| {
                if e.class() == git2::ErrorClass::Net {
                    ReleaseError::remote(format!("network error during push: {}", e))
                } else {
                    ReleaseError::remote(format!("failed to push '{}': {}", refspec, e))
                }
            })
    }
}

impl GitBackend for Git2Backend {
    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        head.shorthand()
            .map(|s| s.to_string())
            .ok_or_else(|| ReleaseError::structural("HEAD is detached or not valid UTF-8"))
    }

    fn branch_exists(&self, branch: &str, remote: &str) -> Result<bool> {
        if self.repo.find_branch(branch, BranchType::Local).is_ok() {
            return Ok(true);
        }
        let remote_name = format!("{}/{}", remote, branch);
        Ok(self.repo.find_branch(&remote_name, BranchType::Remote).is_ok())
    }

    fn tag_exists(&self, tag: &str) -> Result<bool> {
        let reference_name = format!("refs/tags/{}", tag);
        match self.repo.find_reference(&reference_name) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list_tags(&self, pattern: &str) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(Some(pattern))?;
        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);
        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(!statuses.is_empty())
    }

    fn signing_configured(&self) -> Result<bool> {
        let config = self.repo.config()?;
        if config.get_string("user.signingkey").is_ok() {
            return Ok(true);
        }
        Ok(config.get_bool("commit.gpgsign").unwrap_or(false))
    }

    fn fetch(&self, remote_name: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|_| ReleaseError::remote(format!("no remote named '{}'", remote_name)))?;

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(Self::credential_callbacks());
        fetch_options.download_tags(git2::AutotagOption::All);

        // Empty refspec list uses the remote's configured refspecs.
        remote
            .fetch(&[] as &[&str], Some(&mut fetch_options), None)
            .map_err(|e| ReleaseError::remote(format!("fetch from '{}' failed: {}", remote_name, e)))
    }

    fn in_sync_with_remote(&self, branch: &str, remote: &str) -> Result<bool> {
        let local = self
            .repo
            .find_branch(branch, BranchType::Local)
            .map_err(|e| ReleaseError::structural(format!("cannot find branch '{}': {}", branch, e)))?
            .get()
            .target();

        let reference_name = format!("refs/remotes/{}/{}", remote, branch);
        match self.repo.find_reference(&reference_name) {
            Ok(reference) => Ok(reference.target() == local),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        let tagger = self.repo.signature()?;
        self.repo
            .tag(name, head.as_object(), &tagger, message, false)?;
        Ok(())
    }

    fn push_tag(&self, name: &str, remote: &str) -> Result<()> {
        let refspec = format!("refs/tags/{}:refs/tags/{}", name, name);
        self.push_refspec(&refspec, remote)
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo.branch(name, &head, false)?;
        Ok(())
    }

    fn push_branch(&self, name: &str, remote: &str) -> Result<()> {
        let refspec = format!("refs/heads/{}:refs/heads/{}", name, name);
        self.push_refspec(&refspec, remote)
    }
}
