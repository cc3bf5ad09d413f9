use thiserror::Error;

/// Unified error type for git-release operations
///
/// Release failures fall into two tiers: `Structural` errors describe
/// requests that are logically impossible to satisfy (an unknown bump type,
/// finalizing a version that is not a release candidate) and are always
/// fatal. `Policy` errors describe rule violations (wrong branch, version
/// regression, pre-existing tag) that force mode downgrades to warnings.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    Structural(String),

    #[error("Policy violation: {0}")]
    Policy(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a structural error with context
    pub fn structural(msg: impl Into<String>) -> Self {
        ReleaseError::Structural(msg.into())
    }

    /// Create a policy error with context
    pub fn policy(msg: impl Into<String>) -> Self {
        ReleaseError::Policy(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseError::Remote(msg.into())
    }

    /// Whether this error is demotable to a warning under force mode
    pub fn is_policy(&self) -> bool {
        matches!(self, ReleaseError::Policy(_))
    }
}

/// Explicit warning collector passed through the calculation layers.
///
/// Replaces any ambient warning buffer: each run owns one collector, so the
/// interactive and scripted front ends share the same calculation code and
/// differ only in when the buffered messages are shown.
#[derive(Debug, Default, Clone)]
pub struct Warnings(Vec<String>);

impl Warnings {
    pub fn new() -> Self {
        Warnings(Vec::new())
    }

    /// Record a policy failure: buffered as a warning under force mode,
    /// otherwise returned as a fatal `Policy` error.
    pub fn admit(&mut self, force: bool, msg: impl Into<String>) -> Result<()> {
        let msg = msg.into();
        if force {
            self.push(msg);
            Ok(())
        } else {
            Err(ReleaseError::Policy(msg))
        }
    }

    /// Buffer a warning unconditionally.
    pub fn push(&mut self, msg: impl Into<String>) {
        self.0.push(msg.into());
    }

    /// Append messages, skipping ones already buffered. The idempotent
    /// re-preflight can re-report a tolerated failure; showing it twice
    /// would be noise.
    pub fn extend_dedup(&mut self, msgs: impl IntoIterator<Item = String>) {
        for msg in msgs {
            if !self.0.contains(&msg) {
                self.0.push(msg);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for Warnings {
    fn from(msgs: Vec<String>) -> Self {
        Warnings(msgs)
    }
}
