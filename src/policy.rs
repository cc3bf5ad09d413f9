use std::fmt;
use std::str::FromStr;

use crate::error::{ReleaseError, Result};
use crate::version::Version;

/// Requested category of version increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpType {
    Patch,
    PatchRc,
    Minor,
    MinorRc,
    Major,
    MajorRc,
    /// Next candidate in an in-flight RC cycle
    Rc,
    /// Promote an in-flight RC to the stable release
    RcFinalize,
    /// Free-text version supplied by the user
    Custom,
}

impl BumpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BumpType::Patch => "patch",
            BumpType::PatchRc => "patch-rc",
            BumpType::Minor => "minor",
            BumpType::MinorRc => "minor-rc",
            BumpType::Major => "major",
            BumpType::MajorRc => "major-rc",
            BumpType::Rc => "rc",
            BumpType::RcFinalize => "rc-finalize",
            BumpType::Custom => "custom",
        }
    }

    /// Bump types that are only meaningful while an RC cycle is in flight
    pub fn needs_rc(&self) -> bool {
        matches!(self, BumpType::Rc | BumpType::RcFinalize)
    }
}

impl fmt::Display for BumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BumpType {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "patch" => Ok(BumpType::Patch),
            "patch-rc" => Ok(BumpType::PatchRc),
            "minor" => Ok(BumpType::Minor),
            "minor-rc" => Ok(BumpType::MinorRc),
            "major" => Ok(BumpType::Major),
            "major-rc" => Ok(BumpType::MajorRc),
            "rc" => Ok(BumpType::Rc),
            "rc-finalize" => Ok(BumpType::RcFinalize),
            other => Err(ReleaseError::structural(format!(
                "invalid bump type '{}'",
                other
            ))),
        }
    }
}

/// The only inputs the branch-policy validator needs. Pure data, no git
/// access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyContext {
    pub current_version: Version,
    pub current_branch: String,
    pub protected_branch: String,
}

impl PolicyContext {
    pub fn new(
        current_version: Version,
        current_branch: impl Into<String>,
        protected_branch: impl Into<String>,
    ) -> Self {
        PolicyContext {
            current_version,
            current_branch: current_branch.into(),
            protected_branch: protected_branch.into(),
        }
    }
}

/// Verdict of the branch policy for one bump type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub allowed: bool,
    /// Branch the user should be on (or create) instead, when not allowed
    pub suggested_branch: Option<String>,
    /// Human-readable reason, present exactly when not allowed
    pub reason: Option<String>,
}

impl Verdict {
    fn ok() -> Self {
        Verdict {
            allowed: true,
            suggested_branch: None,
            reason: None,
        }
    }

    fn denied(suggested: Option<String>, reason: String) -> Self {
        Verdict {
            allowed: false,
            suggested_branch: suggested,
            reason: Some(reason),
        }
    }
}

/// Release branch name for a line: `release-{major}.{minor}`
pub fn release_branch(major: u32, minor: u32) -> String {
    format!("release-{}.{}", major, minor)
}

/// Parse a `release-{major}.{minor}` branch name back into its line
pub fn branch_line(branch: &str) -> Option<(u32, u32)> {
    let rest = branch.strip_prefix("release-")?;
    let (major, minor) = rest.split_once('.')?;
    if minor.contains('.') {
        return None;
    }
    Some((major.parse().ok()?, minor.parse().ok()?))
}

/// Whether a branch looks like a branch releases may come from at all
pub fn is_release_shaped(branch: &str, protected_branch: &str) -> bool {
    branch == protected_branch || branch_line(branch).is_some()
}

/// Is the given bump type admissible from the current branch?
///
/// Pure predicate over [PolicyContext]; never mutates, never errors. Callers
/// decide whether a denial is fatal or demoted to a warning.
pub fn admissible(bump: BumpType, ctx: &PolicyContext) -> Verdict {
    let current = &ctx.current_version;
    let branch = ctx.current_branch.as_str();
    let protected = ctx.protected_branch.as_str();

    match bump {
        // Patching an existing line only makes sense from that line's branch.
        BumpType::Patch | BumpType::PatchRc => {
            let required = release_branch(current.major, current.minor);
            if branch == required {
                Verdict::ok()
            } else {
                let reason = format!(
                    "{} releases for the {}.{} line must be made from '{}', not '{}'",
                    bump, current.major, current.minor, required, branch
                );
                Verdict::denied(Some(required), reason)
            }
        }
        // New lines start from the trunk, or from an already-created target
        // release branch.
        BumpType::Minor | BumpType::MinorRc => {
            let target = release_branch(current.major, current.minor + 1);
            line_bump_verdict(bump, branch, protected, target)
        }
        BumpType::Major | BumpType::MajorRc => {
            let target = release_branch(current.major + 1, 0);
            line_bump_verdict(bump, branch, protected, target)
        }
        // An in-flight RC already establishes its line; patch-level RCs pin
        // the exact release branch, minor/major RCs also accept the trunk.
        BumpType::Rc | BumpType::RcFinalize => {
            if !current.is_rc() {
                return Verdict::denied(
                    None,
                    format!("current version {} is not a release candidate", current),
                );
            }
            let line_branch = release_branch(current.major, current.minor);
            if current.patch == 0 {
                line_bump_verdict(bump, branch, protected, line_branch)
            } else if branch == line_branch {
                Verdict::ok()
            } else {
                let reason = format!(
                    "{} for {} must be made from '{}', not '{}'",
                    bump, current, line_branch, branch
                );
                Verdict::denied(Some(line_branch), reason)
            }
        }
        // Custom versions are validated later against the resolved version.
        BumpType::Custom => Verdict::ok(),
    }
}

fn line_bump_verdict(bump: BumpType, branch: &str, protected: &str, target: String) -> Verdict {
    if branch == protected || branch == target {
        Verdict::ok()
    } else {
        let reason = format!(
            "{} releases must be made from '{}' or '{}', not '{}'",
            bump, protected, target, branch
        );
        Verdict::denied(Some(target), reason)
    }
}
