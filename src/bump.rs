//! Version-bump calculation and preflight checks.
//!
//! Both the interactive wizard and the scripted orchestrator resolve their
//! requests through [resolve], so regression checks, branch-policy checks
//! and tag/branch preflights live in exactly one place.

use crate::config::RunConfig;
use crate::error::{ReleaseError, Result, Warnings};
use crate::git::GitBackend;
use crate::policy::{self, BumpType, PolicyContext};
use crate::version::{self, Version};

/// A fully resolved release decision: what to tag and which release branch
/// (if any) to create first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    pub bump: BumpType,
    pub version: Version,
    pub branch_to_create: Option<String>,
}

/// A resolution request, either a named bump type or a user-typed version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Bump(BumpType),
    Custom(String),
}

/// The version a bump type would produce, with no policy applied.
///
/// Returns `None` for [BumpType::Custom] (the version comes from free text)
/// and for `rc`/`rc-finalize` when there is no candidate in flight.
pub fn next_version(bump: BumpType, current: &Version) -> Option<Version> {
    let v = match bump {
        BumpType::Patch => Version::new(current.major, current.minor, current.patch + 1, 0),
        BumpType::PatchRc => Version::new(current.major, current.minor, current.patch + 1, 1),
        BumpType::Minor => Version::new(current.major, current.minor + 1, 0, 0),
        BumpType::MinorRc => Version::new(current.major, current.minor + 1, 0, 1),
        BumpType::Major => Version::new(current.major + 1, 0, 0, 0),
        BumpType::MajorRc => Version::new(current.major + 1, 0, 0, 1),
        BumpType::Rc => {
            if !current.is_rc() {
                return None;
            }
            Version::new(current.major, current.minor, current.patch, current.rc + 1)
        }
        BumpType::RcFinalize => {
            if !current.is_rc() {
                return None;
            }
            Version::new(current.major, current.minor, current.patch, 0)
        }
        BumpType::Custom => return None,
    };
    Some(v)
}

/// The release branch a bump type brings into existence, if any
fn branch_to_create(bump: BumpType, current: &Version) -> Option<String> {
    match bump {
        BumpType::Minor | BumpType::MinorRc => {
            Some(policy::release_branch(current.major, current.minor + 1))
        }
        BumpType::Major | BumpType::MajorRc => Some(policy::release_branch(current.major + 1, 0)),
        _ => None,
    }
}

/// Compute the next version for a named bump type and enforce the branch
/// policy.
///
/// Structural failures (`rc` on a stable version, a custom bump with no
/// version string) are always fatal. Policy denials go through the warning
/// collector, which makes them fatal unless force mode is active.
pub fn calculate(
    bump: BumpType,
    ctx: &PolicyContext,
    cfg: &RunConfig,
    warnings: &mut Warnings,
) -> Result<ReleasePlan> {
    if bump == BumpType::Custom {
        return Err(ReleaseError::structural(
            "custom bump requires an explicit version string",
        ));
    }
    if bump.needs_rc() && !ctx.current_version.is_rc() {
        let msg = match bump {
            BumpType::RcFinalize => format!(
                "nothing to finalize: current version {} is not a release candidate",
                ctx.current_version
            ),
            _ => format!(
                "current version {} is not a release candidate",
                ctx.current_version
            ),
        };
        return Err(ReleaseError::structural(msg));
    }

    let verdict = policy::admissible(bump, ctx);
    if !verdict.allowed {
        let reason = verdict
            .reason
            .unwrap_or_else(|| format!("bump '{}' is not allowed from this branch", bump));
        warnings.admit(cfg.force, reason)?;
    }

    let Some(version) = next_version(bump, &ctx.current_version) else {
        return Err(ReleaseError::structural(format!(
            "invalid bump type '{}'",
            bump
        )));
    };

    Ok(ReleasePlan {
        bump,
        version,
        branch_to_create: branch_to_create(bump, &ctx.current_version),
    })
}

/// Resolve a user-typed version string into a release plan.
///
/// Validates the syntax with the strict gate, checks for regressions
/// against the entered version's release line, and applies the same branch
/// rules as the named bump types against the resolved version. All of these
/// checks are demotable under force mode.
pub fn resolve_custom<G: GitBackend>(
    input: &str,
    ctx: &PolicyContext,
    git: &G,
    cfg: &RunConfig,
    warnings: &mut Warnings,
) -> Result<ReleasePlan> {
    if !Version::is_valid_semver(input) {
        warnings.admit(
            cfg.force,
            format!(
                "'{}' is not a valid version (expected MAJOR.MINOR.PATCH or MAJOR.MINOR.PATCH-rcN)",
                input
            ),
        )?;
    }
    let entered = Version::parse(input);
    let current = &ctx.current_version;

    // Regression check against the entered version's own release line.
    if entered.line() == current.line() {
        if entered <= *current {
            warnings.admit(
                cfg.force,
                format!("version {} must be greater than current {}", entered, current),
            )?;
        }
    } else {
        let pattern = format!("v{}.{}.*", entered.major, entered.minor);
        let line_tags = git.list_tags(&pattern)?;
        let sorted = version::sort_tags_descending(&line_tags);
        if let Some(latest_tag) = sorted.first() {
            let latest = Version::parse(latest_tag);
            if entered <= latest {
                warnings.admit(
                    cfg.force,
                    format!(
                        "version {} must exceed {}, the latest tag of the {}.{} line",
                        entered, latest, entered.major, entered.minor
                    ),
                )?;
            }
        }
    }

    // Branch rule against the entered version, not the current one.
    let mut branch_to_create = None;
    if entered.line() > current.line() {
        let target = policy::release_branch(entered.major, entered.minor);
        let branch = ctx.current_branch.as_str();
        if branch != ctx.protected_branch && branch != target {
            warnings.admit(
                cfg.force,
                format!(
                    "version {} starts a new release line; release it from '{}' or '{}', not '{}'",
                    entered, ctx.protected_branch, target, branch
                ),
            )?;
        }
        branch_to_create = Some(target);
    } else if let Some(line) = policy::branch_line(&ctx.current_branch) {
        if line != entered.line() {
            warnings.admit(
                cfg.force,
                format!(
                    "version {} does not belong to the {}.{} line of branch '{}'",
                    entered, line.0, line.1, ctx.current_branch
                ),
            )?;
        }
    }

    Ok(ReleasePlan {
        bump: BumpType::Custom,
        version: entered,
        branch_to_create,
    })
}

/// Check the plan against the repository's existing tags and branches.
///
/// Idempotent: the orchestrator runs it again just before acting, in case
/// time passed since the plan was resolved.
pub fn preflight<G: GitBackend>(
    plan: &mut ReleasePlan,
    git: &G,
    cfg: &RunConfig,
    warnings: &mut Warnings,
) -> Result<()> {
    let tag = plan.version.tag_name();
    if git.tag_exists(&tag)? {
        warnings.admit(cfg.force, format!("tag {} already exists", tag))?;
    }

    if let Some(branch) = plan.branch_to_create.clone() {
        if git.branch_exists(&branch, &cfg.remote)? {
            if plan.version.is_rc() {
                // A branch that already exists already had its RC cycle.
                warnings.admit(
                    cfg.force,
                    format!(
                        "cannot start a new release candidate cycle: branch '{}' already exists",
                        branch
                    ),
                )?;
            }
            // Nothing to create either way.
            plan.branch_to_create = None;
        }
    }

    Ok(())
}

/// Resolve a request end to end: calculation, policy, and preflights.
///
/// Returns the plan together with any warnings force mode buffered along
/// the way.
pub fn resolve<G: GitBackend>(
    request: &Request,
    ctx: &PolicyContext,
    git: &G,
    cfg: &RunConfig,
) -> Result<(ReleasePlan, Vec<String>)> {
    let mut warnings = Warnings::new();
    let mut plan = match request {
        Request::Bump(bump) => calculate(*bump, ctx, cfg, &mut warnings)?,
        Request::Custom(input) => resolve_custom(input, ctx, git, cfg, &mut warnings)?,
    };
    preflight(&mut plan, git, cfg, &mut warnings)?;
    Ok((plan, warnings.into_vec()))
}
