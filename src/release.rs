//! Release orchestration: environment checks, version resolution, final
//! confirmation, and tag/branch execution.
//!
//! The scripted and interactive front ends converge here; both resolve
//! through [crate::bump] and finish in [execute].

use crate::bump::{self, ReleasePlan, Request};
use crate::config::RunConfig;
use crate::error::{ReleaseError, Result, Warnings};
use crate::git::GitBackend;
use crate::policy::{self, BumpType, PolicyContext};
use crate::ui::{self, formatter};
use crate::version::{self, Version};
use crate::wizard::Outcome;

/// What the caller asked for on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseRequest {
    /// Named bump type (scripted path)
    pub bump: Option<BumpType>,
    /// Explicit version string, validated like custom entry
    pub version: Option<String>,
}

impl ReleaseRequest {
    fn is_interactive(&self) -> bool {
        self.bump.is_none() && self.version.is_none()
    }
}

/// Terminal result of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Tag created and pushed
    Completed { plan: ReleasePlan },
    /// Planned actions printed, nothing mutated
    DryRun { plan: ReleasePlan },
    /// User declined; not an error
    Aborted,
}

/// Environment sanity checks, each independently demotable under force
/// mode: branch shape, clean working tree, signing configuration, and
/// freshness against the remote (which needs a fetch first).
pub fn environment_checks<G: GitBackend>(
    git: &G,
    cfg: &RunConfig,
    warnings: &mut Warnings,
) -> Result<()> {
    let branch = git.current_branch()?;

    if !policy::is_release_shaped(&branch, &cfg.protected_branch) {
        warnings.admit(
            cfg.force,
            format!(
                "branch '{}' is neither '{}' nor a release branch",
                branch, cfg.protected_branch
            ),
        )?;
    }

    if git.has_uncommitted_changes()? {
        warnings.admit(cfg.force, "working tree has uncommitted changes")?;
    }

    if !git.signing_configured()? {
        warnings.admit(
            cfg.force,
            "commit signing is not configured (user.signingkey or commit.gpgsign)",
        )?;
    }

    match git.fetch(&cfg.remote) {
        Ok(()) => {
            if !git.in_sync_with_remote(&branch, &cfg.remote)? {
                warnings.admit(
                    cfg.force,
                    format!("branch '{}' is not in sync with '{}'", branch, cfg.remote),
                )?;
            }
        }
        // Without a fetch the freshness check is meaningless; surface the
        // failure itself as the policy problem.
        Err(e) => warnings.admit(cfg.force, format!("{}", e))?,
    }

    Ok(())
}

/// The latest released version, from the newest version tag; the zero
/// version when the repository has no tags yet.
pub fn current_version<G: GitBackend>(git: &G) -> Result<Version> {
    let tags = git.list_tags("v*")?;
    Ok(version::latest_version(&tags).unwrap_or(Version::ZERO))
}

/// Execute a resolved plan: create/push the release branch if one is due,
/// then create and push the annotated tag.
pub fn execute<G: GitBackend>(plan: &ReleasePlan, git: &G, cfg: &RunConfig) -> Result<()> {
    let tag = plan.version.tag_name();
    let message = format!("Release {} v{}", cfg.app_name, plan.version);

    if let Some(branch) = &plan.branch_to_create {
        ui::display_status(&format!("Creating branch {}", branch));
        git.create_branch(branch)?;
        git.push_branch(branch, &cfg.remote)?;
        ui::display_success(&format!("Pushed branch {} to {}", branch, cfg.remote));
    }

    ui::display_status(&format!("Creating tag {}", tag));
    git.create_tag(&tag, &message)?;
    // Not transactional: a failed push leaves the local tag in place.
    git.push_tag(&tag, &cfg.remote).map_err(|e| {
        ReleaseError::remote(format!(
            "tag {} was created locally but could not be pushed: {}",
            tag, e
        ))
    })?;
    ui::display_success(&format!("Pushed tag {} to {}", tag, cfg.remote));

    Ok(())
}

fn print_dry_run(plan: &ReleasePlan, cfg: &RunConfig) {
    let tag = plan.version.tag_name();
    ui::display_status("Dry run, nothing will be changed:");
    let mut step = 1;
    if let Some(branch) = &plan.branch_to_create {
        ui::display_success(&format!(
            "  Step {}: would create and push branch {}",
            step, branch
        ));
        step += 1;
    }
    ui::display_success(&format!(
        "  Step {}: would create annotated tag {} (\"Release {} v{}\")",
        step, tag, cfg.app_name, plan.version
    ));
    ui::display_success(&format!(
        "  Step {}: would push {} to {}",
        step + 1,
        tag,
        cfg.remote
    ));
}

/// Run a release from start to finish.
///
/// Resolution comes from the request (scripted) or the interactive wizard;
/// both paths share the environment checks, the idempotent re-preflight,
/// and the execution step.
pub fn run<G: GitBackend>(
    git: &G,
    cfg: &RunConfig,
    request: &ReleaseRequest,
) -> Result<RunOutcome> {
    let mut warnings = Warnings::new();
    environment_checks(git, cfg, &mut warnings)?;

    let current_branch = git.current_branch()?;
    let current = current_version(git)?;
    let ctx = PolicyContext::new(current, current_branch, cfg.protected_branch.clone());

    let mut plan = if let Some(input) = &request.version {
        let (plan, resolved) = bump::resolve(&Request::Custom(input.clone()), &ctx, git, cfg)?;
        warnings.extend_dedup(resolved);
        plan
    } else if let Some(bump) = request.bump {
        let (plan, resolved) = bump::resolve(&Request::Bump(bump), &ctx, git, cfg)?;
        warnings.extend_dedup(resolved);
        plan
    } else {
        match ui::run_wizard(git, &ctx, cfg, &warnings)? {
            Outcome::Confirmed {
                plan,
                warnings: resolved,
            } => {
                warnings.extend_dedup(resolved);
                plan
            }
            Outcome::Aborted => return Ok(RunOutcome::Aborted),
        }
    };

    // Time may have passed since resolution; the preflights are idempotent.
    let mut recheck = Warnings::new();
    bump::preflight(&mut plan, git, cfg, &mut recheck)?;
    warnings.extend_dedup(recheck.into_vec());

    for warning in warnings.iter() {
        ui::display_warning(warning);
    }

    // The wizard already confirmed interactively; scripted callers get one
    // yes/no prompt unless force or dry-run says otherwise.
    if !request.is_interactive() && !cfg.force && !cfg.dry_run {
        for line in formatter::render_confirm_summary(&plan, &[]) {
            println!("{}", line);
        }
        if !ui::confirm_action(&format!("Release v{} now?", plan.version))? {
            return Ok(RunOutcome::Aborted);
        }
    }

    if cfg.dry_run {
        print_dry_run(&plan, cfg);
        return Ok(RunOutcome::DryRun { plan });
    }

    execute(&plan, git, cfg)?;
    Ok(RunOutcome::Completed { plan })
}
