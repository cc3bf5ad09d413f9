use anyhow::Result;
use clap::Parser;

use git_release::config::{self, RunConfig};
use git_release::git::Git2Backend;
use git_release::policy::BumpType;
use git_release::release::{self, ReleaseRequest, RunOutcome};
use git_release::ui;

#[derive(clap::Parser)]
#[command(
    name = "git-release",
    about = "Compute the next semantic version and tag it from the right branch"
)]
struct Args {
    #[arg(
        value_name = "BUMP_TYPE",
        help = "One of: patch, patch-rc, minor, minor-rc, major, major-rc, rc, rc-finalize"
    )]
    bump: Option<String>,

    #[arg(
        short = 'v',
        long = "version",
        help = "Explicit version to release (X.Y.Z or X.Y.Z-rcN), skips the interactive picker"
    )]
    version: Option<String>,

    #[arg(short = 'b', long, help = "Trunk branch minor/major releases start from")]
    protected_branch: Option<String>,

    #[arg(short, long, help = "Demote policy failures to warnings")]
    force: bool,

    #[arg(short = 'n', long, help = "Print planned actions without making changes")]
    dry_run: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let file_config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("loading config: {}", e));
            std::process::exit(1);
        }
    };

    let bump = match args.bump.as_deref().map(str::parse::<BumpType>).transpose() {
        Ok(bump) => bump,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let git = match Git2Backend::open(".") {
        Ok(git) => git,
        Err(e) => {
            ui::display_error(&format!("not in a git repository: {}", e));
            std::process::exit(1);
        }
    };

    let app_name = if file_config.app_name.is_empty() {
        git.workdir_name().unwrap_or_else(|| "release".to_string())
    } else {
        file_config.app_name.clone()
    };

    let cfg = RunConfig::new(
        args.force,
        args.dry_run,
        config::resolve_protected_branch(args.protected_branch.as_deref(), &file_config),
        file_config.remote.clone(),
        app_name,
    );

    let request = ReleaseRequest {
        bump,
        version: args.version,
    };

    match release::run(&git, &cfg, &request) {
        Ok(RunOutcome::Completed { plan }) => {
            println!(
                "\n{} Released {} v{}\n",
                console::style("✓").green(),
                cfg.app_name,
                plan.version
            );
        }
        Ok(RunOutcome::DryRun { .. }) => {}
        Ok(RunOutcome::Aborted) => {
            println!("Release aborted.");
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }

    Ok(())
}
