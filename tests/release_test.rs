// tests/release_test.rs
//
// Scripted-path orchestration against the mock git backend.

use git_release::config::RunConfig;
use git_release::git::{GitBackend, MockGit};
use git_release::policy::BumpType;
use git_release::release::{run, ReleaseRequest, RunOutcome};
use git_release::version::Version;
use git_release::ReleaseError;

fn cfg(force: bool, dry_run: bool) -> RunConfig {
    RunConfig::new(force, dry_run, "master", "origin", "widget")
}

fn bump_request(bump: BumpType) -> ReleaseRequest {
    ReleaseRequest {
        bump: Some(bump),
        version: None,
    }
}

#[test]
fn test_patch_release_from_release_branch() {
    let git = MockGit::new("release-2.6").with_tags(&["v2.6.1"]);
    let outcome = run(&git, &cfg(true, false), &bump_request(BumpType::Patch)).unwrap();

    match outcome {
        RunOutcome::Completed { plan } => {
            assert_eq!(plan.version, Version::new(2, 6, 2, 0));
            assert_eq!(plan.branch_to_create, None);
        }
        other => panic!("expected Completed, got {:?}", other),
    }
    assert_eq!(
        git.created_tags.borrow().as_slice(),
        [("v2.6.2".to_string(), "Release widget v2.6.2".to_string())]
    );
    assert_eq!(git.pushed_tags.borrow().as_slice(), ["v2.6.2"]);
    assert!(git.created_branches.borrow().is_empty());
}

#[test]
fn test_patch_release_from_trunk_is_policy_error() {
    let git = MockGit::new("master").with_tags(&["v2.6.1"]);
    let err = run(&git, &cfg(false, false), &bump_request(BumpType::Patch)).unwrap_err();
    assert!(err.is_policy());
    assert!(git.created_tags.borrow().is_empty());
}

#[test]
fn test_minor_release_creates_and_pushes_branch_first() {
    let git = MockGit::new("master").with_tags(&["v2.6.1"]);
    let outcome = run(&git, &cfg(true, false), &bump_request(BumpType::Minor)).unwrap();

    assert!(matches!(outcome, RunOutcome::Completed { .. }));
    assert_eq!(git.created_branches.borrow().as_slice(), ["release-2.7"]);
    assert_eq!(git.pushed_branches.borrow().as_slice(), ["release-2.7"]);
    assert_eq!(git.pushed_tags.borrow().as_slice(), ["v2.7.0"]);
}

#[test]
fn test_minor_release_skips_existing_branch() {
    let git = MockGit::new("master")
        .with_tags(&["v2.6.1"])
        .with_branches(&["release-2.7"]);
    let outcome = run(&git, &cfg(true, false), &bump_request(BumpType::Minor)).unwrap();

    match outcome {
        RunOutcome::Completed { plan } => assert_eq!(plan.branch_to_create, None),
        other => panic!("expected Completed, got {:?}", other),
    }
    assert!(git.created_branches.borrow().is_empty());
    assert_eq!(git.pushed_tags.borrow().as_slice(), ["v2.7.0"]);
}

#[test]
fn test_minor_rc_on_existing_branch_is_policy_error() {
    let git = MockGit::new("master")
        .with_tags(&["v2.6.1"])
        .with_branches(&["release-2.7"]);
    let err = run(&git, &cfg(false, false), &bump_request(BumpType::MinorRc)).unwrap_err();
    assert!(err.is_policy());
    assert!(err.to_string().contains("release candidate cycle"));
}

#[test]
fn test_rc_bump_on_stable_is_structural_even_forced() {
    let git = MockGit::new("release-2.6").with_tags(&["v2.6.1"]);
    let err = run(&git, &cfg(true, false), &bump_request(BumpType::Rc)).unwrap_err();
    assert!(matches!(err, ReleaseError::Structural(_)));
}

#[test]
fn test_first_release_of_empty_repository() {
    // no tags at all: the current version is the zero sentinel
    let git = MockGit::new("master");
    let outcome = run(&git, &cfg(true, false), &bump_request(BumpType::Minor)).unwrap();

    match outcome {
        RunOutcome::Completed { plan } => {
            assert_eq!(plan.version, Version::new(0, 1, 0, 0));
            assert_eq!(plan.branch_to_create.as_deref(), Some("release-0.1"));
        }
        other => panic!("expected Completed, got {:?}", other),
    }
}

#[test]
fn test_explicit_version_flag_behaves_like_custom_entry() {
    let git = MockGit::new("master").with_tags(&["v2.6.1"]);
    let request = ReleaseRequest {
        bump: None,
        version: Some("2.7.0-rc1".to_string()),
    };
    let outcome = run(&git, &cfg(true, false), &request).unwrap();

    match outcome {
        RunOutcome::Completed { plan } => {
            assert_eq!(plan.version, Version::new(2, 7, 0, 1));
            assert_eq!(plan.branch_to_create.as_deref(), Some("release-2.7"));
        }
        other => panic!("expected Completed, got {:?}", other),
    }
    assert_eq!(git.pushed_tags.borrow().as_slice(), ["v2.7.0-rc1"]);
}

#[test]
fn test_explicit_malformed_version_is_rejected() {
    let git = MockGit::new("master").with_tags(&["v2.6.1"]);
    let request = ReleaseRequest {
        bump: None,
        version: Some("2.7".to_string()),
    };
    let err = run(&git, &cfg(false, false), &request).unwrap_err();
    assert!(err.to_string().contains("not a valid version"));
}

#[test]
fn test_dirty_worktree_blocks_unless_forced() {
    let git = MockGit::new("release-2.6")
        .with_tags(&["v2.6.1"])
        .with_uncommitted_changes();

    assert!(run(&git, &cfg(false, false), &bump_request(BumpType::Patch)).is_err());

    let git = MockGit::new("release-2.6")
        .with_tags(&["v2.6.1"])
        .with_uncommitted_changes();
    let outcome = run(&git, &cfg(true, false), &bump_request(BumpType::Patch)).unwrap();
    assert!(matches!(outcome, RunOutcome::Completed { .. }));
}

#[test]
fn test_stale_branch_blocks_unless_forced() {
    let git = MockGit::new("release-2.6")
        .with_tags(&["v2.6.1"])
        .out_of_sync();
    let err = run(&git, &cfg(false, false), &bump_request(BumpType::Patch)).unwrap_err();
    assert!(err.to_string().contains("in sync"));
}

#[test]
fn test_dry_run_prints_instead_of_acting() {
    let git = MockGit::new("master").with_tags(&["v2.6.1"]);
    let outcome = run(&git, &cfg(false, true), &bump_request(BumpType::Major)).unwrap();

    match outcome {
        RunOutcome::DryRun { plan } => {
            assert_eq!(plan.version, Version::new(3, 0, 0, 0));
        }
        other => panic!("expected DryRun, got {:?}", other),
    }
    assert!(git.created_tags.borrow().is_empty());
    assert!(git.created_branches.borrow().is_empty());
    assert!(git.pushed_tags.borrow().is_empty());
}

#[test]
fn test_mock_backend_is_consistent_with_trait() {
    // sanity: the trait object surface the orchestrator relies on
    let git = MockGit::new("master").with_tags(&["v1.0.0"]);
    let backend: &dyn GitBackend = &git;
    assert_eq!(backend.current_branch().unwrap(), "master");
    assert!(backend.tag_exists("v1.0.0").unwrap());
    assert!(!backend.tag_exists("v2.0.0").unwrap());
}
