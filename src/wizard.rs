//! Interactive confirmation state machine.
//!
//! Three stages: select a bump type, optionally enter a custom version,
//! confirm the resolved plan. The reducer is pure: selecting an option that
//! needs calculation or preflight checks yields a [Step::Resolve] request,
//! and the driver feeds the result back with [Wizard::into_confirm]. No git
//! call ever happens inside [Wizard::handle].

use crate::bump::{self, ReleasePlan, Request};
use crate::policy::{self, BumpType, PolicyContext};

/// One selectable entry in the bump-type list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub name: &'static str,
    pub bump: BumpType,
    /// Version this option would produce, empty for `custom`
    pub preview: String,
    pub valid: bool,
    /// Why the option is not valid, empty otherwise
    pub note: String,
}

/// Discrete input events the reducer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Up,
    Down,
    Submit,
    /// Escape: back out one stage, or abort from Select/Confirm
    Cancel,
    /// Quit keys: abort from anywhere
    Quit,
    Input(char),
    Backspace,
}

/// Current stage of the wizard
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Select,
    Custom { input: String },
    Confirm { plan: ReleasePlan, warnings: Vec<String> },
}

/// Terminal outcome of an interactive run
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Confirmed { plan: ReleasePlan, warnings: Vec<String> },
    Aborted,
}

/// What the driver should do after feeding an event in
#[derive(Debug, PartialEq)]
pub enum Step {
    /// Render the new state and wait for the next event
    Next(Wizard),
    /// Run calculation + preflights for `request`, then either call
    /// [Wizard::into_confirm] or abort with the resolution error
    Resolve { wizard: Wizard, request: Request },
    Done(Outcome),
}

/// The selection state: option list, cursor, and current stage
#[derive(Debug, Clone, PartialEq)]
pub struct Wizard {
    options: Vec<SelectOption>,
    cursor: usize,
    stage: Stage,
}

/// Build the option list for the current version and branch.
///
/// `rc` and `rc-finalize` lead the list when a candidate is in flight; the
/// standard six bump types follow, with `custom` always last. `branch_exists`
/// is only consulted to phrase the suggestion on invalid options.
pub fn build_options(
    ctx: &PolicyContext,
    branch_exists: impl Fn(&str) -> bool,
) -> Vec<SelectOption> {
    let mut bumps = Vec::with_capacity(9);
    if ctx.current_version.is_rc() {
        bumps.push(BumpType::Rc);
        bumps.push(BumpType::RcFinalize);
    }
    bumps.extend([
        BumpType::Patch,
        BumpType::PatchRc,
        BumpType::Minor,
        BumpType::MinorRc,
        BumpType::Major,
        BumpType::MajorRc,
        BumpType::Custom,
    ]);

    bumps
        .into_iter()
        .map(|bump| {
            let preview = bump::next_version(bump, &ctx.current_version)
                .map(|v| v.to_string())
                .unwrap_or_default();
            let verdict = policy::admissible(bump, ctx);
            let note = match (&verdict.reason, &verdict.suggested_branch) {
                (Some(reason), Some(branch)) => {
                    let hint = if branch_exists(branch) {
                        "switch to it"
                    } else {
                        "create it"
                    };
                    format!("{} ({})", reason, hint)
                }
                (Some(reason), None) => reason.clone(),
                _ => String::new(),
            };
            SelectOption {
                name: bump.as_str(),
                bump,
                preview,
                valid: verdict.allowed,
                note,
            }
        })
        .collect()
}

impl Wizard {
    pub fn new(options: Vec<SelectOption>) -> Self {
        Wizard {
            options,
            cursor: 0,
            stage: Stage::Select,
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Pure reducer: one input event, one new state (or a resolve request)
    pub fn handle(mut self, event: Event) -> Step {
        match self.stage {
            Stage::Select => match event {
                Event::Up => {
                    self.cursor = self.cursor.saturating_sub(1);
                    Step::Next(self)
                }
                Event::Down => {
                    // clamped, no wraparound
                    if self.cursor + 1 < self.options.len() {
                        self.cursor += 1;
                    }
                    Step::Next(self)
                }
                Event::Submit => {
                    let bump = self.options[self.cursor].bump;
                    if bump == BumpType::Custom {
                        self.stage = Stage::Custom {
                            input: String::new(),
                        };
                        Step::Next(self)
                    } else {
                        Step::Resolve {
                            wizard: self,
                            request: Request::Bump(bump),
                        }
                    }
                }
                Event::Cancel | Event::Quit => Step::Done(Outcome::Aborted),
                Event::Input(_) | Event::Backspace => Step::Next(self),
            },
            Stage::Custom { ref mut input } => match event {
                Event::Input(c) => {
                    if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                        input.push(c);
                    }
                    Step::Next(self)
                }
                Event::Backspace => {
                    input.pop();
                    Step::Next(self)
                }
                Event::Submit => {
                    let request = Request::Custom(input.clone());
                    Step::Resolve {
                        wizard: self,
                        request,
                    }
                }
                // the only backward transition in the machine
                Event::Cancel => {
                    self.stage = Stage::Select;
                    Step::Next(self)
                }
                Event::Quit => Step::Done(Outcome::Aborted),
                Event::Up | Event::Down => Step::Next(self),
            },
            Stage::Confirm {
                ref plan,
                ref warnings,
            } => match event {
                Event::Submit => Step::Done(Outcome::Confirmed {
                    plan: plan.clone(),
                    warnings: warnings.clone(),
                }),
                Event::Cancel | Event::Quit => Step::Done(Outcome::Aborted),
                _ => Step::Next(self),
            },
        }
    }

    /// Feed a successful resolution back in, moving to the Confirm stage
    pub fn into_confirm(mut self, plan: ReleasePlan, warnings: Vec<String>) -> Wizard {
        self.stage = Stage::Confirm { plan, warnings };
        self
    }
}
