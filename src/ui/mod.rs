//! User interface module - interaction (prompts, key handling) and
//! formatting.
//!
//! - `formatter` - pure rendering functions
//! - this module - the yes/no prompt and the interactive wizard driver
//!
//! The wizard driver owns all terminal I/O and all collaborator calls for
//! the interactive path; the state machine in [crate::wizard] stays pure.

use std::io::{self, Write};

use console::{Key, Term};

pub mod formatter;

pub use formatter::{display_error, display_status, display_success, display_warning};

use crate::bump;
use crate::config::RunConfig;
use crate::error::{Result, Warnings};
use crate::git::GitBackend;
use crate::policy::PolicyContext;
use crate::wizard::{self, Event, Outcome, Stage, Step, Wizard};

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Accepts "y" or "yes" (case-insensitive); default is "no" on Enter.
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("\n{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// Translate a key press into a wizard event, depending on the stage.
///
/// In the custom-entry stage plain characters are input; everywhere else
/// they are shortcuts.
fn map_key(stage: &Stage, key: Key) -> Option<Event> {
    match stage {
        // Escape backs out one stage; Ctrl-C aborts from anywhere, since
        // 'q' is ordinary input while typing a version.
        Stage::Custom { .. } => match key {
            Key::Enter => Some(Event::Submit),
            Key::Escape => Some(Event::Cancel),
            Key::CtrlC => Some(Event::Quit),
            Key::Backspace => Some(Event::Backspace),
            Key::Char(c) => Some(Event::Input(c)),
            _ => None,
        },
        Stage::Select => match key {
            Key::ArrowUp | Key::Char('k') => Some(Event::Up),
            Key::ArrowDown | Key::Char('j') => Some(Event::Down),
            Key::Enter => Some(Event::Submit),
            Key::Escape | Key::CtrlC | Key::Char('q') => Some(Event::Quit),
            _ => None,
        },
        Stage::Confirm { .. } => match key {
            Key::Enter | Key::Char('y') => Some(Event::Submit),
            Key::Escape | Key::CtrlC | Key::Char('n') | Key::Char('q') => Some(Event::Cancel),
            _ => None,
        },
    }
}

fn draw(term: &Term, wizard: &Wizard, ctx: &PolicyContext) -> Result<usize> {
    let lines = match wizard.stage() {
        Stage::Select => formatter::render_select(ctx, wizard.options(), wizard.cursor()),
        Stage::Custom { input } => formatter::render_custom(ctx, input),
        Stage::Confirm { plan, warnings } => formatter::render_confirm(plan, warnings),
    };
    for line in &lines {
        term.write_line(line)?;
    }
    Ok(lines.len())
}

/// Run the interactive confirmation wizard to completion.
///
/// Reads keys one at a time, feeds them through the pure reducer, and
/// performs calculation/preflight calls only when the reducer asks for
/// them. A fatal resolution error ends the run as an error; force mode has
/// already demoted whatever it could inside [bump::resolve].
///
/// `ambient` carries warnings buffered before the wizard started (the
/// environment checks); they are merged into the Confirm stage so the user
/// sees everything force mode tolerated before accepting.
pub fn run_wizard<G: GitBackend>(
    git: &G,
    ctx: &PolicyContext,
    cfg: &RunConfig,
    ambient: &Warnings,
) -> Result<Outcome> {
    let term = Term::stderr();
    let options = wizard::build_options(ctx, |branch| {
        git.branch_exists(branch, &cfg.remote).unwrap_or(false)
    });
    let mut wizard = Wizard::new(options);

    loop {
        let drawn = draw(&term, &wizard, ctx)?;

        let event = loop {
            if let Some(event) = map_key(wizard.stage(), term.read_key()?) {
                break event;
            }
        };

        term.clear_last_lines(drawn)?;

        match wizard.handle(event) {
            Step::Next(next) => wizard = next,
            Step::Resolve { wizard: next, request } => {
                let (plan, resolved) = bump::resolve(&request, ctx, git, cfg)?;
                let mut merged = ambient.clone();
                merged.extend_dedup(resolved);
                wizard = next.into_confirm(plan, merged.into_vec());
            }
            Step::Done(outcome) => return Ok(outcome),
        }
    }
}
