//! Pure rendering helpers for UI output.
//!
//! Functions here build lines of text from state; printing and key handling
//! live in the parent module.

use console::style;

use crate::bump::ReleasePlan;
use crate::policy::PolicyContext;
use crate::wizard::SelectOption;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print a warning message.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// Header line shown above every wizard stage
pub fn render_header(ctx: &PolicyContext) -> String {
    format!(
        "{} {} on branch '{}'",
        style("Current version:").bold(),
        ctx.current_version,
        ctx.current_branch
    )
}

/// Render the bump-type selection list
pub fn render_select(ctx: &PolicyContext, options: &[SelectOption], cursor: usize) -> Vec<String> {
    let mut lines = vec![render_header(ctx), String::new()];

    for (i, option) in options.iter().enumerate() {
        let marker = if i == cursor { "❯" } else { " " };
        let label = format!("{:<12}", option.name);
        let mut line = if option.valid {
            format!("{} {} {}", marker, style(label).bold(), option.preview)
        } else {
            format!(
                "{} {} {}",
                marker,
                style(label).dim(),
                style(&option.preview).dim()
            )
        };
        if !option.valid && i == cursor {
            line.push_str(&format!("  {}", style(&option.note).yellow()));
        }
        lines.push(line);
    }

    lines.push(String::new());
    lines.push(format!(
        "{}",
        style("↑/↓ move · enter select · q quit").dim()
    ));
    lines
}

/// Render the custom-version entry line
pub fn render_custom(ctx: &PolicyContext, input: &str) -> Vec<String> {
    vec![
        render_header(ctx),
        String::new(),
        format!("{} {}_", style("Custom version:").bold(), input),
        String::new(),
        format!("{}", style("enter submit · esc back · ctrl-c quit").dim()),
    ]
}

/// Render the confirmation summary for a resolved plan, without any key
/// legend. Used directly by the scripted path, whose prompt is line-based.
pub fn render_confirm_summary(plan: &ReleasePlan, warnings: &[String]) -> Vec<String> {
    let mut lines = Vec::new();

    for warning in warnings {
        lines.push(format!("{} {}", style("⚠").yellow(), warning));
    }
    if !warnings.is_empty() {
        lines.push(String::new());
    }

    lines.push(format!(
        "{} {} (tag {})",
        style("Release version:").bold(),
        plan.version,
        plan.version.tag_name()
    ));
    if let Some(branch) = &plan.branch_to_create {
        lines.push(format!(
            "{} {}",
            style("Branch to create:").bold(),
            branch
        ));
    }

    lines
}

/// The confirmation summary plus the interactive key legend
pub fn render_confirm(plan: &ReleasePlan, warnings: &[String]) -> Vec<String> {
    let mut lines = render_confirm_summary(plan, warnings);
    lines.push(String::new());
    lines.push(format!("{}", style("y/enter confirm · n abort").dim()));
    lines
}
