//! Formatting functions for terminal output.
//!
//! Standard output is reserved for the resulting version so the tool can be
//! used in scripts (`TAG=$(bumpversion --patch)`); everything else goes to
//! standard error.

use console::style;

use crate::cli::orchestration::WorkflowResult;

/// Format an error message as a single line.
///
/// Line breaks inside `message` are folded into spaces.
pub fn format_error(message: &str) -> String {
    let message = message.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{} {}", style("ERROR:").red().bold().for_stderr(), message)
}

/// Print an error message in red on stderr.
pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}

/// Print a status message with a yellow arrow on stderr.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow().for_stderr(), message);
}

/// Print the new version on stdout, unstyled.
pub fn display_version(tag: &str) {
    println!("{}", tag);
}

/// Describe what a dry run would have done.
pub fn format_dry_run(result: &WorkflowResult) -> String {
    let from = match result.previous {
        Some(previous) => previous.to_string(),
        None => "no version tag".to_string(),
    };
    format!(
        "dry run: {} -> {}, would tag and push to '{}'",
        from, result.tag, result.remote
    )
}

/// Report the outcome of a workflow run.
pub fn display_result(result: &WorkflowResult) {
    if !result.pushed {
        display_status(&format_dry_run(result));
    }
    display_version(&result.tag);
}
