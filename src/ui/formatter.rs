use console::style;

use crate::domain::Command;
use crate::exec::SequenceError;

/// Print an error message to stderr with a red "ERROR:" prefix.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Print a success message after a green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Print a status message after a yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Announce a command right before it runs (or would run in a dry run).
pub fn display_command(command: &Command) {
    println!("{} {}", style("=>").cyan().bold(), command);
}

/// Display the start-of-release banner.
///
/// # Arguments
/// * `name` - Package name from `package.json`
/// * `current` - Version the release starts from
/// * `dry_run` - Whether commands are only announced
pub fn display_banner(name: &str, current: &semver::Version, dry_run: bool) {
    println!("\n{}", style(banner(name, current, dry_run)).bold());
}

pub fn banner(name: &str, current: &semver::Version, dry_run: bool) -> String {
    let lead = if dry_run {
        "Dry run release of new version of"
    } else {
        "Releasing a new version of"
    };
    format!("{} `{}` (current version: {})", lead, name, current)
}

/// Display a failed release step and how to finish the release by hand.
///
/// Prints the captured output of the failed command, the failure itself and
/// then every command that still has to run, failed one first.
pub fn display_sequence_failure(error: &SequenceError) {
    if !error.stdout.trim().is_empty() {
        println!("{}", error.stdout.trim_end());
    }
    if !error.stderr.trim().is_empty() {
        eprintln!("{}", error.stderr.trim_end());
    }
    display_error(&error.message);
    eprintln!("\n{}", recovery_text(error));
}

pub fn recovery_text(error: &SequenceError) -> String {
    let mut text = String::from("You can try again by running these commands manually:");
    for command in error.recovery_commands() {
        text.push_str(&format!("\n  {}", command));
    }
    text
}

pub fn display_done() {
    display_success("Done");
}
