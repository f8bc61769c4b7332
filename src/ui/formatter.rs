//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from the
//! workflow itself. Functions here only print.

use std::path::Path;

use console::style;

use crate::boundary::BoundaryWarning;
use crate::workflow::{InstallRef, PublishStep};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Announce a workflow step as it starts.
pub fn display_step(step: PublishStep) {
    display_status(&format!("{}...", step.description()));
}

/// Display a boundary warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Summarise a published run: the new revision and one install reference
/// per tag.
pub fn display_published(revision: &str, install_refs: &[InstallRef]) {
    println!(
        "\n{} Published revision {}",
        style("✓").green(),
        style(short_hash(revision)).bold()
    );
    println!("{}", style("Install with:").underlined());
    for install in install_refs {
        println!("  {}", style(&install.reference).cyan());
    }
}

/// Summarise a dry run: where the clone is and which tags exist there.
pub fn display_dry_run(clone_dir: &Path, tags: &[String]) {
    println!(
        "\n{} Dry run: nothing was pushed",
        style("✓").green()
    );
    println!("  Clone: {}", style(clone_dir.display()).cyan());
    println!("  Tags created locally: {}", tags.join(", "));
    println!(
        "\n{} To publish, push the tags from the clone:\n  {}",
        style("→").yellow(),
        style(format!("git -C {} push origin --tags", clone_dir.display())).cyan()
    );
}

/// Display where a standalone archive was written.
pub fn display_archive(path: &Path) {
    display_success(&format!("Wrote package archive {}", path.display()));
}

/// First seven characters of a revision.
pub fn short_hash(revision: &str) -> &str {
    revision.get(..7).unwrap_or(revision)
}
