//! User interface module.
//!
//! Everything the operator reads on the terminal goes through here; structured
//! diagnostics go through `tracing` instead.

pub mod formatter;

pub use formatter::{
    display_archive, display_boundary_warning, display_dry_run, display_error, display_published,
    display_status, display_step, display_success, short_hash,
};

use crate::boundary::BoundaryWarning;
use crate::workflow::{PublishOutcome, PublishStep, WorkflowObserver};

/// Observer that prints workflow progress to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl WorkflowObserver for ConsoleReporter {
    fn step_started(&self, step: PublishStep) {
        display_step(step);
    }

    fn warning(&self, warning: &BoundaryWarning) {
        display_boundary_warning(warning);
    }
}

/// Print the terminal summary of a finished run.
pub fn display_outcome(outcome: &PublishOutcome) {
    match outcome {
        PublishOutcome::DryRun {
            clone_dir, tags, ..
        } => display_dry_run(clone_dir, tags),
        PublishOutcome::Published {
            revision,
            install_refs,
        } => display_published(revision, install_refs),
    }
}
