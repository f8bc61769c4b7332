use std::fmt;

use crate::boundary::BoundaryWarning;

/// States of a publish run, in the order they are entered.
///
/// `DryRunStop` and `Done` are terminal; any failure aborts from whichever
/// state was active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublishStep {
    Validate,
    Clone,
    CheckoutRevision,
    CreateTempBranch,
    Purge,
    Republish,
    Commit,
    Tag,
    DryRunStop,
    Push,
    Done,
}

impl PublishStep {
    /// Short human-readable description, used for progress output.
    pub fn description(&self) -> &'static str {
        match self {
            PublishStep::Validate => "Validating source repository",
            PublishStep::Clone => "Cloning target repository",
            PublishStep::CheckoutRevision => "Checking out source revision",
            PublishStep::CreateTempBranch => "Creating temporary branch",
            PublishStep::Purge => "Removing tracked files",
            PublishStep::Republish => "Copying package contents",
            PublishStep::Commit => "Committing",
            PublishStep::Tag => "Creating tags",
            PublishStep::DryRunStop => "Stopping before push (dry run)",
            PublishStep::Push => "Pushing tags",
            PublishStep::Done => "Done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PublishStep::DryRunStop | PublishStep::Done)
    }
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PublishStep::Validate => "validate",
            PublishStep::Clone => "clone",
            PublishStep::CheckoutRevision => "checkout-revision",
            PublishStep::CreateTempBranch => "create-temp-branch",
            PublishStep::Purge => "purge",
            PublishStep::Republish => "republish",
            PublishStep::Commit => "commit",
            PublishStep::Tag => "tag",
            PublishStep::DryRunStop => "dry-run-stop",
            PublishStep::Push => "push",
            PublishStep::Done => "done",
        };
        f.write_str(name)
    }
}

/// Receives progress notifications from a running workflow.
pub trait WorkflowObserver: Send + Sync {
    fn step_started(&self, _step: PublishStep) {}

    fn warning(&self, _warning: &BoundaryWarning) {}
}

/// Silent observer.
impl WorkflowObserver for () {}

impl<O: WorkflowObserver + ?Sized> WorkflowObserver for &O {
    fn step_started(&self, step: PublishStep) {
        (**self).step_started(step)
    }

    fn warning(&self, warning: &BoundaryWarning) {
        (**self).warning(warning)
    }
}
