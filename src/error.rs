use std::path::PathBuf;

use thiserror::Error;

/// Failure of a spawned subprocess.
///
/// Carries the exit status and the captured standard error. When the process
/// could not be started at all (or died from a signal) `exit_code` is
/// [`ProcessError::SPAWN_FAILURE`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("`{command}` exited with status {exit_code}: {stderr}")]
pub struct ProcessError {
    pub command: String,
    pub exit_code: i32,
    pub stderr: String,
}

impl ProcessError {
    /// Sentinel exit code for processes that never produced a status.
    pub const SPAWN_FAILURE: i32 = -1;
}

/// A publish precondition that does not hold. Raised before any mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{}", dirty_summary(.modified, .untracked))]
    DirtyWorkingTree {
        modified: Vec<String>,
        untracked: Vec<String>,
    },

    #[error("package manifest does not declare a version")]
    MissingVersion,

    #[error("no tags requested; pass --tag <name> or --tag-version")]
    EmptyTagSet,

    /// Requested tags that already exist in the source repository or on its
    /// remote
    #[error("tags already exist in the source repository: {}", .tags.join(", "))]
    TagCollision { tags: Vec<String> },

    /// Requested tags that already exist in the cloned target
    #[error("tags already exist in the target repository: {}", .tags.join(", "))]
    TargetTagCollision { tags: Vec<String> },

    #[error("package manifest does not declare a repository url")]
    MissingRepositoryUrl,
}

fn dirty_summary(modified: &[String], untracked: &[String]) -> String {
    let mut summary = String::from("working tree is not clean");
    if !modified.is_empty() {
        summary.push_str("; modified: ");
        summary.push_str(&modified.join(", "));
    }
    if !untracked.is_empty() {
        summary.push_str("; untracked: ");
        summary.push_str(&untracked.join(", "));
    }
    summary
}

/// Unified error type for git-republish operations
#[derive(Error, Debug)]
pub enum RepublishError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Git command failed: {0}")]
    Process(#[from] ProcessError),

    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("Unexpected git output: {0}")]
    Parse(String),

    #[error("Not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-republish
pub type Result<T> = std::result::Result<T, RepublishError>;

impl RepublishError {
    pub fn manifest(msg: impl Into<String>) -> Self {
        RepublishError::Manifest(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        RepublishError::Config(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        RepublishError::Parse(msg.into())
    }

    /// The process failure behind this error, if any
    pub fn as_process(&self) -> Option<&ProcessError> {
        match self {
            RepublishError::Process(e) => Some(e),
            _ => None,
        }
    }
}
