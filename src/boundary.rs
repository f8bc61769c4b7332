use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met while publishing.
/// These are reported to the user but do not stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// A directory from an earlier run occupied the clone destination
    StaleCloneRemoved { path: PathBuf },
    /// The packager selected nothing; the published tree will be empty
    EmptyPackage { source: PathBuf },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::StaleCloneRemoved { path } => {
                write!(f, "Removed stale clone at '{}'", path.display())
            }
            BoundaryWarning::EmptyPackage { source } => {
                write!(
                    f,
                    "Package at '{}' produced no files; publishing an empty tree",
                    source.display()
                )
            }
        }
    }
}
