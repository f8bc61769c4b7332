//! Git repository abstraction built on the `git` executable.
//!
//! Nothing here links against libgit2; every operation is a subprocess run
//! through [`crate::process`]. The pieces are:
//!
//! - [`Repository`]: a working copy plus the operations the publish workflow
//!   needs (state inspection, checkout, staging, commits, tags, pushes)
//! - [`BranchName`]: a validated branch identity and the `git branch -a`
//!   parser that produces trusted ones
//! - [`refname`]: the reference-name grammar checked in-process, an
//!   alternative to asking `git check-ref-format`

pub mod branch;
pub mod refname;
pub mod repository;

pub use branch::{check_ref_format, is_valid_branch_name, parse_branch_listing, BranchName};
pub use repository::{project_name, Repository, GIT_DIR};

/// The remote every clone pushes its tags to.
pub const ORIGIN: &str = "origin";
