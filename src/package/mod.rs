//! Packaging of a source tree into its distributable file set.
//!
//! The publish workflow only depends on the [`Packager`] trait; the shipped
//! implementation is [`GitPackager`], which selects from the files git tracks
//! in the source repository.

pub mod git_packager;

pub use git_packager::GitPackager;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::Result;

/// Produces a package's distributable contents.
#[async_trait]
pub trait Packager: Send + Sync {
    /// Materialise the distributable files of `source` under `destination`.
    ///
    /// Returns the copied paths, relative to `destination`.
    async fn pack_into(&self, source: &Path, destination: &Path) -> Result<Vec<PathBuf>>;

    /// Write a standalone archive of the distributable files into
    /// `output_dir` and return its path.
    async fn pack_archive(&self, source: &Path, output_dir: &Path) -> Result<PathBuf>;
}
