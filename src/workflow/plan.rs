use std::path::PathBuf;

use crate::git::Repository;
use crate::manifest::PackageManifest;

/// What the operator asked for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishOptions {
    /// Explicit tags, in the order given
    pub tags: Vec<String>,

    /// Also apply the tag derived from the manifest version
    pub tag_version: bool,

    /// Stop before pushing
    pub dry_run: bool,
}

/// A validated publish request. Only [`super::PublishWorkflow::validate`]
/// builds one, and nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct PublishPlan {
    pub(super) tags: Vec<String>,
    pub(super) dry_run: bool,
    pub(super) url: String,
    pub(super) source: Repository,
    pub(super) manifest: PackageManifest,
}

impl PublishPlan {
    /// Tags to create, deduplicated and absent from both the source
    /// repository and the published one.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Url of the repository the package is republished to.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn source(&self) -> &Repository {
        &self.source
    }

    pub fn manifest(&self) -> &PackageManifest {
        &self.manifest
    }
}

/// Install reference for one published tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRef {
    pub tag: String,
    pub reference: String,
}

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Tags exist in the clone only; nothing was pushed
    DryRun {
        clone_dir: PathBuf,
        tags: Vec<String>,
        revision: String,
    },
    /// Tags were pushed to `origin`
    Published {
        revision: String,
        install_refs: Vec<InstallRef>,
    },
}

impl PublishOutcome {
    /// The commit the tags point at.
    pub fn revision(&self) -> &str {
        match self {
            PublishOutcome::DryRun { revision, .. } => revision,
            PublishOutcome::Published { revision, .. } => revision,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, PublishOutcome::DryRun { .. })
    }
}
