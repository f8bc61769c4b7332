//! The publish workflow.
//!
//! A run validates the source repository, clones the package's repository,
//! replaces the clone's tracked contents with the freshly packaged files on a
//! throwaway branch, commits, tags, and pushes the tags. Steps run strictly in
//! [`PublishStep`] order. Purge, Tag and Push fan out over independent
//! subprocesses or file deletions and fail on the first error without
//! cancelling work already started. Nothing leaves the machine before Push.
//!
//! The clone directory belongs to the running workflow alone: a stale
//! directory at the destination is deleted at Clone, so two runs must never
//! share a work directory.

mod plan;
mod step;

pub use plan::{InstallRef, PublishOptions, PublishOutcome, PublishPlan};
pub use step::{PublishStep, WorkflowObserver};

use std::path::Path;

use chrono::Utc;
use futures::future::try_join_all;
use tracing::{debug, info, warn};

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{current_user, resolve_tags, tag_collisions, temp_branch_name, TagPattern};
use crate::error::{Result, ValidationError};
use crate::git::{BranchName, Repository, ORIGIN};
use crate::manifest::{install_reference, resolve_repository_url, PackageManifest};
use crate::package::Packager;

pub struct PublishWorkflow<P, O = ()> {
    config: Config,
    packager: P,
    observer: O,
}

impl<P: Packager> PublishWorkflow<P, ()> {
    pub fn new(config: Config, packager: P) -> Self {
        PublishWorkflow {
            config,
            packager,
            observer: (),
        }
    }
}

impl<P: Packager, O: WorkflowObserver> PublishWorkflow<P, O> {
    /// Report progress to `observer` instead.
    pub fn with_observer<O2: WorkflowObserver>(self, observer: O2) -> PublishWorkflow<P, O2> {
        PublishWorkflow {
            config: self.config,
            packager: self.packager,
            observer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate `source` against `options` and run the whole workflow.
    pub async fn run(&self, source: &Repository, options: &PublishOptions) -> Result<PublishOutcome> {
        let plan = self.validate(source, options).await?;
        self.execute(&plan).await
    }

    /// The Validate state: check every precondition and build the plan.
    ///
    /// Requires a clean working tree, a manifest version, a repository url, a
    /// non-empty tag set, and no requested tag already present in `source` or
    /// published at the repository url. Runs no mutating command.
    pub async fn validate(&self, source: &Repository, options: &PublishOptions) -> Result<PublishPlan> {
        self.enter(PublishStep::Validate);

        let (modified, untracked) =
            tokio::try_join!(source.modified_files(), source.untracked_files())?;
        if !modified.is_empty() || !untracked.is_empty() {
            return Err(ValidationError::DirtyWorkingTree {
                modified,
                untracked,
            }
            .into());
        }

        let manifest = PackageManifest::load(source.path())?;
        let version = manifest.version()?;

        let version_tag = if options.tag_version {
            Some(TagPattern::new(self.config.tags.version_pattern.as_str())?.format(version))
        } else {
            None
        };

        let tags = resolve_tags(&options.tags, version_tag);
        if tags.is_empty() {
            return Err(ValidationError::EmptyTagSet.into());
        }

        let url = resolve_repository_url(&manifest.repository_url()?, source.path());
        let (local, published) = tokio::try_join!(source.tags(), source.remote_tags(&url))?;
        let existing: Vec<String> = local.into_iter().chain(published).collect();
        let collisions = tag_collisions(&tags, &existing);
        if !collisions.is_empty() {
            return Err(ValidationError::TagCollision { tags: collisions }.into());
        }

        debug!(?tags, %url, dry_run = options.dry_run, "publish plan validated");
        Ok(PublishPlan {
            tags,
            dry_run: options.dry_run,
            url,
            source: source.clone(),
            manifest,
        })
    }

    /// Drive a validated plan from Clone to its terminal state.
    pub async fn execute(&self, plan: &PublishPlan) -> Result<PublishOutcome> {
        self.enter(PublishStep::Clone);
        let url = plan.url.as_str();
        let clone = self.clone_target(url).await?;

        self.enter(PublishStep::CheckoutRevision);
        let source_revision = plan.source.current_commit_hash().await?;
        clone.checkout_commit(&source_revision).await?;

        self.enter(PublishStep::CreateTempBranch);
        let branch_name = temp_branch_name(
            &self.config.publish.branch_prefix,
            &current_user(),
            Utc::now(),
        );
        let branch = BranchName::create(&clone, branch_name, None).await?;
        clone.checkout_branch(&branch, true).await?;

        self.enter(PublishStep::Purge);
        let tracked = clone.files().await?;
        try_join_all(tracked.iter().map(|path| tokio::fs::remove_file(path))).await?;
        let pruned = clone.prune().await?;
        debug!(removed = tracked.len(), pruned, "working tree purged");

        self.enter(PublishStep::Republish);
        let copied = self
            .packager
            .pack_into(plan.source.path(), clone.path())
            .await?;
        if copied.is_empty() {
            self.warn(BoundaryWarning::EmptyPackage {
                source: plan.source.path().to_path_buf(),
            });
        }

        self.enter(PublishStep::Commit);
        clone.stage_all().await?;
        clone.commit(&self.config.publish.commit_message).await?;
        let revision = clone.current_commit_hash().await?;

        self.enter(PublishStep::Tag);
        self.create_tags(&clone, plan.tags()).await?;

        if plan.dry_run {
            self.enter(PublishStep::DryRunStop);
            return Ok(PublishOutcome::DryRun {
                clone_dir: clone.path().to_path_buf(),
                tags: plan.tags.clone(),
                revision,
            });
        }

        self.enter(PublishStep::Push);
        // each tag name was checked unique up front; force only settles races
        try_join_all(
            plan.tags
                .iter()
                .map(|tag| clone.push_tag(tag, ORIGIN, true)),
        )
        .await?;

        self.enter(PublishStep::Done);
        let install_refs = plan
            .tags
            .iter()
            .map(|tag| InstallRef {
                tag: tag.clone(),
                reference: install_reference(url, tag),
            })
            .collect();

        if !self.config.publish.keep_clone {
            self.discard_clone(clone.path()).await;
        }

        Ok(PublishOutcome::Published {
            revision,
            install_refs,
        })
    }

    async fn clone_target(&self, url: &str) -> Result<Repository> {
        let work_dir = self.config.publish.work_dir();
        let destination = Repository::clone_destination(url, &work_dir)?;

        if let Ok(metadata) = tokio::fs::symlink_metadata(&destination).await {
            if metadata.is_dir() {
                tokio::fs::remove_dir_all(&destination).await?;
            } else {
                tokio::fs::remove_file(&destination).await?;
            }
            self.warn(BoundaryWarning::StaleCloneRemoved { path: destination });
        }

        let clone = Repository::clone(url, &work_dir).await?;
        Ok(clone.with_ref_name_check(self.config.validation.ref_names))
    }

    async fn create_tags(&self, clone: &Repository, tags: &[String]) -> Result<()> {
        // tags pushed since Validate show up in the clone; never shadow one
        let collisions = tag_collisions(tags, &clone.tags().await?);
        if !collisions.is_empty() {
            return Err(ValidationError::TargetTagCollision { tags: collisions }.into());
        }

        let annotated = self.config.tags.annotated;
        try_join_all(tags.iter().map(|tag| async move {
            let message = self.config.tags.message_for(tag);
            clone.create_tag(tag, message.as_deref(), annotated).await
        }))
        .await?;
        Ok(())
    }

    async fn discard_clone(&self, path: &Path) {
        if let Err(e) = tokio::fs::remove_dir_all(path).await {
            warn!(path = %path.display(), error = %e, "could not remove clone");
        }
    }

    fn enter(&self, step: PublishStep) {
        info!(%step, "entering step");
        self.observer.step_started(step);
    }

    fn warn(&self, warning: BoundaryWarning) {
        warn!(%warning, "boundary warning");
        self.observer.warning(&warning);
    }
}
