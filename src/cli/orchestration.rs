//! Glue between parsed command-line arguments and the library.
//!
//! Nothing here depends on clap, so the same entry points can be driven
//! programmatically (the integration tests do).

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use crate::config::Config;
use crate::git::Repository;
use crate::package::{GitPackager, Packager};
use crate::ui::ConsoleReporter;
use crate::workflow::{PublishOptions, PublishOutcome, PublishWorkflow};

/// Arguments for the publish workflow
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PublishWorkflowArgs {
    /// Package root; must be a git working tree
    pub source: PathBuf,

    /// Explicit tags, in command-line order
    pub tags: Vec<String>,

    /// Also tag with the manifest version
    pub tag_version: bool,

    /// Stop before pushing
    pub dry_run: bool,
}

impl PublishWorkflowArgs {
    fn options(&self) -> PublishOptions {
        PublishOptions {
            tags: self.tags.clone(),
            tag_version: self.tag_version,
            dry_run: self.dry_run,
        }
    }
}

/// Run the publish workflow for `args.source`, reporting progress on the
/// terminal.
pub async fn run_publish_workflow(args: PublishWorkflowArgs, config: Config) -> Result<PublishOutcome> {
    let source = open_source(&args.source, &config)?;
    debug!(source = %source.path().display(), "source repository opened");

    let packager = GitPackager::new(&config.package);
    let workflow = PublishWorkflow::new(config, packager).with_observer(ConsoleReporter);
    let outcome = workflow.run(&source, &args.options()).await?;
    Ok(outcome)
}

/// Write the package selection of `source` as a `.tgz` into `output_dir`.
pub async fn run_pack(source: &Path, output_dir: &Path, config: Config) -> Result<PathBuf> {
    let source = open_source(source, &config)?;
    let packager = GitPackager::new(&config.package);
    let archive = packager.pack_archive(source.path(), output_dir).await?;
    Ok(archive)
}

fn open_source(path: &Path, config: &Config) -> crate::Result<Repository> {
    Ok(Repository::from_directory(path)?.with_ref_name_check(config.validation.ref_names))
}
