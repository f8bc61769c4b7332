use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use git_republish::cli::{run_pack, run_publish_workflow, PublishWorkflowArgs};
use git_republish::config;
use git_republish::ui;

#[derive(clap::Parser)]
#[command(
    name = "git-republish",
    version,
    about = "Publish a package's contents as tagged commits of its git repository"
)]
struct Args {
    #[arg(default_value = ".", help = "Package root (a git working tree)")]
    source: PathBuf,

    #[arg(short, long = "tag", value_name = "NAME", help = "Tag to create and push (repeatable)")]
    tags: Vec<String>,

    #[arg(long, help = "Also tag with the manifest version")]
    tag_version: bool,

    #[arg(long, help = "Stop before pushing; keep the clone for inspection")]
    dry_run: bool,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, value_name = "DIR", help = "Only write the package archive into DIR")]
    pack: Option<PathBuf>,

    #[arg(short, long, help = "Log workflow details to stderr")]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?;

    if let Some(output_dir) = args.pack {
        let archive = run_pack(&args.source, &output_dir, config).await?;
        ui::display_archive(&archive);
        return Ok(());
    }

    let outcome = run_publish_workflow(
        PublishWorkflowArgs {
            source: args.source,
            tags: args.tags,
            tag_version: args.tag_version,
            dry_run: args.dry_run,
        },
        config,
    )
    .await?;

    ui::display_outcome(&outcome);
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "git_republish=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
