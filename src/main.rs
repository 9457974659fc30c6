use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use bumpversion::cli::{run_bump_workflow, BumpWorkflowArgs, SegmentSelection, WorkflowResult};
use bumpversion::{config, ui};

#[derive(clap::Parser)]
#[command(
    name = "bumpversion",
    version,
    about = "Bump a semantic version git tag and push it once local and remote tags agree"
)]
struct Args {
    #[arg(long, help = "Bump major version")]
    major: bool,

    #[arg(long, help = "Bump minor version")]
    minor: bool,

    #[arg(long, help = "Bump patch version")]
    patch: bool,

    #[arg(
        short = 'C',
        long,
        value_name = "PATH",
        help = "Run as if started in PATH"
    )]
    directory: Option<PathBuf>,

    #[arg(short, long, help = "Remote to reconcile tags with and push to")]
    remote: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Print the next version without tagging or pushing")]
    dry_run: bool,

    #[arg(short, long, help = "Log git invocations to stderr")]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(result) => ui::display_result(&result),
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<WorkflowResult> {
    let selection = SegmentSelection {
        major: args.major,
        minor: args.minor,
        patch: args.patch,
    };
    // Reject bad selectors before reading any configuration.
    selection.segment()?;

    let directory = match args.directory {
        Some(directory) => directory,
        None => std::env::current_dir().context("failed to resolve current directory")?,
    };
    let config = config::load_config(args.config.as_deref(), &directory)
        .context("failed to load configuration")?;

    let result = run_bump_workflow(
        BumpWorkflowArgs {
            selection,
            directory: Some(directory),
            remote: args.remote,
            dry_run: args.dry_run,
        },
        &config,
    )?;
    Ok(result)
}
