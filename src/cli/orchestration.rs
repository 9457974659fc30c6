//! Bump workflow orchestration
//!
//! Holds the bump logic proper ([Bumper]) and the wiring that turns CLI
//! arguments plus configuration into a concrete backend. `main.rs` only
//! parses arguments and prints the outcome.

use std::path::PathBuf;

use crate::config::{BackendKind, Config};
use crate::domain::{Segment, Version};
use crate::error::{BumpError, Result};
use crate::git::{Backend, Git2Backend, GitCommand, GitVcs, Vcs};

/// Segment selectors as given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentSelection {
    pub major: bool,
    pub minor: bool,
    pub patch: bool,
}

impl SegmentSelection {
    /// The single selected segment
    ///
    /// # Returns
    /// * `Ok(Segment)` - Exactly one selector was given
    /// * `Err(Usage)` - None, or more than one
    pub fn segment(&self) -> Result<Segment> {
        let selected: Vec<Segment> = [
            (self.major, Segment::Major),
            (self.minor, Segment::Minor),
            (self.patch, Segment::Patch),
        ]
        .into_iter()
        .filter_map(|(on, segment)| on.then_some(segment))
        .collect();

        match selected.as_slice() {
            [segment] => Ok(*segment),
            [] => Err(BumpError::usage(
                "choose a version to bump: --major, --minor or --patch",
            )),
            _ => Err(BumpError::usage("choose exactly one version to bump")),
        }
    }
}

impl From<Segment> for SegmentSelection {
    fn from(segment: Segment) -> Self {
        SegmentSelection {
            major: segment == Segment::Major,
            minor: segment == Segment::Minor,
            patch: segment == Segment::Patch,
        }
    }
}

/// Outcome of [Bumper::plan]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BumpPlan {
    /// Latest version tag, or `v0.0.0` when there is none
    pub current: Version,
    /// Version that will be tagged
    pub next: Version,
    /// No version tag existed before
    pub initial: bool,
}

/// Computes the next version from the repository's tags and publishes it
pub struct Bumper<V: Vcs> {
    vcs: V,
}

impl<V: Vcs> Bumper<V> {
    pub fn new(vcs: V) -> Self {
        Bumper { vcs }
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    /// Work out the next version without touching the repository
    pub fn plan(&self, segment: Segment) -> Result<BumpPlan> {
        let tags = self.vcs.tags()?;
        let latest = tags.into_iter().max();
        let current = latest.unwrap_or(Version::ZERO);
        let next = current.bump(segment)?;
        tracing::info!("bumping {} of {} to {}", segment, current, next);

        Ok(BumpPlan {
            current,
            next,
            initial: latest.is_none(),
        })
    }

    /// Tag the next version and push it, returning its canonical form
    ///
    /// Stops at the first failure. A tag created before a failed push is left
    /// in place.
    pub fn bump(&self, segment: Segment) -> Result<String> {
        let plan = self.plan(segment)?;
        self.apply(&plan)
    }

    /// Tag `plan.next` and push tags to the remote
    pub fn apply(&self, plan: &BumpPlan) -> Result<String> {
        self.vcs.tag(&plan.next)?;
        tracing::info!("created tag {}", plan.next);
        self.vcs.push()?;
        tracing::info!("pushed tags");
        Ok(plan.next.to_string())
    }
}

/// Arguments for the bump workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// This decoupling allows the workflow to be called programmatically
/// without depending on clap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BumpWorkflowArgs {
    pub selection: SegmentSelection,

    /// Directory to run in, defaulting to the current one
    pub directory: Option<PathBuf>,

    /// Remote overriding the configured one
    pub remote: Option<String>,

    /// Compute the version only, without tagging or pushing
    pub dry_run: bool,
}

/// Result of a successful bump workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Canonical form of the new version
    pub tag: String,

    /// Version the bump started from, `None` if there was no version tag
    pub previous: Option<Version>,

    /// Remote the tags were reconciled with
    pub remote: String,

    /// Whether the tag was created and pushed
    pub pushed: bool,
}

/// Open the backend chosen in the configuration, rooted at `directory`
pub fn open_backend(config: &Config, directory: PathBuf) -> Result<Box<dyn Backend>> {
    match config.backend {
        BackendKind::Git => Ok(Box::new(GitCommand::with_program(
            config.git.program.clone(),
            directory,
        )?)),
        BackendKind::Libgit2 => Ok(Box::new(Git2Backend::open(directory)?)),
    }
}

/// Main bump workflow
///
/// 1. Resolve the segment to bump (before any git interaction)
/// 2. Open the configured backend and check repository and remote
/// 3. Reconcile local and remote tags and compute the next version
/// 4. Unless `dry_run`, tag and push
pub fn run_bump_workflow(args: BumpWorkflowArgs, config: &Config) -> Result<WorkflowResult> {
    let segment = args.selection.segment()?;

    let directory = match args.directory {
        Some(directory) => directory,
        None => std::env::current_dir()?,
    };
    let remote = args.remote.unwrap_or_else(|| config.git.remote.clone());

    let backend = open_backend(config, directory)?;
    let bumper = Bumper::new(GitVcs::new(backend, remote.clone())?);

    let plan = bumper.plan(segment)?;
    let tag = if args.dry_run {
        plan.next.to_string()
    } else {
        bumper.apply(&plan)?
    };

    Ok(WorkflowResult {
        tag,
        previous: (!plan.initial).then_some(plan.current),
        remote,
        pushed: !args.dry_run,
    })
}
