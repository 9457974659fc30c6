//! Git operations abstraction layer
//!
//! This module separates raw git access from the tag reconciliation the
//! bumper relies on.
//!
//! # Overview
//!
//! [Backend] is the thin capability boundary: it only runs git operations and
//! hands back their raw text output. The implementations are:
//!
//! - [command::GitCommand]: runs the `git` binary
//! - [repository::Git2Backend]: talks to the repository through `git2`
//! - [mock::MockBackend]: scripted fake that records every invocation
//!
//! [Vcs] is what the bumper consumes. [vcs::GitVcs] implements it on top of
//! any [Backend] and refuses to report tags unless local and remote agree.
//!
//! ```rust
//! # use bumpversion::git::{GitVcs, MockBackend, Vcs};
//! # fn example() -> bumpversion::Result<()> {
//! let backend = MockBackend::new()
//!     .with_local_tags(&["v0.1.0", "v1.0.0"])
//!     .with_remote_tags(&["v1.0.0", "v0.1.0"]);
//! let vcs = GitVcs::new(backend, "origin")?;
//! assert_eq!(vcs.tags()?.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod mock;
pub mod repository;
pub mod vcs;

pub use command::GitCommand;
pub use mock::{Invocation, MockBackend};
pub use repository::Git2Backend;
pub use vcs::GitVcs;

use crate::domain::Version;
use crate::error::Result;

/// Raw git capability consumed by [GitVcs]
///
/// Listing operations return the tool's text output untouched; interpreting
/// it is left to [crate::domain::parse_versions].
///
/// ## Error Handling
///
/// Implementations map their failures onto [crate::error::BumpError]:
/// `NotARepository` and `NoRemote` from the checks, `Tag` from
/// [Backend::create_tag], `Push` from [Backend::push_tags] and `Command` for
/// anything else.
pub trait Backend {
    /// Verify the working location is inside a git repository
    fn check_repository(&self) -> Result<()>;

    /// Verify `remote` is registered in the repository
    fn check_remote(&self, remote: &str) -> Result<()>;

    /// List local tags, one per line (`git tag --list`)
    fn list_local_tags(&self) -> Result<String>;

    /// List tags advertised by `remote` (`git ls-remote --tags <remote>`)
    ///
    /// Lines look like `<oid>\trefs/tags/<name>`.
    fn list_remote_tags(&self, remote: &str) -> Result<String>;

    /// Create a lightweight tag named `name` at the current revision
    ///
    /// Fails if a tag with that name already exists.
    fn create_tag(&self, name: &str) -> Result<()>;

    /// Push every local tag to `remote`
    fn push_tags(&self, remote: &str) -> Result<()>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn check_repository(&self) -> Result<()> {
        (**self).check_repository()
    }

    fn check_remote(&self, remote: &str) -> Result<()> {
        (**self).check_remote(remote)
    }

    fn list_local_tags(&self) -> Result<String> {
        (**self).list_local_tags()
    }

    fn list_remote_tags(&self, remote: &str) -> Result<String> {
        (**self).list_remote_tags(remote)
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        (**self).create_tag(name)
    }

    fn push_tags(&self, remote: &str) -> Result<()> {
        (**self).push_tags(remote)
    }
}

/// Minimal version-control capability used by the bumper
pub trait Vcs {
    /// Version tags sorted ascending, provided local and remote agree
    ///
    /// Fails with [crate::error::BumpError::TagsDiffer] otherwise.
    fn tags(&self) -> Result<Vec<Version>>;

    /// Tag the current revision with the canonical form of `version`
    fn tag(&self, version: &Version) -> Result<()>;

    /// Publish local tags to the remote
    fn push(&self) -> Result<()>;
}
