use crate::domain::{TagSet, Version};
use crate::error::{BumpError, Result};
use crate::git::{Backend, Vcs};

/// [Vcs] over a git [Backend], bound to a single remote
pub struct GitVcs<B: Backend> {
    backend: B,
    remote: String,
}

impl<B: Backend> GitVcs<B> {
    /// Wrap `backend`, checking the repository and `remote` up front
    ///
    /// # Returns
    /// * `Ok(GitVcs)` - Repository and remote both exist
    /// * `Err(NotARepository)` - Working location is not a git repository
    /// * `Err(NoRemote)` - `remote` is not registered
    pub fn new(backend: B, remote: impl Into<String>) -> Result<Self> {
        let remote = remote.into();
        backend.check_repository()?;
        backend.check_remote(&remote)?;
        Ok(GitVcs { backend, remote })
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: Backend> Vcs for GitVcs<B> {
    fn tags(&self) -> Result<Vec<Version>> {
        let local = TagSet::parse(&self.backend.list_local_tags()?)?;
        let remote = TagSet::parse(&self.backend.list_remote_tags(&self.remote)?)?;
        tracing::debug!(
            local = local.len(),
            remote = remote.len(),
            "reconciling version tags with '{}'",
            self.remote
        );

        if !local.is_consistent_with(&remote) {
            let (local_only, remote_only) = local.difference(&remote);
            return Err(BumpError::TagsDiffer {
                local_only,
                remote_only,
            });
        }
        Ok(local.into_vec())
    }

    fn tag(&self, version: &Version) -> Result<()> {
        self.backend.create_tag(&version.to_string())
    }

    fn push(&self) -> Result<()> {
        self.backend.push_tags(&self.remote)
    }
}
