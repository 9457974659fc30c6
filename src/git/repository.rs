use crate::error::{BumpError, Result};
use crate::git::Backend;
use git2::{Direction, ErrorCode, Repository as Git2Repo};
use std::cell::RefCell;
use std::fmt::Write as _;
use std::path::Path;

/// [Backend] implemented with `git2`, needing no `git` binary
pub struct Git2Backend {
    repo: Git2Repo,
}

impl Git2Backend {
    /// Open or discover the repository containing `path`
    ///
    /// # Returns
    /// * `Ok(Git2Backend)` - Repository found at or above `path`
    /// * `Err(NotARepository)` - No repository contains `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path).map_err(|e| {
            tracing::debug!("repository discovery failed: {}", e);
            BumpError::NotARepository(path.to_path_buf())
        })?;

        Ok(Git2Backend { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Backend { repo }
    }

    fn find_remote(&self, name: &str) -> Result<git2::Remote<'_>> {
        self.repo
            .find_remote(name)
            .map_err(|_| BumpError::NoRemote(name.to_string()))
    }
}

/// Credentials for network remotes: SSH keys in `~/.ssh`, then the SSH
/// agent, then libgit2's defaults.
fn remote_callbacks<'a>() -> git2::RemoteCallbacks<'a> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");
        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        git2::Cred::default()
    });
    callbacks
}

impl Backend for Git2Backend {
    fn check_repository(&self) -> Result<()> {
        Ok(())
    }

    fn check_remote(&self, remote: &str) -> Result<()> {
        self.find_remote(remote).map(|_| ())
    }

    fn list_local_tags(&self) -> Result<String> {
        let tags = self.repo.tag_names(None)?;
        Ok(tags.iter().flatten().flatten().collect::<Vec<_>>().join("\n"))
    }

    fn list_remote_tags(&self, remote: &str) -> Result<String> {
        let mut remote = self.find_remote(remote)?;
        let connection = remote
            .connect_auth(Direction::Fetch, Some(remote_callbacks()), None)
            .map_err(|e| BumpError::command(format!("Cannot connect to remote: {}", e)))?;

        let mut listing = String::new();
        for head in connection.list()? {
            if head.name().starts_with("refs/tags/") {
                // Infallible: writing into a String.
                let _ = writeln!(listing, "{}\t{}", head.oid(), head.name());
            }
        }
        Ok(listing)
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        let head = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| BumpError::tag(format!("Cannot resolve HEAD: {}", e)))?;

        match self.repo.tag_lightweight(name, head.as_object(), false) {
            Ok(_) => Ok(()),
            Err(e) if e.code() == ErrorCode::Exists => {
                Err(BumpError::tag(format!("tag '{}' already exists", name)))
            }
            Err(e) => Err(BumpError::tag(format!("Cannot create tag: {}", e))),
        }
    }

    fn push_tags(&self, remote_name: &str) -> Result<()> {
        let mut remote = self.find_remote(remote_name)?;

        let refspecs: Vec<String> = self
            .repo
            .tag_names(None)?
            .iter()
            .flatten()
            .flatten()
            .map(|tag| format!("refs/tags/{}:refs/tags/{}", tag, tag))
            .collect();
        if refspecs.is_empty() {
            return Ok(());
        }

        let rejected = RefCell::new(Vec::new());
        let mut callbacks = remote_callbacks();
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                rejected
                    .borrow_mut()
                    .push(format!("{} ({})", refname, status));
            }
            Ok(())
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        remote
            .push(&refspecs, Some(&mut push_options))
            .map_err(|e| match e.class() {
                git2::ErrorClass::Net => BumpError::push(format!("Network error: {}", e)),
                _ => BumpError::push(e.message().to_string()),
            })?;
        drop(push_options);

        let rejected = rejected.into_inner();
        if !rejected.is_empty() {
            return Err(BumpError::push(format!(
                "{} rejected {}",
                remote_name,
                rejected.join(", ")
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_with_commit(dir: &Path) -> Git2Repo {
        let repo = Git2Repo::init(dir).unwrap();
        {
            let signature = git2::Signature::now("Test", "test@example.com").unwrap();
            let tree_id = repo.index().unwrap().write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            repo.commit(Some("HEAD"), &signature, &signature, "initial", &tree, &[])
                .unwrap();
        }
        repo
    }

    #[test]
    fn test_open_outside_repository() {
        let dir = TempDir::new().unwrap();
        match Git2Backend::open(dir.path()) {
            Err(BumpError::NotARepository(path)) => assert_eq!(path, dir.path()),
            Err(e) => panic!("expected NotARepository, got {}", e),
            Ok(_) => panic!("expected NotARepository"),
        }
    }

    #[test]
    fn test_unknown_remote() {
        let dir = TempDir::new().unwrap();
        let backend = Git2Backend::from_git2(init_with_commit(dir.path()));
        assert!(matches!(
            backend.check_remote("origin"),
            Err(BumpError::NoRemote(_))
        ));
    }

    #[test]
    fn test_create_and_list_local_tags() {
        let dir = TempDir::new().unwrap();
        let backend = Git2Backend::from_git2(init_with_commit(dir.path()));

        backend.create_tag("v0.1.0").unwrap();
        backend.create_tag("v0.2.0").unwrap();

        let listing = backend.list_local_tags().unwrap();
        let mut tags: Vec<&str> = listing.lines().collect();
        tags.sort();
        assert_eq!(tags, vec!["v0.1.0", "v0.2.0"]);
    }

    #[test]
    fn test_create_existing_tag_fails() {
        let dir = TempDir::new().unwrap();
        let backend = Git2Backend::from_git2(init_with_commit(dir.path()));

        backend.create_tag("v1.0.0").unwrap();
        match backend.create_tag("v1.0.0") {
            Err(BumpError::Tag(msg)) => assert!(msg.contains("already exists")),
            other => panic!("expected Tag error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_tag_without_commits_fails() {
        let dir = TempDir::new().unwrap();
        let backend = Git2Backend::from_git2(Git2Repo::init(dir.path()).unwrap());
        assert!(matches!(backend.create_tag("v0.0.1"), Err(BumpError::Tag(_))));
    }
}
