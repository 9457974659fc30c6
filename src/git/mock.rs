use crate::error::{BumpError, Result};
use crate::git::Backend;
use std::cell::RefCell;
use std::path::PathBuf;

/// A call made against [MockBackend], in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    CheckRepository,
    CheckRemote(String),
    ListLocalTags,
    ListRemoteTags(String),
    CreateTag(String),
    PushTags(String),
}

/// Mock backend for testing without a real repository
///
/// Holds local and remote tag names in memory, creates tags locally and
/// copies them to the remote on push. Every call is recorded.
pub struct MockBackend {
    is_repository: bool,
    remotes: Vec<String>,
    local_tags: RefCell<Vec<String>>,
    remote_tags: RefCell<Vec<String>>,
    remote_listing: Option<String>,
    fail_tag: bool,
    fail_push: bool,
    invocations: RefCell<Vec<Invocation>>,
}

impl MockBackend {
    /// Create an empty repository with an `origin` remote
    pub fn new() -> Self {
        MockBackend {
            is_repository: true,
            remotes: vec!["origin".to_string()],
            local_tags: RefCell::new(Vec::new()),
            remote_tags: RefCell::new(Vec::new()),
            remote_listing: None,
            fail_tag: false,
            fail_push: false,
            invocations: RefCell::new(Vec::new()),
        }
    }

    /// Behave as if started outside a repository
    pub fn without_repository(mut self) -> Self {
        self.is_repository = false;
        self
    }

    /// Register another remote
    pub fn with_remote(mut self, name: impl Into<String>) -> Self {
        self.remotes.push(name.into());
        self
    }

    pub fn with_local_tags(self, tags: &[&str]) -> Self {
        self.local_tags
            .borrow_mut()
            .extend(tags.iter().map(|t| t.to_string()));
        self
    }

    pub fn with_remote_tags(self, tags: &[&str]) -> Self {
        self.remote_tags
            .borrow_mut()
            .extend(tags.iter().map(|t| t.to_string()));
        self
    }

    /// Return `listing` verbatim from [Backend::list_remote_tags]
    pub fn with_remote_listing(mut self, listing: impl Into<String>) -> Self {
        self.remote_listing = Some(listing.into());
        self
    }

    /// Make [Backend::create_tag] fail
    pub fn failing_tag(mut self) -> Self {
        self.fail_tag = true;
        self
    }

    /// Make [Backend::push_tags] fail
    pub fn failing_push(mut self) -> Self {
        self.fail_push = true;
        self
    }

    /// Calls recorded so far
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    pub fn local_tags(&self) -> Vec<String> {
        self.local_tags.borrow().clone()
    }

    pub fn remote_tags(&self) -> Vec<String> {
        self.remote_tags.borrow().clone()
    }

    fn record(&self, invocation: Invocation) {
        self.invocations.borrow_mut().push(invocation);
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for MockBackend {
    fn check_repository(&self) -> Result<()> {
        self.record(Invocation::CheckRepository);
        if self.is_repository {
            Ok(())
        } else {
            Err(BumpError::NotARepository(PathBuf::from("mock")))
        }
    }

    fn check_remote(&self, remote: &str) -> Result<()> {
        self.record(Invocation::CheckRemote(remote.to_string()));
        if self.remotes.iter().any(|r| r == remote) {
            Ok(())
        } else {
            Err(BumpError::NoRemote(remote.to_string()))
        }
    }

    fn list_local_tags(&self) -> Result<String> {
        self.record(Invocation::ListLocalTags);
        Ok(self.local_tags.borrow().join("\n"))
    }

    fn list_remote_tags(&self, remote: &str) -> Result<String> {
        self.record(Invocation::ListRemoteTags(remote.to_string()));
        if let Some(listing) = &self.remote_listing {
            return Ok(listing.clone());
        }
        Ok(self
            .remote_tags
            .borrow()
            .iter()
            .map(|tag| format!("{}\trefs/tags/{}", "0".repeat(40), tag))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        self.record(Invocation::CreateTag(name.to_string()));
        if self.fail_tag {
            return Err(BumpError::tag(format!("cannot create tag '{}'", name)));
        }
        let mut tags = self.local_tags.borrow_mut();
        if tags.iter().any(|t| t == name) {
            return Err(BumpError::tag(format!("tag '{}' already exists", name)));
        }
        tags.push(name.to_string());
        Ok(())
    }

    fn push_tags(&self, remote: &str) -> Result<()> {
        self.record(Invocation::PushTags(remote.to_string()));
        if self.fail_push {
            return Err(BumpError::push(format!("cannot reach remote '{}'", remote)));
        }
        let local = self.local_tags.borrow();
        let mut published = self.remote_tags.borrow_mut();
        for tag in local.iter() {
            if !published.contains(tag) {
                published.push(tag.clone());
            }
        }
        Ok(())
    }
}
