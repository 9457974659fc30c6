// Shared fixture: a working repository with an `origin` remote pointing at a
// bare repository, both built with git2 so no git binary is needed.
#![allow(dead_code)]

use git2::Repository;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Fixture {
    dir: TempDir,
    pub work: PathBuf,
    pub remote: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let remote = dir.path().join("remote.git");
        Repository::init_bare(&remote).unwrap();

        let work = dir.path().join("work");
        let repo = Repository::init(&work).unwrap();
        {
            let signature = git2::Signature::now("Test", "test@example.com").unwrap();
            let tree_id = repo.index().unwrap().write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            repo.commit(Some("HEAD"), &signature, &signature, "initial", &tree, &[])
                .unwrap();
        }
        repo.remote("origin", remote.to_str().unwrap()).unwrap();

        Fixture { dir, work, remote }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    fn repo(&self) -> Repository {
        Repository::open(&self.work).unwrap()
    }

    /// Create tags in the working repository only
    pub fn tag_local(&self, names: &[&str]) {
        let repo = self.repo();
        let head = repo.head().unwrap().peel_to_commit().unwrap();
        for name in names {
            repo.tag_lightweight(name, head.as_object(), false).unwrap();
        }
    }

    /// Create tags locally and push them to the remote
    pub fn publish(&self, names: &[&str]) {
        self.tag_local(names);
        let repo = self.repo();
        let mut remote = repo.find_remote("origin").unwrap();
        let refspecs: Vec<String> = names
            .iter()
            .map(|name| format!("refs/tags/{}:refs/tags/{}", name, name))
            .collect();
        remote.push(&refspecs, None).unwrap();
    }

    /// Create tags that only exist on the remote
    pub fn publish_remote_only(&self, names: &[&str]) {
        self.publish(names);
        let repo = self.repo();
        for name in names {
            repo.tag_delete(name).unwrap();
        }
    }

    pub fn local_tags(&self) -> Vec<String> {
        sorted_tags(&self.repo())
    }

    pub fn remote_tags(&self) -> Vec<String> {
        sorted_tags(&Repository::open_bare(&self.remote).unwrap())
    }

    /// Write a configuration file selecting the libgit2 backend
    pub fn libgit2_config(&self) -> PathBuf {
        let path = self.root().join("bumpversion.toml");
        std::fs::write(&path, "backend = \"libgit2\"\n").unwrap();
        path
    }
}

fn sorted_tags(repo: &Repository) -> Vec<String> {
    let mut tags: Vec<String> = repo
        .tag_names(None)
        .unwrap()
        .iter()
        .flatten()
        .flatten()
        .map(str::to_string)
        .collect();
    tags.sort();
    tags
}
