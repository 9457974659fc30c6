use crate::error::{BumpError, Result};
use crate::git::Backend;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// [Backend] that shells out to the `git` binary
///
/// Every command runs as `git -C <directory> ...`, blocking until it exits.
pub struct GitCommand {
    program: String,
    directory: PathBuf,
}

impl GitCommand {
    /// Create a backend rooted at `directory`, using the `git` in `PATH`
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self> {
        Self::with_program("git", directory)
    }

    /// Create a backend using a specific git executable
    ///
    /// # Returns
    /// * `Ok(GitCommand)` - `program --version` ran
    /// * `Err(NoBackend)` - `program` could not be spawned
    pub fn with_program<P: AsRef<Path>>(program: impl Into<String>, directory: P) -> Result<Self> {
        let program = program.into();
        match Command::new(&program).arg("--version").output() {
            Ok(output) => {
                tracing::debug!(
                    "using {}",
                    String::from_utf8_lossy(&output.stdout).trim()
                );
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(BumpError::NoBackend(program));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(GitCommand {
            program,
            directory: directory.as_ref().to_path_buf(),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        tracing::debug!(directory = %self.directory.display(), "git {}", args.join(" "));
        Command::new(&self.program)
            .arg("-C")
            .arg(&self.directory)
            .args(args)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => BumpError::NoBackend(self.program.clone()),
                _ => BumpError::Io(e),
            })
    }

    /// Run git and return its stdout, or the reason it failed.
    ///
    /// The outer error means git could not be spawned at all. On a non-zero
    /// exit the captured output is logged and the last stderr line is kept
    /// as the reason.
    fn run(&self, args: &[&str]) -> Result<std::result::Result<String, String>> {
        let output = self.output(args)?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return Ok(Ok(stdout));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::debug!(status = %output.status, "git {} failed", args.join(" "));
        if !stdout.trim().is_empty() {
            tracing::debug!("stdout:\n{}", stdout.trim_end());
        }
        if !stderr.trim().is_empty() {
            tracing::debug!("stderr:\n{}", stderr.trim_end());
        }

        let reason = stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("git {} exited with {}", args.join(" "), output.status));
        Ok(Err(reason))
    }

    fn run_checked(&self, args: &[&str]) -> Result<String> {
        self.run(args)?.map_err(BumpError::command)
    }
}

impl Backend for GitCommand {
    fn check_repository(&self) -> Result<()> {
        self.run(&["rev-parse", "--git-dir"])?
            .map(|_| ())
            .map_err(|_| BumpError::NotARepository(self.directory.clone()))
    }

    fn check_remote(&self, remote: &str) -> Result<()> {
        self.run(&["remote", "get-url", remote])?
            .map(|_| ())
            .map_err(|_| BumpError::NoRemote(remote.to_string()))
    }

    fn list_local_tags(&self) -> Result<String> {
        self.run_checked(&["tag", "--list"])
    }

    fn list_remote_tags(&self, remote: &str) -> Result<String> {
        self.run_checked(&["ls-remote", "--tags", remote])
    }

    fn create_tag(&self, name: &str) -> Result<()> {
        self.run(&["tag", name])?.map(|_| ()).map_err(BumpError::tag)
    }

    fn push_tags(&self, remote: &str) -> Result<()> {
        self.run(&["push", "--tags", remote])?
            .map(|_| ())
            .map_err(BumpError::push)
    }
}
