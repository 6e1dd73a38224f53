//! Git adapter that shells out to the `git` executable.

use std::path::Path;
use std::process::{Command, Output};

use tracing::{debug, warn};

use crate::config::VersioningConfig;
use crate::error::{VersionableError, VersionableResult};
use crate::traits::{CommitOutcome, VersionControl};

/// Runs `git` in the storage root.
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: String,
    author: Option<(String, String)>,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCli {
    /// Use the given executable name or path.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            author: None,
        }
    }

    /// Build from configuration (`git_binary`, `commit_author`).
    pub fn from_config(config: &VersioningConfig) -> VersionableResult<Self> {
        let git = Self::new(config.git_binary.clone());
        match &config.commit_author {
            Some(author) => git.with_author(author),
            None => Ok(git),
        }
    }

    /// Commit as `Name <email>` regardless of the repository's identity.
    pub fn with_author(mut self, author: &str) -> VersionableResult<Self> {
        self.author = Some(parse_author(author)?);
        Ok(self)
    }

    /// The executable this adapter runs.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn command(&self, root: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.current_dir(root);
        if let Some((name, email)) = &self.author {
            cmd.arg("-c")
                .arg(format!("user.name={}", name))
                .arg("-c")
                .arg(format!("user.email={}", email));
        }
        cmd
    }

    fn run(&self, root: &Path, args: &[&str]) -> VersionableResult<Output> {
        debug!(binary = %self.binary, ?args, root = %root.display(), "running git");
        self.command(root)
            .args(args)
            .output()
            .map_err(|e| VersionableError::vcs_spawn(&self.binary, e))
    }
}

impl VersionControl for GitCli {
    fn initialize_repository(&self, root: &Path) -> VersionableResult<String> {
        let output = self.run(root, &["init"])?;
        let text = combined_output(&output);
        if !output.status.success() {
            return Err(VersionableError::vcs_command(
                format!("git init exited with {}", output.status),
                text,
            ));
        }
        Ok(text)
    }

    fn commit_all(&self, root: &Path, message: &str) -> VersionableResult<CommitOutcome> {
        let staged = self.run(root, &["add", "--all", "."])?;
        if !staged.status.success() {
            return Err(VersionableError::vcs_command(
                format!("git add exited with {}", staged.status),
                combined_output(&staged),
            ));
        }

        let output = self.run(root, &["commit", "-m", message])?;
        let text = combined_output(&output);
        if output.status.success() {
            return Ok(CommitOutcome::committed(text));
        }
        if is_nothing_to_commit(&text) {
            warn!(root = %root.display(), "nothing to commit for '{}'", message);
            return Ok(CommitOutcome::unchanged(text));
        }
        Err(VersionableError::vcs_command(
            format!("git commit exited with {}", output.status),
            text,
        ))
    }
}

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&stderr);
    }
    text
}

fn is_nothing_to_commit(output: &str) -> bool {
    output.contains("nothing to commit") || output.contains("nothing added to commit")
}

/// Split `Name <email>` into its parts.
fn parse_author(author: &str) -> VersionableResult<(String, String)> {
    let invalid = || {
        VersionableError::Configuration(format!(
            "commit author must look like 'Name <email>', got '{}'",
            author
        ))
    };

    let (name, rest) = author.split_once('<').ok_or_else(invalid)?;
    let email = rest.strip_suffix('>').ok_or_else(invalid)?;
    let (name, email) = (name.trim(), email.trim());
    if name.is_empty() || email.is_empty() {
        return Err(invalid());
    }
    Ok((name.to_string(), email.to_string()))
}
