use std::path::PathBuf;
use std::time::Duration;

use crate::change::{parse_name_only, parse_name_status};
use crate::{ChangedFilesProvider, FileChange, RepositoryIdentity, VcsError, VcsResult};

pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(30);

/// [ChangedFilesProvider] backed by the `git` executable. Every invocation is bounded by
/// `timeout`; a command that runs past it is killed and reported as [VcsError::TimedOut].
pub struct GitCli {
    root: PathBuf,
    timeout: Duration,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            root: root.into(),
            timeout,
        }
    }

    fn run(&self, args: &[&str]) -> VcsResult<String> {
        let command = format!("git {}", args.join(" "));
        log::debug!("Running `{command}` in {}", self.root.display());

        // Non-ASCII paths would otherwise come back octal-escaped and quoted.
        let full_args = ["-c", "core.quotepath=false"].iter().chain(args).copied();
        let handle = duct::cmd("git", full_args)
            .dir(&self.root)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .start()
            .map_err(|source| VcsError::Spawn {
                command: command.clone(),
                source,
            })?;

        let output = match handle.wait_timeout(self.timeout) {
            Ok(Some(output)) => output,
            Ok(None) => {
                if let Err(error) = handle.kill() {
                    log::warn!("Failed to stop `{command}` after timing out: {error}");
                }
                return Err(VcsError::TimedOut {
                    command,
                    timeout: self.timeout,
                });
            }
            Err(source) => return Err(VcsError::Spawn { command, source }),
        };

        if !output.status.success() {
            return Err(VcsError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn read_value(&self, args: &[&str]) -> String {
        match self.run(args) {
            Ok(value) => value.trim().to_string(),
            Err(error) => {
                log::debug!("{error}");
                String::new()
            }
        }
    }
}

impl ChangedFilesProvider for GitCli {
    fn staged_changes(&self) -> VcsResult<Vec<FileChange>> {
        let output = self.run(&["diff", "--cached", "--name-status", "--diff-filter=ACMRD"])?;
        Ok(parse_name_status(&output))
    }

    fn staged_files(&self) -> VcsResult<Vec<String>> {
        Ok(parse_name_only(&self.run(&["diff", "--cached", "--name-only"])?))
    }

    fn unstaged_files(&self) -> VcsResult<Vec<String>> {
        Ok(parse_name_only(&self.run(&["diff", "--name-only"])?))
    }

    fn changed_between(&self, from: &str, to: &str) -> VcsResult<Vec<String>> {
        Ok(parse_name_only(&self.run(&["diff", "--name-only", from, to])?))
    }

    fn resolve_revision(&self, revision: &str) -> VcsResult<String> {
        match self.run(&["rev-parse", "--verify", "--quiet", revision]) {
            Ok(id) => Ok(id.trim().to_string()),
            Err(VcsError::CommandFailed { .. }) => {
                Err(VcsError::UnknownRevision(revision.to_string()))
            }
            Err(error) => Err(error),
        }
    }

    fn commit_exists(&self, revision: &str) -> bool {
        let object = format!("{revision}^{{commit}}");
        self.run(&["cat-file", "-e", &object]).is_ok()
    }

    fn stage(&self, path: &str) -> VcsResult<()> {
        self.run(&["add", "--", path]).map(|_| ())
    }

    fn identity(&self) -> RepositoryIdentity {
        RepositoryIdentity {
            branch: self.read_value(&["rev-parse", "--abbrev-ref", "HEAD"]),
            user_name: self.read_value(&["config", "user.name"]),
            user_email: self.read_value(&["config", "user.email"]),
        }
    }
}
