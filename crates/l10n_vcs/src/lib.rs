mod change;
mod error;
mod git;
mod memory;

pub use change::{normalize_path, parse_name_only, parse_name_status, FileChange};
pub use error::{VcsError, VcsResult};
pub use git::{GitCli, DEFAULT_GIT_TIMEOUT};
pub use memory::InMemoryVcs;

/// git's well-known id for the empty tree, usable as a diff base when there is no parent commit.
pub static EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Who is committing and where, for run logs. Values are empty when unknown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepositoryIdentity {
    pub branch: String,
    pub user_name: String,
    pub user_email: String,
}

/// The version control questions the site tooling needs answered. Everything that used to be a
/// shell-out to `git` goes through this trait, so the generators and the pre-commit checks can be
/// exercised against [InMemoryVcs] instead of a real repository.
pub trait ChangedFilesProvider {
    /// Staged additions, copies, modifications, renames, and deletions.
    fn staged_changes(&self) -> VcsResult<Vec<FileChange>>;

    /// Paths with staged changes of any kind.
    fn staged_files(&self) -> VcsResult<Vec<String>>;

    /// Paths with changes in the working tree that are not staged.
    fn unstaged_files(&self) -> VcsResult<Vec<String>>;

    /// Paths that differ between two revisions.
    fn changed_between(&self, from: &str, to: &str) -> VcsResult<Vec<String>>;

    /// Resolve a revision expression like `HEAD~1` to a full commit id.
    fn resolve_revision(&self, revision: &str) -> VcsResult<String>;

    fn commit_exists(&self, revision: &str) -> bool;

    /// Add `path` to the index.
    fn stage(&self, path: &str) -> VcsResult<()>;

    fn identity(&self) -> RepositoryIdentity;

    /// Every path with staged or unstaged changes, without duplicates, in first-seen order.
    fn snapshot_changes(&self) -> VcsResult<Vec<String>> {
        let unstaged = self.unstaged_files()?;
        let staged = self.staged_files()?;
        let mut paths: Vec<String> = Vec::with_capacity(unstaged.len() + staged.len());
        for path in unstaged.into_iter().chain(staged) {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}
