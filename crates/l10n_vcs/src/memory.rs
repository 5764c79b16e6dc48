use std::cell::RefCell;
use std::collections::HashMap;

use crate::{ChangedFilesProvider, FileChange, RepositoryIdentity, VcsError, VcsResult};

/// A scripted [ChangedFilesProvider] for tests. Staging a path moves it out of the unstaged list
/// and records it as a staged modification, which is all the callers observe.
#[derive(Debug, Default)]
pub struct InMemoryVcs {
    staged: RefCell<Vec<FileChange>>,
    unstaged: RefCell<Vec<String>>,
    revisions: HashMap<String, String>,
    diffs: HashMap<(String, String), Vec<String>>,
    identity: RepositoryIdentity,
}

impl InMemoryVcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_staged(self, change: FileChange) -> Self {
        self.staged.borrow_mut().push(change);
        self
    }

    pub fn with_unstaged(self, path: &str) -> Self {
        self.unstaged.borrow_mut().push(path.to_string());
        self
    }

    /// Register `name` (like `HEAD` or `HEAD~1`) as resolving to the commit `id`. Every registered
    /// id is also a known commit.
    pub fn with_revision(mut self, name: &str, id: &str) -> Self {
        self.revisions.insert(name.to_string(), id.to_string());
        self.revisions.insert(id.to_string(), id.to_string());
        self
    }

    pub fn with_diff(mut self, from: &str, to: &str, paths: &[&str]) -> Self {
        self.diffs.insert(
            (from.to_string(), to.to_string()),
            paths.iter().map(|path| path.to_string()).collect(),
        );
        self
    }

    pub fn with_identity(mut self, identity: RepositoryIdentity) -> Self {
        self.identity = identity;
        self
    }
}

impl ChangedFilesProvider for InMemoryVcs {
    fn staged_changes(&self) -> VcsResult<Vec<FileChange>> {
        Ok(self.staged.borrow().clone())
    }

    fn staged_files(&self) -> VcsResult<Vec<String>> {
        Ok(self
            .staged
            .borrow()
            .iter()
            .flat_map(|change| change.paths())
            .map(str::to_string)
            .collect())
    }

    fn unstaged_files(&self) -> VcsResult<Vec<String>> {
        Ok(self.unstaged.borrow().clone())
    }

    fn changed_between(&self, from: &str, to: &str) -> VcsResult<Vec<String>> {
        Ok(self
            .diffs
            .get(&(from.to_string(), to.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn resolve_revision(&self, revision: &str) -> VcsResult<String> {
        self.revisions
            .get(revision)
            .cloned()
            .ok_or_else(|| VcsError::UnknownRevision(revision.to_string()))
    }

    fn commit_exists(&self, revision: &str) -> bool {
        self.revisions.contains_key(revision)
    }

    fn stage(&self, path: &str) -> VcsResult<()> {
        self.unstaged.borrow_mut().retain(|existing| existing != path);
        let mut staged = self.staged.borrow_mut();
        if !staged.iter().any(|change| change.paths().contains(&path)) {
            staged.push(FileChange::Modified(path.to_string()));
        }
        Ok(())
    }

    fn identity(&self) -> RepositoryIdentity {
        self.identity.clone()
    }
}
