use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use l10n_precommit::{FindingLevel, HookDecision, PrecommitHook};
use l10n_site_data::{SiteDataService, SiteLayout};
use l10n_vcs::{ChangedFilesProvider, FileChange, RepositoryIdentity, VcsError, VcsResult};

/// A repository whose index is a snapshot of the working tree taken when it's created. Unstaged
/// changes are whatever differs from the index, the way `git diff --name-only` sees them.
struct WorktreeVcs {
    root: PathBuf,
    ignored: Vec<String>,
    index: RefCell<BTreeMap<String, Vec<u8>>>,
    staged: RefCell<Vec<FileChange>>,
}

fn scan(root: &Path, dir: &Path, out: &mut BTreeMap<String, Vec<u8>>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            scan(root, &path, out);
        } else {
            let relative = path.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
            out.insert(relative, fs::read(&path).unwrap());
        }
    }
}

impl WorktreeVcs {
    fn new(root: &Path, ignored: &[&str]) -> Self {
        let vcs = Self {
            root: root.to_path_buf(),
            ignored: ignored.iter().map(|path| path.to_string()).collect(),
            index: RefCell::default(),
            staged: RefCell::default(),
        };
        *vcs.index.borrow_mut() = vcs.worktree();
        vcs
    }

    fn with_staged(self, path: &str) -> Self {
        self.staged.borrow_mut().push(FileChange::Modified(path.into()));
        self
    }

    fn worktree(&self) -> BTreeMap<String, Vec<u8>> {
        let mut files = BTreeMap::new();
        scan(&self.root, &self.root, &mut files);
        files.retain(|path, _| !self.ignored.contains(path));
        files
    }
}

impl ChangedFilesProvider for WorktreeVcs {
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
        let index = self.index.borrow();
        let worktree = self.worktree();
        let mut changed: Vec<String> = worktree
            .iter()
            .filter(|(path, content)| index.get(*path) != Some(*content))
            .map(|(path, _)| path.clone())
            .collect();
        changed.extend(index.keys().filter(|path| !worktree.contains_key(*path)).cloned());
        Ok(changed)
    }

    fn changed_between(&self, _from: &str, _to: &str) -> VcsResult<Vec<String>> {
        Ok(vec![])
    }

    fn resolve_revision(&self, revision: &str) -> VcsResult<String> {
        Err(VcsError::UnknownRevision(revision.into()))
    }

    fn commit_exists(&self, _revision: &str) -> bool {
        false
    }

    fn stage(&self, path: &str) -> VcsResult<()> {
        let content = fs::read(self.root.join(path)).unwrap();
        self.index.borrow_mut().insert(path.to_string(), content);
        let mut staged = self.staged.borrow_mut();
        if !staged.iter().any(|change| change.paths().contains(&path)) {
            staged.push(FileChange::Modified(path.to_string()));
        }
        Ok(())
    }

    fn identity(&self) -> RepositoryIdentity {
        RepositoryIdentity {
            branch: "main".into(),
            user_name: "Translator".into(),
            user_email: "translator@example.com".into(),
        }
    }
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn translated_repo(root: &Path) {
    write(root, "translations/mod-a/i18n/default.json", r#"{"a": "Hello", "b": "Bye"}"#);
    write(root, "translations/mod-a/i18n/ja.json", r#"{"a": "こんにちは", "b": "Bye"}"#);
}

const RUN_LOG: &str = "scripts/precommit_error.log";

#[test]
pub fn test_generated_files_need_staging() {
    let dir = tempfile::tempdir().unwrap();
    translated_repo(dir.path());
    let layout = SiteLayout::new(dir.path());
    let vcs =
        WorktreeVcs::new(dir.path(), &[RUN_LOG]).with_staged("translations/mod-a/i18n/ja.json");

    let outcome = PrecommitHook::new(&layout, &vcs).run().unwrap();
    assert!(outcome.report.is_clean(), "{:?}", outcome.report);
    assert_eq!(outcome.exit_code(), 1);
    let HookDecision::NeedsStaging(paths) = &outcome.decision else {
        panic!("unexpected decision {:?}", outcome.decision);
    };
    assert!(paths.contains(&"website/_data/auto_mods.yml".to_string()));
    assert!(paths.contains(&"website/_data/auto_progress.yml".to_string()));
    assert!(paths.contains(&"website/_data/auto_changelog.yml".to_string()));
    assert!(paths.contains(&"website/translations/mod-a/i18n/ja.json".to_string()));

    let progress = fs::read_to_string(dir.path().join("website/_data/auto_progress.yml")).unwrap();
    assert!(progress.contains("mod-a:\n    done: 1\n    pct: 50.0\n    total: 2\n"));
    let run_log = fs::read_to_string(dir.path().join(RUN_LOG)).unwrap();
    assert!(run_log.contains("[Branch]  main\n"));
    assert!(run_log.contains("Passed with no issues"));
}

#[test]
pub fn test_autostage_passes_and_second_run_is_clean() {
    let dir = tempfile::tempdir().unwrap();
    translated_repo(dir.path());
    let layout = SiteLayout::new(dir.path());
    let vcs =
        WorktreeVcs::new(dir.path(), &[RUN_LOG]).with_staged("translations/mod-a/i18n/ja.json");

    let outcome = PrecommitHook::new(&layout, &vcs)
        .with_autostage(true)
        .run()
        .unwrap();
    assert!(matches!(outcome.decision, HookDecision::AutoStaged(_)));
    assert_eq!(outcome.exit_code(), 0);
    assert!(vcs
        .staged_files()
        .unwrap()
        .contains(&"website/_data/auto_mods.yml".to_string()));
    assert!(vcs.unstaged_files().unwrap().is_empty());

    let outcome = PrecommitHook::new(&layout, &vcs).run().unwrap();
    assert_eq!(outcome.decision, HookDecision::Clean);
    assert!(outcome.passed());
}

#[test]
pub fn test_findings_block_the_commit() {
    let dir = tempfile::tempdir().unwrap();
    translated_repo(dir.path());
    write(dir.path(), "translations/Bad_Slug/i18n/ja.json", "{}");
    write(dir.path(), "translations/mod-a/i18n/notes.txt", "todo");
    let layout = SiteLayout::new(dir.path());
    let vcs = WorktreeVcs::new(dir.path(), &[RUN_LOG]);

    let outcome = PrecommitHook::new(&layout, &vcs).run().unwrap();
    assert_eq!(outcome.decision, HookDecision::Blocked);
    assert_eq!(outcome.report.findings.len(), 2);
    assert_eq!(outcome.exit_code(), 1);

    let run_log = fs::read_to_string(dir.path().join(RUN_LOG)).unwrap();
    assert!(run_log.contains("translations/Bad_Slug"));
    assert!(run_log.contains("Commit aborted"));
}

#[test]
pub fn test_staged_invalid_json_blocks_the_commit() {
    let dir = tempfile::tempdir().unwrap();
    translated_repo(dir.path());
    write(dir.path(), "config/site.json", "{\"a\": 1,}");
    let layout = SiteLayout::new(dir.path());
    let vcs = WorktreeVcs::new(dir.path(), &[RUN_LOG]).with_staged("config/site.json");

    let outcome = PrecommitHook::new(&layout, &vcs).run().unwrap();
    assert_eq!(outcome.decision, HookDecision::Blocked);
    assert!(outcome.report.findings[0]
        .message
        .starts_with("config/site.json: invalid JSON"));
}

#[test]
pub fn test_stale_progress_blocks_the_commit() {
    let dir = tempfile::tempdir().unwrap();
    translated_repo(dir.path());
    write(dir.path(), "translations/mod-a/i18n/default.json", r#"{"a": "Hello""#);
    let layout = SiteLayout::new(dir.path());
    let vcs =
        WorktreeVcs::new(dir.path(), &[RUN_LOG]).with_staged("translations/mod-a/i18n/ja.json");

    let outcome = PrecommitHook::new(&layout, &vcs)
        .with_autostage(true)
        .run()
        .unwrap();
    assert_eq!(outcome.decision, HookDecision::Blocked);
    assert_eq!(outcome.report.findings.len(), 1);
    assert_eq!(outcome.report.findings[0].level, FindingLevel::Warning);
    assert!(outcome.report.findings[0]
        .message
        .starts_with("mod-a: progress not updated"));
    assert_eq!(vcs.staged_files().unwrap().len(), 1);
}

#[test]
pub fn test_broken_changelog_blocks_the_commit() {
    let dir = tempfile::tempdir().unwrap();
    translated_repo(dir.path());
    let broken = "- date: 2024-04-02\n  sha: bbbbbbb\n  items: [\n";
    write(dir.path(), "website/_data/auto_changelog.yml", broken);
    let layout = SiteLayout::new(dir.path());
    let vcs =
        WorktreeVcs::new(dir.path(), &[RUN_LOG]).with_staged("translations/mod-a/i18n/ja.json");

    let outcome = PrecommitHook::new(&layout, &vcs)
        .with_autostage(true)
        .run()
        .unwrap();
    assert_eq!(outcome.decision, HookDecision::Blocked);
    assert!(outcome.report.findings[0]
        .message
        .starts_with("Updating the changelog failed"));
    let changelog = dir.path().join("website/_data/auto_changelog.yml");
    assert_eq!(fs::read_to_string(changelog).unwrap(), broken);
}

#[test]
pub fn test_changes_outside_allow_list_are_unexpected() {
    let dir = tempfile::tempdir().unwrap();
    translated_repo(dir.path());
    let mut layout = SiteLayout::new(dir.path());
    layout.allowed_generated_dirs.clear();
    let vcs = WorktreeVcs::new(dir.path(), &[RUN_LOG]);

    let outcome = PrecommitHook::new(&layout, &vcs)
        .with_autostage(true)
        .run()
        .unwrap();
    let HookDecision::Unexpected(paths) = &outcome.decision else {
        panic!("unexpected decision {:?}", outcome.decision);
    };
    assert_eq!(
        paths,
        &vec![
            "website/translations/mod-a/i18n/default.json".to_string(),
            "website/translations/mod-a/i18n/ja.json".to_string(),
        ]
    );
    assert!(vcs.staged_files().unwrap().is_empty());
    assert!(!outcome.passed());
}
