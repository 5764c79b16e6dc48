use l10n_site_data::SiteLayout;
use l10n_vcs::normalize_path;

/// Whether the hook itself is allowed to have created or modified `path`.
pub fn is_allowed_generated_path(layout: &SiteLayout, path: &str) -> bool {
    let path = normalize_path(path);
    if layout.allowed_generated_files.iter().any(|file| *file == path) {
        return true;
    }
    layout.allowed_generated_dirs.iter().any(|dir| {
        let dir = dir.trim_end_matches('/');
        path == dir
            || path
                .strip_prefix(dir)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Paths in `after` that weren't already changed in `baseline`, in `after` order.
pub fn new_changes(baseline: &[String], after: &[String]) -> Vec<String> {
    after
        .iter()
        .filter(|path| !baseline.contains(path))
        .cloned()
        .collect()
}

/// What the hook's own side effects mean for the commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeDecision {
    /// The hook didn't change anything.
    Clean,
    /// Only generated files changed. They still need to be staged.
    GeneratedOnly(Vec<String>),
    /// Something outside the generated files changed. Holds only the offending paths.
    Unexpected(Vec<String>),
}

pub fn evaluate_new_changes(layout: &SiteLayout, new_changes: &[String]) -> ChangeDecision {
    if new_changes.is_empty() {
        return ChangeDecision::Clean;
    }
    let unexpected: Vec<String> = new_changes
        .iter()
        .filter(|path| !is_allowed_generated_path(layout, path))
        .cloned()
        .collect();
    if unexpected.is_empty() {
        ChangeDecision::GeneratedOnly(new_changes.to_vec())
    } else {
        ChangeDecision::Unexpected(unexpected)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    pub fn test_allowed_paths() {
        let layout = SiteLayout::default();
        assert!(is_allowed_generated_path(&layout, "website/_data/auto_mods.yml"));
        assert!(is_allowed_generated_path(&layout, "website\\_data\\auto_progress.yml"));
        assert!(is_allowed_generated_path(&layout, "website/translations"));
        assert!(is_allowed_generated_path(&layout, "website/translations/a/i18n/ja.json"));
        assert!(!is_allowed_generated_path(&layout, "website/translations-old/a.json"));
        assert!(!is_allowed_generated_path(&layout, "website/_data/mods.yml"));
        assert!(!is_allowed_generated_path(&layout, "translations/a/i18n/ja.json"));
    }

    #[test]
    pub fn test_new_changes() {
        let baseline = paths(&["a", "b"]);
        let after = paths(&["b", "c", "a", "d"]);
        assert_eq!(new_changes(&baseline, &after), paths(&["c", "d"]));
    }

    #[test]
    pub fn test_evaluate_new_changes() {
        let layout = SiteLayout::default();
        assert_eq!(evaluate_new_changes(&layout, &[]), ChangeDecision::Clean);

        let generated = paths(&[
            "website/_data/auto_mods.yml",
            "website/translations/a/i18n/ja.json",
        ]);
        assert_eq!(
            evaluate_new_changes(&layout, &generated),
            ChangeDecision::GeneratedOnly(generated.clone())
        );

        let mixed = paths(&["website/_data/auto_mods.yml", "src/main.rs"]);
        assert_eq!(
            evaluate_new_changes(&layout, &mixed),
            ChangeDecision::Unexpected(paths(&["src/main.rs"]))
        );
    }
}
