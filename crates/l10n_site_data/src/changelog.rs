use chrono::{FixedOffset, Utc};
use l10n_vcs::{ChangedFilesProvider, EMPTY_TREE};
use serde::{Deserialize, Serialize};

use crate::slug::{match_i18n_file, I18nFileKind};
use crate::yaml::{read_yaml_existing, to_yaml_string, write_if_changed};
use crate::{SiteDataReport, SiteDataResult, SiteDataService, SiteLayout};

/// Placeholder commit id for changes that are staged but not yet committed.
pub static STAGED_SHA: &str = "STAGED";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogItem {
    pub slug: String,
    pub path: String,
}

/// One commit's worth of translation updates. Field order is the order they are written in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub date: String,
    pub sha: String,
    #[serde(default)]
    pub by: String,
    #[serde(default)]
    pub items: Vec<ChangelogItem>,
}

/// How the changelog updater was invoked, normally read from the environment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangelogEnv {
    /// Running in CI (`GITHUB_ACTIONS=true`), where the change is an actual commit range.
    pub ci: bool,
    /// `BEFORE`: the commit the range starts from.
    pub before: Option<String>,
    /// `SHA`: the commit the range ends at.
    pub sha: Option<String>,
    /// `ACTOR`, or `local` when unset.
    pub actor: String,
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

impl ChangelogEnv {
    pub fn from_env() -> Self {
        Self {
            ci: std::env::var("GITHUB_ACTIONS").is_ok_and(|value| value == "true"),
            before: non_empty_var("BEFORE"),
            sha: non_empty_var("SHA"),
            actor: non_empty_var("ACTOR").unwrap_or_else(|| "local".into()),
        }
    }

    pub fn local(actor: &str) -> Self {
        Self {
            actor: actor.into(),
            ..Default::default()
        }
    }
}

/// The first 7 characters of a commit id.
pub fn short_sha(sha: &str) -> String {
    sha.chars().take(7).collect()
}

/// Today's date, `YYYY-MM-DD`, at a fixed offset from UTC.
pub fn today_at_offset(offset_hours: i32) -> String {
    let now = Utc::now();
    match FixedOffset::east_opt(offset_hours * 3600) {
        Some(offset) => now.with_timezone(&offset).format("%Y-%m-%d").to_string(),
        None => {
            log::warn!("Invalid UTC offset of {offset_hours} hours, using UTC");
            now.format("%Y-%m-%d").to_string()
        }
    }
}

/// Add `items` under `sha` to the changelog. An existing entry for the same commit gains the
/// items for slugs it doesn't list yet and takes the new date and actor; otherwise a new entry
/// goes at the front.
pub fn apply_changelog_items(
    changelog: &mut Vec<ChangelogEntry>,
    date: &str,
    sha: &str,
    actor: &str,
    items: Vec<ChangelogItem>,
) {
    match changelog.iter_mut().find(|entry| entry.sha == sha) {
        Some(entry) => {
            for item in items {
                if !entry.items.iter().any(|existing| existing.slug == item.slug) {
                    entry.items.push(item);
                }
            }
            entry.date = date.to_string();
            entry.by = actor.to_string();
        }
        None => changelog.insert(
            0,
            ChangelogEntry {
                date: date.to_string(),
                sha: sha.to_string(),
                by: actor.to_string(),
                items,
            },
        ),
    }
}

/// Records which mods' translations changed in the commit being made (locally) or just made (in
/// CI).
pub struct UpdateChangelog<'a> {
    layout: &'a SiteLayout,
    vcs: &'a dyn ChangedFilesProvider,
    env: ChangelogEnv,
    date: Option<String>,
}

impl<'a> UpdateChangelog<'a> {
    pub fn new(
        layout: &'a SiteLayout,
        vcs: &'a dyn ChangedFilesProvider,
        env: ChangelogEnv,
    ) -> Self {
        Self {
            layout,
            vcs,
            env,
            date: None,
        }
    }

    /// Use a fixed date instead of today's.
    pub fn with_date(mut self, date: &str) -> Self {
        self.date = Some(date.to_string());
        self
    }

    /// The commit id to record and the paths it changed.
    fn changed_files(&self) -> SiteDataResult<(String, Vec<String>)> {
        if !self.env.ci {
            return Ok((STAGED_SHA.to_string(), self.vcs.staged_files()?));
        }

        let mut before = match &self.env.before {
            Some(before) => before.clone(),
            None => self
                .vcs
                .resolve_revision("HEAD~1")
                .unwrap_or_else(|_| EMPTY_TREE.to_string()),
        };
        let sha = match &self.env.sha {
            Some(sha) => sha.clone(),
            None => self.vcs.resolve_revision("HEAD")?,
        };
        if before != EMPTY_TREE && !self.vcs.commit_exists(&before) {
            log::warn!("BEFORE {before} not found; falling back to the empty tree");
            before = EMPTY_TREE.to_string();
        }
        Ok((sha.clone(), self.vcs.changed_between(&before, &sha)?))
    }

    fn items_for(&self, paths: &[String]) -> Vec<ChangelogItem> {
        let mut items: Vec<ChangelogItem> = vec![];
        for path in paths {
            let Some(matched) = match_i18n_file(&self.layout.translations_dir, path) else {
                continue;
            };
            if matched.kind != I18nFileKind::Translated {
                continue;
            }
            let slug = matched.slug();
            if items.iter().any(|item| item.slug == slug) {
                continue;
            }
            items.push(ChangelogItem {
                path: self.layout.translated_file(&slug),
                slug,
            });
        }
        items
    }
}

impl SiteDataService for UpdateChangelog<'_> {
    type Result = SiteDataResult<SiteDataReport>;

    fn run(&mut self) -> Self::Result {
        let (sha, paths) = self.changed_files()?;
        let items = self.items_for(&paths);
        if items.is_empty() {
            return Ok(SiteDataReport::unchanged("No translation changes for the changelog."));
        }

        let short = short_sha(&sha);
        let date = match &self.date {
            Some(date) => date.clone(),
            None => today_at_offset(self.layout.changelog_utc_offset_hours),
        };
        let added = items.len();

        let out_path = self.layout.resolve(&self.layout.changelog_file);
        let mut changelog: Vec<ChangelogEntry> =
            read_yaml_existing(&out_path)?.unwrap_or_default();
        apply_changelog_items(&mut changelog, &date, &short, &self.env.actor, items);

        let content = to_yaml_string(&out_path, &changelog)?;
        if write_if_changed(&out_path, &content)? {
            Ok(SiteDataReport::written(
                format!("Updated {} (sha {short}, +{added})", self.layout.changelog_file),
                out_path,
            ))
        } else {
            Ok(SiteDataReport::unchanged(format!(
                "{} is already up to date",
                self.layout.changelog_file
            )))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn item(slug: &str) -> ChangelogItem {
        ChangelogItem {
            slug: slug.into(),
            path: format!("translations/{slug}/i18n/ja.json"),
        }
    }

    #[test]
    pub fn test_short_sha() {
        assert_eq!(short_sha("0123456789abcdef"), "0123456");
        assert_eq!(short_sha(STAGED_SHA), "STAGED");
    }

    #[test]
    pub fn test_today_at_offset_format() {
        let date = today_at_offset(9);
        assert_eq!(date.len(), 10);
        assert_eq!(&date[4..5], "-");
        assert_eq!(today_at_offset(0), Utc::now().format("%Y-%m-%d").to_string());
    }

    #[test]
    pub fn test_new_entry_goes_first() {
        let mut changelog = vec![];
        apply_changelog_items(&mut changelog, "2024-01-01", "aaaaaaa", "local", vec![item("a")]);
        apply_changelog_items(&mut changelog, "2024-01-02", "bbbbbbb", "ci", vec![item("b")]);
        assert_eq!(changelog.len(), 2);
        assert_eq!(changelog[0].sha, "bbbbbbb");
        assert_eq!(changelog[1].sha, "aaaaaaa");
    }

    #[test]
    pub fn test_same_sha_merges_items() {
        let mut changelog = vec![];
        apply_changelog_items(&mut changelog, "2024-01-01", "STAGED", "local", vec![item("a")]);
        apply_changelog_items(
            &mut changelog,
            "2024-01-03",
            "STAGED",
            "someone",
            vec![item("a"), item("b")],
        );
        assert_eq!(changelog.len(), 1);
        assert_eq!(changelog[0].items, vec![item("a"), item("b")]);
        assert_eq!(changelog[0].date, "2024-01-03");
        assert_eq!(changelog[0].by, "someone");
    }

    #[test]
    pub fn test_entry_format() {
        let changelog = vec![ChangelogEntry {
            date: "2024-05-01".into(),
            sha: "abc1234".into(),
            by: "local".into(),
            items: vec![item("bear-family")],
        }];
        assert_eq!(
            serde_yaml::to_string(&changelog).unwrap(),
            "- date: 2024-05-01\n  sha: abc1234\n  by: local\n  items:\n  - slug: bear-family\n    path: translations/bear-family/i18n/ja.json\n"
        );
    }
}
