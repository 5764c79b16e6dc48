use std::collections::BTreeMap;
use std::path::Path;

use l10n_vcs::{ChangedFilesProvider, FileChange};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mods::round1;
use crate::slug::{discover_translated_files, match_i18n_file, I18nFileKind};
use crate::yaml::{read_yaml_lenient, to_yaml_string, write_file};
use crate::{SiteDataReport, SiteDataResult, SiteDataService, SiteLayout};

/// Translation completion of one mod.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    #[serde(rename = "done")]
    pub done_count: usize,
    #[serde(rename = "pct")]
    pub percentage: f64,
    #[serde(rename = "total")]
    pub total_count: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressFile {
    #[serde(default)]
    pub mods: BTreeMap<String, ProgressEntry>,
}

fn flatten_into(value: &Value, prefix: Option<String>, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(object) => {
            for (key, value) in object {
                let path = match &prefix {
                    Some(prefix) => format!("{prefix}.{key}"),
                    None => key.clone(),
                };
                flatten_into(value, Some(path), out);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let path = match &prefix {
                    Some(prefix) => format!("{prefix}[{index}]"),
                    None => format!("[{index}]"),
                };
                flatten_into(item, Some(path), out);
            }
        }
        Value::String(text) => {
            out.insert(prefix.unwrap_or_default(), text.clone());
        }
        _ => {}
    }
}

/// Flatten a document to its string leaves, keyed by paths like `a.b[0].c`. Other scalars are
/// dropped. A string at the root is keyed by the empty path.
pub fn flatten_leaf_strings(document: &Value) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    flatten_into(document, None, &mut out);
    out
}

/// Compare a translation against its reference. A leaf counts as done when the translation has
/// it and it differs from the reference text.
pub fn calc_progress(reference: &Value, translated: &Value) -> ProgressEntry {
    let reference = flatten_leaf_strings(reference);
    let translated = flatten_leaf_strings(translated);

    let total_count = reference.len();
    let done_count = reference
        .iter()
        .filter(|(path, text)| {
            translated
                .get(*path)
                .is_some_and(|translation| translation != *text)
        })
        .count();
    let percentage = if total_count == 0 {
        0.0
    } else {
        round1(done_count as f64 * 100.0 / total_count as f64)
    };

    ProgressEntry {
        done_count,
        percentage,
        total_count,
    }
}

/// Compute the progress of the mod whose files live in `i18n_dir`.
pub fn calc_progress_for_dir(i18n_dir: &Path) -> SiteDataResult<ProgressEntry> {
    let read = |kind: I18nFileKind| {
        l10n_json_template::read_relaxed_json_file(&i18n_dir.join(kind.file_name()))
    };
    Ok(calc_progress(
        &read(I18nFileKind::Default)?,
        &read(I18nFileKind::Translated)?,
    ))
}

/// Slugs touched by a set of staged changes, each listed once in first-seen order. The values
/// are slug directory names as they appear in the paths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AffectedSlugs {
    pub changed: Vec<String>,
    pub deleted: Vec<String>,
}

impl AffectedSlugs {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.deleted.is_empty()
    }

    fn push(list: &mut Vec<String>, translations_dir: &str, path: &str) {
        if let Some(matched) = match_i18n_file(translations_dir, path) {
            if !list.contains(&matched.dir_name) {
                list.push(matched.dir_name);
            }
        }
    }
}

/// Work out which slugs need their progress recomputed or removed. A rename counts as deleting
/// the old slug and changing the new one.
pub fn affected_slugs(translations_dir: &str, changes: &[FileChange]) -> AffectedSlugs {
    let mut affected = AffectedSlugs::default();
    for change in changes {
        match change {
            FileChange::Added(path) | FileChange::Modified(path) => {
                AffectedSlugs::push(&mut affected.changed, translations_dir, path)
            }
            FileChange::Copied { to, .. } => {
                AffectedSlugs::push(&mut affected.changed, translations_dir, to)
            }
            FileChange::Deleted(path) => {
                AffectedSlugs::push(&mut affected.deleted, translations_dir, path)
            }
            FileChange::Renamed { from, to } => {
                AffectedSlugs::push(&mut affected.deleted, translations_dir, from);
                AffectedSlugs::push(&mut affected.changed, translations_dir, to);
            }
        }
    }
    affected
}

/// Which mods [GenerateProgressData] recomputes.
pub enum ProgressScope<'a> {
    /// Only mods with staged changes, keeping every other existing entry.
    Staged(&'a dyn ChangedFilesProvider),
    /// Every mod on disk, starting from an empty file.
    All,
}

pub struct GenerateProgressData<'a> {
    layout: &'a SiteLayout,
    scope: ProgressScope<'a>,
}

impl<'a> GenerateProgressData<'a> {
    pub fn new(layout: &'a SiteLayout, scope: ProgressScope<'a>) -> Self {
        Self { layout, scope }
    }

    fn i18n_dir(&self, dir_name: &str) -> std::path::PathBuf {
        self.layout.translations_path().join(dir_name).join("i18n")
    }

    fn update_staged(&self, vcs: &dyn ChangedFilesProvider) -> SiteDataResult<SiteDataReport> {
        let affected = affected_slugs(&self.layout.translations_dir, &vcs.staged_changes()?);
        if affected.is_empty() {
            return Ok(SiteDataReport::unchanged("No target slugs. Nothing to do."));
        }

        let out_path = self.layout.resolve(&self.layout.progress_data_file);
        let mut progress: ProgressFile = read_yaml_lenient(&out_path).unwrap_or_default();
        let mut warnings = vec![];

        for dir_name in &affected.changed {
            let slug = dir_name.to_lowercase();
            match calc_progress_for_dir(&self.i18n_dir(dir_name)) {
                Ok(entry) => {
                    progress.mods.insert(slug, entry);
                }
                // The files are gone, so this is really a removal.
                Err(_) if affected.deleted.contains(dir_name) => {
                    progress.mods.remove(&slug);
                }
                Err(error) => {
                    warnings.push(format!("{slug}: progress not updated: {error}"));
                }
            }
        }
        for dir_name in &affected.deleted {
            if !affected.changed.contains(dir_name) {
                progress.mods.remove(&dir_name.to_lowercase());
            }
        }

        write_file(&out_path, &to_yaml_string(&out_path, &progress)?)?;
        Ok(SiteDataReport::written(
            format!(
                "Generated {} (updated: {}, deleted: {}, total_slugs: {})",
                self.layout.progress_data_file,
                affected.changed.len(),
                affected.deleted.len(),
                progress.mods.len()
            ),
            out_path,
        )
        .with_warnings(warnings))
    }

    fn rebuild_all(&self) -> SiteDataResult<SiteDataReport> {
        let mut progress = ProgressFile::default();
        let mut warnings = vec![];
        for file in discover_translated_files(self.layout)? {
            match calc_progress_for_dir(&self.i18n_dir(&file.dir_name)) {
                Ok(entry) => {
                    progress.mods.insert(file.slug(), entry);
                }
                Err(error) => {
                    warnings.push(format!("{}: progress skipped: {error}", file.slug()));
                }
            }
        }

        let out_path = self.layout.resolve(&self.layout.progress_data_file);
        write_file(&out_path, &to_yaml_string(&out_path, &progress)?)?;
        Ok(SiteDataReport::written(
            format!(
                "Generated {} (total_slugs: {})",
                self.layout.progress_data_file,
                progress.mods.len()
            ),
            out_path,
        )
        .with_warnings(warnings))
    }
}

impl SiteDataService for GenerateProgressData<'_> {
    type Result = SiteDataResult<SiteDataReport>;

    fn run(&mut self) -> Self::Result {
        match self.scope {
            ProgressScope::Staged(vcs) => self.update_staged(vcs),
            ProgressScope::All => self.rebuild_all(),
        }
    }
}
