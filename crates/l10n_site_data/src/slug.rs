use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{SiteDataError, SiteDataResult, SiteLayout};

static SLUG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

/// The two files of a mod's `i18n` folder that the generators care about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum I18nFileKind {
    /// `default.json`, the untranslated reference.
    Default,
    /// `ja.json`, the translation.
    Translated,
}

impl I18nFileKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            I18nFileKind::Default => "default.json",
            I18nFileKind::Translated => "ja.json",
        }
    }
}

/// Whether `slug` is usable as a mod identifier: lowercase ASCII letters, digits, and `-`.
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_REGEX.is_match(slug)
}

/// A repository-relative path of the form `<translations_dir>/<slug>/i18n/<file>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct I18nPath {
    /// The slug directory exactly as it is named.
    pub dir_name: String,
    pub kind: I18nFileKind,
}

impl I18nPath {
    /// The slug used in generated data, which is always lowercase.
    pub fn slug(&self) -> String {
        self.dir_name.to_lowercase()
    }
}

/// Match a repository-relative path against `<translations_dir>/<slug>/i18n/<file>`, where the
/// file is `default.json` or `ja.json`.
pub fn match_i18n_file(translations_dir: &str, path: &str) -> Option<I18nPath> {
    let rest = path
        .strip_prefix(translations_dir.trim_end_matches('/'))?
        .strip_prefix('/')?;
    let mut segments = rest.split('/');
    let (Some(dir_name), Some("i18n"), Some(file), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return None;
    };
    if dir_name.is_empty() {
        return None;
    }
    let kind = match file {
        "default.json" => I18nFileKind::Default,
        "ja.json" => I18nFileKind::Translated,
        _ => return None,
    };
    Some(I18nPath {
        dir_name: dir_name.to_string(),
        kind,
    })
}

/// A translated file found on disk, with the slug of the directory it lives in.
#[derive(Clone, Debug)]
pub struct TranslatedFile {
    /// The slug exactly as the directory is named.
    pub dir_name: String,
    pub path: PathBuf,
}

impl TranslatedFile {
    pub fn slug(&self) -> String {
        self.dir_name.to_lowercase()
    }
}

/// Every `<translations_dir>/*/i18n/ja.json` under the layout's root, sorted by path.
pub fn discover_translated_files(layout: &SiteLayout) -> SiteDataResult<Vec<TranslatedFile>> {
    let pattern = format!(
        "{}/{}/*/i18n/{}",
        glob::Pattern::escape(&layout.root.to_string_lossy()),
        glob::Pattern::escape(layout.translations_dir.trim_end_matches('/')),
        I18nFileKind::Translated.file_name()
    );

    let mut files = vec![];
    for entry in glob::glob(&pattern)? {
        let path = match entry {
            Ok(path) => path,
            Err(error) => {
                log::warn!("Skipping unreadable entry: {error}");
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        let Some(dir_name) = path
            .parent()
            .and_then(|i18n| i18n.parent())
            .and_then(|slug_dir| slug_dir.file_name())
            .map(|name| name.to_string_lossy().into_owned())
        else {
            continue;
        };
        files.push(TranslatedFile { dir_name, path });
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Every directory directly under the translations directory, sorted by name. A missing
/// translations directory has no slugs.
pub fn discover_slug_dirs(layout: &SiteLayout) -> SiteDataResult<Vec<(String, PathBuf)>> {
    let root = layout.translations_path();
    if !root.is_dir() {
        log::warn!("{} does not exist", root.display());
        return Ok(vec![]);
    }
    let entries = std::fs::read_dir(&root).map_err(|source| SiteDataError::io(&root, source))?;
    let mut dirs = vec![];
    for entry in entries {
        let entry = entry.map_err(|source| SiteDataError::io(&root, source))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push((entry.file_name().to_string_lossy().into_owned(), path));
        }
    }
    dirs.sort();
    Ok(dirs)
}
