use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::slug::{discover_translated_files, TranslatedFile};
use crate::yaml::{to_yaml_string, write_file};
use crate::{SiteDataError, SiteDataReport, SiteDataResult, SiteDataService, SiteLayout};

/// Metadata about one mod's translated file, as listed on the website. Fields are declared in
/// the order they are written out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModEntry {
    /// Number of top-level keys, or 0 when the file isn't a readable JSON object.
    pub keys_count: usize,
    /// Repository-relative, `/`-separated path of the translated file.
    pub path: String,
    /// First 8 hex digits of the SHA-256 of the file's bytes.
    pub sha256_8: String,
    /// Size in KiB, rounded to one decimal.
    pub size_kb: f64,
    pub slug: String,
    /// Last modification date of the file, `YYYY-MM-DD` in UTC.
    pub updated: String,
}

pub type ModDataFile = BTreeMap<String, ModEntry>;

/// Round to one decimal place, halves away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn sha256_prefix(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = format!("{:x}", hasher.finalize());
    digest[..8].to_string()
}

fn count_top_level_keys(path: &Path) -> usize {
    match l10n_json_template::read_relaxed_json_file_lenient(path) {
        Some(document) => document.as_object().map_or(0, |object| object.len()),
        None => 0,
    }
}

/// Build the entry for a single translated file.
pub fn mod_entry(layout: &SiteLayout, file: &TranslatedFile) -> SiteDataResult<ModEntry> {
    let bytes = fs::read(&file.path).map_err(|source| SiteDataError::io(&file.path, source))?;
    let modified = fs::metadata(&file.path)
        .and_then(|metadata| metadata.modified())
        .map_err(|source| SiteDataError::io(&file.path, source))?;
    let slug = file.slug();

    Ok(ModEntry {
        keys_count: count_top_level_keys(&file.path),
        path: layout.translated_file(&slug),
        sha256_8: sha256_prefix(&bytes),
        size_kb: round1(bytes.len() as f64 / 1024.0),
        updated: DateTime::<Utc>::from(modified).format("%Y-%m-%d").to_string(),
        slug,
    })
}

/// Regenerates the mod metadata file from every translated file on disk.
pub struct GenerateModData<'a> {
    layout: &'a SiteLayout,
}

impl<'a> GenerateModData<'a> {
    pub fn new(layout: &'a SiteLayout) -> Self {
        Self { layout }
    }

    pub fn collect(&self) -> SiteDataResult<ModDataFile> {
        let mut mods = ModDataFile::new();
        for file in discover_translated_files(self.layout)? {
            let entry = mod_entry(self.layout, &file)?;
            log::debug!("{}: {} keys", entry.slug, entry.keys_count);
            mods.insert(entry.slug.clone(), entry);
        }
        Ok(mods)
    }
}

impl SiteDataService for GenerateModData<'_> {
    type Result = SiteDataResult<SiteDataReport>;

    fn run(&mut self) -> Self::Result {
        let mods = self.collect()?;
        let out_path = self.layout.resolve(&self.layout.mods_data_file);
        write_file(&out_path, &to_yaml_string(&out_path, &mods)?)?;
        Ok(SiteDataReport::written(
            format!(
                "Generated {} ({} mods)",
                self.layout.mods_data_file,
                mods.len()
            ),
            out_path,
        ))
    }
}
