//! Generators for the data files the website is built from.
//!
//! Each generator scans the `translations/<slug>/i18n/` tree described by a [SiteLayout] and
//! writes one YAML file under `website/_data/`:
//!
//! - [GenerateModData]: size, date, hash, and key count of every translated file.
//! - [GenerateProgressData]: how much of each mod is translated, updated incrementally from the
//!   staged changes or rebuilt from scratch.
//! - [UpdateChangelog]: which mods a commit touched.
mod changelog;
mod error;
mod layout;
mod mods;
mod progress;
mod service;
mod slug;
mod yaml;

pub use changelog::{
    apply_changelog_items, short_sha, today_at_offset, ChangelogEntry, ChangelogEnv,
    ChangelogItem, UpdateChangelog, STAGED_SHA,
};
pub use error::{SiteDataError, SiteDataResult};
pub use layout::{SiteLayout, CONFIG_FILE_NAME};
pub use mods::{mod_entry, round1, GenerateModData, ModDataFile, ModEntry};
pub use progress::{
    affected_slugs, calc_progress, calc_progress_for_dir, flatten_leaf_strings, AffectedSlugs,
    GenerateProgressData, ProgressEntry, ProgressFile, ProgressScope,
};
pub use service::{SiteDataReport, SiteDataService};
pub use slug::{
    discover_slug_dirs, discover_translated_files, is_valid_slug, match_i18n_file, I18nFileKind,
    I18nPath, TranslatedFile,
};
pub use yaml::{
    read_yaml_existing, read_yaml_lenient, to_yaml_string, write_file, write_if_changed,
};
