use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{SiteDataError, SiteDataResult};

/// Name of the optional configuration file looked up at the repository root.
pub static CONFIG_FILE_NAME: &str = "l10n-tools.json";

/// Where everything lives in the site repository, and the policy values the tools share. Every
/// path is relative to [SiteLayout::root] and uses `/` separators. The defaults describe the
/// standard repository layout, and any field can be overridden from [CONFIG_FILE_NAME].
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteLayout {
    #[serde(skip)]
    pub root: PathBuf,
    /// Directory holding one `<slug>/i18n/` folder per mod.
    pub translations_dir: String,
    /// Copy of the translations directory published with the website.
    pub mirror_dir: String,
    pub mods_data_file: String,
    pub progress_data_file: String,
    pub changelog_file: String,
    /// Log written on every pre-commit run.
    pub run_log_file: String,
    /// Files the pre-commit hook is allowed to create or modify.
    pub allowed_generated_files: Vec<String>,
    /// Directories the pre-commit hook is allowed to create or modify anything under.
    pub allowed_generated_dirs: Vec<String>,
    /// UTC offset, in hours, used for changelog dates.
    pub changelog_utc_offset_hours: i32,
    pub git_timeout_secs: u64,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            translations_dir: "translations".into(),
            mirror_dir: "website/translations".into(),
            mods_data_file: "website/_data/auto_mods.yml".into(),
            progress_data_file: "website/_data/auto_progress.yml".into(),
            changelog_file: "website/_data/auto_changelog.yml".into(),
            run_log_file: "scripts/precommit_error.log".into(),
            allowed_generated_files: vec![
                "website/_data/auto_mods.yml".into(),
                "website/_data/auto_changelog.yml".into(),
                "website/_data/auto_progress.yml".into(),
            ],
            allowed_generated_dirs: vec!["website/translations".into()],
            changelog_utc_offset_hours: 9,
            git_timeout_secs: 30,
        }
    }
}

impl SiteLayout {
    /// The default layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Load the layout for the repository at `root`. An explicit `config_path` must exist;
    /// otherwise [CONFIG_FILE_NAME] is used when present and the defaults when it is not.
    pub fn load(root: &Path, config_path: Option<&Path>) -> SiteDataResult<Self> {
        let config_path = match config_path {
            Some(path) if !path.is_file() => {
                return Err(SiteDataError::MissingConfig(path.to_path_buf()))
            }
            Some(path) => Some(path.to_path_buf()),
            None => Some(root.join(CONFIG_FILE_NAME)).filter(|path| path.is_file()),
        };

        let mut layout = match config_path {
            Some(path) => {
                log::info!("Using configuration from {}", path.display());
                let value = l10n_json_template::read_relaxed_json_file(&path)?;
                serde_json::from_value::<SiteLayout>(value)
                    .map_err(|source| SiteDataError::Config { path, source })?
            }
            None => SiteLayout::default(),
        };
        layout.root = root.to_path_buf();
        Ok(layout)
    }

    /// Resolve a layout-relative path against the repository root.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn translations_path(&self) -> PathBuf {
        self.resolve(&self.translations_dir)
    }

    /// The repository-relative path of a mod's translated file, as published on the site.
    pub fn translated_file(&self, slug: &str) -> String {
        format!("{}/{slug}/i18n/ja.json", self.translations_dir)
    }

    pub fn git_timeout(&self) -> Duration {
        Duration::from_secs(self.git_timeout_secs)
    }
}
