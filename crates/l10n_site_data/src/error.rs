use std::path::PathBuf;

use l10n_json_template::TemplateError;
use l10n_vcs::VcsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteDataError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("YAML error in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Invalid configuration in {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Configuration file {} does not exist", .0.display())]
    MissingConfig(PathBuf),
    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Vcs(#[from] VcsError),
}

impl SiteDataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SiteDataError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type SiteDataResult<T> = Result<T, SiteDataError>;
