use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{origin} is not valid JSON once comments are removed: {source}")]
    Parse {
        origin: String,
        source: serde_json::Error,
    },
}

impl TemplateError {
    /// Returns the type name of this error
    pub fn name(&self) -> &'static str {
        match self {
            TemplateError::Read { .. } => "Read",
            TemplateError::Write { .. } => "Write",
            TemplateError::Parse { .. } => "Parse",
        }
    }
}

pub type TemplateResult<T> = Result<T, TemplateError>;
