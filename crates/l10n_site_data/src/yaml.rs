use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{SiteDataError, SiteDataResult};

pub fn to_yaml_string<T: Serialize>(path: &Path, value: &T) -> SiteDataResult<String> {
    serde_yaml::to_string(value).map_err(|source| SiteDataError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `content` to `path`, creating parent directories as needed.
pub fn write_file(path: &Path, content: &str) -> SiteDataResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SiteDataError::io(parent, source))?;
    }
    fs::write(path, content).map_err(|source| SiteDataError::io(path, source))
}

/// Write `content` to `path` unless the file already holds exactly that. Returns whether the file
/// was written.
pub fn write_if_changed(path: &Path, content: &str) -> SiteDataResult<bool> {
    if let Ok(existing) = fs::read_to_string(path) {
        if existing == content {
            return Ok(false);
        }
    }
    write_file(path, content)?;
    Ok(true)
}

/// Read a previously generated YAML file. A missing file is `None`, as is one that can't be
/// parsed as a `T`, which is logged and otherwise treated as if it were missing.
pub fn read_yaml_lenient<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = fs::read_to_string(path).ok()?;
    match serde_yaml::from_str(&content) {
        Ok(value) => Some(value),
        Err(error) => {
            log::warn!("Ignoring unreadable {}: {error}", path.display());
            None
        }
    }
}

/// Read a YAML file that is kept across runs. A missing or empty file is `None`; a file that can't be
/// read or parsed as a `T` is an error, so its contents are never silently replaced.
pub fn read_yaml_existing<T: DeserializeOwned>(path: &Path) -> SiteDataResult<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(SiteDataError::io(path, error)),
    };
    if content.trim().is_empty() {
        return Ok(None);
    }
    serde_yaml::from_str(&content)
        .map(Some)
        .map_err(|source| SiteDataError::Yaml {
            path: path.to_path_buf(),
            source,
        })
}
