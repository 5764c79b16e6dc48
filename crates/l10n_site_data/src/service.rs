use std::path::PathBuf;

/// A single generation pass over the site repository. Each generator is configured up front and
/// then `run` once.
pub trait SiteDataService {
    type Result;

    fn run(&mut self) -> Self::Result;
}

/// What a generator did, for the caller to print.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SiteDataReport {
    /// One human-readable line, like `Generated website/_data/auto_mods.yml (3 mods)`.
    pub summary: String,
    /// The file that was written, if anything was.
    pub written: Option<PathBuf>,
    /// Problems that didn't stop the run but left part of the output stale.
    pub warnings: Vec<String>,
}

impl SiteDataReport {
    pub fn written(summary: String, path: PathBuf) -> Self {
        Self {
            summary,
            written: Some(path),
            warnings: vec![],
        }
    }

    pub fn unchanged(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            written: None,
            warnings: vec![],
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}
