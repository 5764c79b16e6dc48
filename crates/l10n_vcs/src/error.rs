use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("`{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("`{command}` did not finish within {} seconds and was stopped", .timeout.as_secs())]
    TimedOut { command: String, timeout: Duration },
    #[error("Revision {0} is not known to the repository")]
    UnknownRevision(String),
}

pub type VcsResult<T> = Result<T, VcsError>;
