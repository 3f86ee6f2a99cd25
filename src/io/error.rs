use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Startup configuration defects; none of these can be fixed by retrying
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("parameter \"{key}\" not recognized in {}", .path.display())]
    UnknownKey { key: String, path: PathBuf },

    #[error("parameter \"{key}\" given more than once in {}", .path.display())]
    DuplicateKey { key: String, path: PathBuf },

    #[error("missing parameter(s) {} in {}", .keys.join(", "), .path.display())]
    MissingKeys {
        keys: Vec<&'static str>,
        path: PathBuf,
    },

    #[error("invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid COORDINATES: {0}")]
    BoundingBox(#[from] DomainError),
}

/// Connection-level failures talking to the upstream stream
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned status code {code}")]
    Status { code: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("signing error: {0}")]
    Signing(String),
}

impl UpstreamError {
    /// Status codes the upstream uses to ask clients to slow down
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Status { code: 420 | 429 })
    }
}
