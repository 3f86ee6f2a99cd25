use thiserror::Error;

use crate::domain::DomainError;

/// Structural defects in a single payload that carries a coordinate pair
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Point has {0} position values, expected at least 2")]
    IncompletePoint(usize),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}
