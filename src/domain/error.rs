use thiserror::Error;

/// Domain-level errors for values that cannot describe a place on Earth
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid coordinates: lat={lat}, lon={lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },

    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),
}
