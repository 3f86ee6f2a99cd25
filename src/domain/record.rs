use std::fmt;

use chrono::{DateTime, FixedOffset};

use super::error::DomainError;
use super::sanitize::sanitize;

/// Column names of the dataset file, in write order
pub const DATASET_HEADER: [&str; 6] = [
    "id_tweet",
    "id_user",
    "creation_date",
    "coordinates",
    "lang",
    "text",
];

/// Language tag used when a post carries none
pub const UNDETERMINED_LANGUAGE: &str = "und";

/// A precise point, latitude first
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Create a validated coordinate pair
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(DomainError::InvalidCoordinates {
                lat: latitude,
                lon: longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build from a GeoJSON position, which stores longitude before latitude
    pub fn from_lon_lat(longitude: f64, latitude: f64) -> Result<Self, DomainError> {
        Self::new(latitude, longitude)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinates {
    // Debug formatting keeps the shortest round-trip form and a trailing `.0`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?},{:?}", self.latitude, self.longitude)
    }
}

/// Normalized, fixed-shape row persisted for every geotagged post
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    pub post_id: u64,
    pub author_id: u64,
    pub created_at: DateTime<FixedOffset>,
    pub coordinates: Coordinates,
    pub language: String,
    pub text: String,
}

impl CanonicalRecord {
    /// Return the record with its text collapsed onto a single line.
    ///
    /// Trailing spaces, such as those left by a final line break, are dropped.
    /// Leading whitespace is content and stays.
    pub fn sanitized(mut self) -> Self {
        let clean = sanitize(&self.text).trim_end_matches(' ').to_string();
        self.text = clean;
        self
    }

    /// Field values in [`DATASET_HEADER`] order
    pub fn to_fields(&self) -> [String; 6] {
        [
            self.post_id.to_string(),
            self.author_id.to_string(),
            self.created_at.to_rfc3339(),
            self.coordinates.to_string(),
            self.language.clone(),
            self.text.clone(),
        ]
    }

    /// The record as one dataset line, including the trailing newline
    pub fn to_line(&self) -> String {
        let mut line = self.to_fields().join("\t");
        line.push('\n');
        line
    }
}
