pub mod bbox;
pub mod error;
pub mod record;
pub mod sanitize;
pub mod timestamp;

// Re-export commonly used types
pub use bbox::BoundingBox;
pub use error::DomainError;
pub use record::{CanonicalRecord, Coordinates, DATASET_HEADER, UNDETERMINED_LANGUAGE};
pub use sanitize::sanitize;
pub use timestamp::{CREATED_AT_FORMAT, parse_created_at};
