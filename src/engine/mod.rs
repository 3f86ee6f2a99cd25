pub mod error;
pub mod normalizer;
pub mod payload;

// Re-export commonly used types
pub use error::NormalizeError;
pub use normalizer::{extract_text, normalize};
pub use payload::{ExtendedText, RawPoint, RawPost, RawUser};
