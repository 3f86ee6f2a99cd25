pub mod append_store;
pub mod error;
pub mod event_log;
pub mod traits;

// Re-export commonly used types
pub use append_store::AppendStore;
pub use error::StorageError;
pub use event_log::{EventLogger, LOG_FILE_NAME};
pub use traits::{EventSink, RecordSink};
