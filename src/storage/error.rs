use std::io;
use thiserror::Error;

/// Storage-level errors raised while persisting records
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv_async::Error),
}
