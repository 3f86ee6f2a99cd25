use std::sync::Arc;

use async_trait::async_trait;

use super::error::StorageError;
use crate::domain::CanonicalRecord;

/// Append-only destination for canonical records
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Write the column header if the destination does not exist yet.
    /// Cheap and idempotent, safe to call before every append.
    async fn ensure_header(&self) -> Result<(), StorageError>;

    /// Durably append one record before returning
    async fn append(&self, record: &CanonicalRecord) -> Result<(), StorageError>;
}

/// Best-effort diagnostic log; failures never reach the caller
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn log(&self, message: &str);
}

#[async_trait]
impl<T: RecordSink + ?Sized> RecordSink for Arc<T> {
    async fn ensure_header(&self) -> Result<(), StorageError> {
        (**self).ensure_header().await
    }

    async fn append(&self, record: &CanonicalRecord) -> Result<(), StorageError> {
        (**self).append(record).await
    }
}

#[async_trait]
impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    async fn log(&self, message: &str) {
        (**self).log(message).await
    }
}
