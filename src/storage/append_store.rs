use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv_async::{AsyncWriterBuilder, QuoteStyle, Terminator};
use tokio::fs::{self, File, OpenOptions};
use tokio_util::compat::TokioAsyncWriteCompatExt;
use tracing::{debug, info, warn};

use super::error::StorageError;
use super::traits::RecordSink;
use crate::domain::{CanonicalRecord, DATASET_HEADER};

/// Tab-separated, append-only dataset file.
///
/// No handle is held between calls: every write opens the file, writes one
/// complete line and flushes before returning.
#[derive(Debug, Clone)]
pub struct AppendStore {
    path: PathBuf,
}

impl AppendStore {
    /// Create a store writing to `path`; nothing touches the disk until the first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn create_new(&self) -> std::io::Result<File> {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await
    }

    /// Write the header into a freshly created file.
    ///
    /// On failure the file is removed again so the next attempt starts over
    /// instead of finding a headerless file.
    async fn write_header(&self, file: File) -> Result<(), StorageError> {
        if let Err(e) = write_row(file, DATASET_HEADER).await {
            if let Err(remove) = fs::remove_file(&self.path).await {
                warn!(
                    path = %self.path.display(),
                    error = %remove,
                    "Failed to remove dataset file after header write failure"
                );
            }
            return Err(e);
        }
        info!(path = %self.path.display(), "Created dataset file");
        Ok(())
    }
}

/// Write one tab-separated row and flush it
async fn write_row<I, T>(file: File, row: I) -> Result<(), StorageError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut writer = AsyncWriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .create_writer(file.compat_write());

    writer.write_record(row).await?;
    writer.flush().await?;
    Ok(())
}

#[async_trait]
impl RecordSink for AppendStore {
    async fn ensure_header(&self) -> Result<(), StorageError> {
        let created = match self.create_new().await {
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent).await?;
                }
                self.create_new().await
            }
            other => other,
        };

        match created {
            Ok(file) => self.write_header(file).await,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn append(&self, record: &CanonicalRecord) -> Result<(), StorageError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        write_row(file, record.to_fields()).await?;
        debug!(post_id = record.post_id, "Appended record");
        Ok(())
    }
}
