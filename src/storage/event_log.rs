use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{Local, SecondsFormat};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::warn;

use super::traits::EventSink;
use crate::domain::sanitize;

pub const LOG_FILE_NAME: &str = "geostream.log";

const LOG_HEADER: &[u8] = b"date\tlog\n";

/// Timestamped, tab-separated diagnostic log living in its own directory.
///
/// Logging is best-effort: I/O failures are reported through `tracing` and
/// never returned, so a broken log cannot mask the error being logged.
#[derive(Debug, Clone)]
pub struct EventLogger {
    dir: PathBuf,
    file_name: String,
}

impl EventLogger {
    /// Log into `dir`, created on the first entry
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_name: LOG_FILE_NAME.to_string(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    async fn try_log(&self, message: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.path();

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                file.write_all(LOG_HEADER).await?;
                file.flush().await?;
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e),
        }

        let line = format!(
            "{}\t{}\n",
            Local::now().to_rfc3339_opts(SecondsFormat::Micros, false),
            sanitize(message)
        );

        let mut file = OpenOptions::new().append(true).open(&path).await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

#[async_trait]
impl EventSink for EventLogger {
    async fn log(&self, message: &str) {
        if let Err(e) = self.try_log(message).await {
            warn!(
                error = %e,
                path = %self.path().display(),
                entry = message,
                "Event log write failed"
            );
        }
    }
}
