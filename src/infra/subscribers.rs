//! Flat-file subscriber log.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::{
    application::subscribe::{SubscriberLog, SubscriberLogError},
    domain::subscribers::SubscriberRecord,
};

/// Appends one `timestamp,email` line per signup.
///
/// The file is opened, written, synced and closed on every call; no handle
/// outlives a request. Each record goes out in a single `O_APPEND` write, so
/// concurrent requests do not interleave within a line.
#[derive(Debug, Clone)]
pub struct FileSubscriberLog {
    path: PathBuf,
}

impl FileSubscriberLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SubscriberLog for FileSubscriberLog {
    async fn append(&self, record: &SubscriberRecord) -> Result<(), SubscriberLogError> {
        let line = record.to_log_line()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.sync_data().await?;
        Ok(())
    }
}
