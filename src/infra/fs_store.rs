use crate::app::ports::{Fetcher, Writer};
use crate::constants::raw_snapshot_file_name;
use crate::error::{EtlError, Result};
use crate::types::DatasetDescriptor;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Writes output files to the local filesystem.
pub struct FsWriter;

#[async_trait]
impl Writer for FsWriter {
    async fn reset_dir(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).await?;
        let mut entries = fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                fs::remove_dir_all(&path).await?;
            } else {
                fs::remove_file(&path).await?;
            }
            debug!("Removed stale output {}", path.display());
        }
        Ok(())
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let wrap = |source: std::io::Error| EtlError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(wrap)?;
        }
        fs::write(path, contents).await.map_err(wrap)?;
        Ok(())
    }
}

/// Reads datasets back from raw snapshots saved by an earlier download.
pub struct SnapshotFetcher {
    raw_dir: PathBuf,
}

impl SnapshotFetcher {
    pub fn new(raw_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
        }
    }

    pub fn snapshot_path(&self, dataset: &str) -> PathBuf {
        self.raw_dir.join(raw_snapshot_file_name(dataset))
    }
}

#[async_trait]
impl Fetcher for SnapshotFetcher {
    async fn fetch(&self, dataset: &DatasetDescriptor) -> Result<String> {
        let path = self.snapshot_path(&dataset.name);
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(EtlError::SnapshotMissing(path)),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn reset_dir_clears_previous_contents() {
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("ds");
        let writer = FsWriter;

        writer.write(&out.join("stale.csv"), b"old").await.unwrap();
        writer.write(&out.join("nested/also-stale.csv"), b"old").await.unwrap();
        writer.reset_dir(&out).await.unwrap();

        assert!(out.is_dir());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn snapshot_fetcher_reads_saved_file_and_reports_missing() {
        let tmp = tempdir().unwrap();
        let fetcher = SnapshotFetcher::new(tmp.path());
        std::fs::write(tmp.path().join("present.csv"), "DISTRICT\nDistrict 1\n").unwrap();

        let text = fetcher
            .fetch(&DatasetDescriptor::new("present", "https://example.invalid/present.csv"))
            .await
            .unwrap();
        assert_eq!(text, "DISTRICT\nDistrict 1\n");

        let err = fetcher
            .fetch(&DatasetDescriptor::new("absent", "https://example.invalid/absent.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, EtlError::SnapshotMissing(_)));
    }
}
