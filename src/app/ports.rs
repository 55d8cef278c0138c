use crate::error::Result;
use crate::types::DatasetDescriptor;
use async_trait::async_trait;
use std::path::Path;

/// Retrieves the raw CSV text of a dataset.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, dataset: &DatasetDescriptor) -> Result<String>;
}

/// Durably stores output files.
#[async_trait]
pub trait Writer: Send + Sync {
    /// Ensure `dir` exists and holds nothing from previous runs.
    async fn reset_dir(&self, dir: &Path) -> Result<()>;

    /// Write `contents` to `path`, creating parent directories as needed.
    async fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
}
