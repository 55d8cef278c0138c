use crate::app::ports::{Fetcher, Writer};
use crate::error::{EtlError, Result};
use crate::types::DatasetDescriptor;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// In-memory writer for dry runs and tests
#[derive(Clone, Default)]
pub struct InMemoryWriter {
    files: Arc<Mutex<BTreeMap<PathBuf, Vec<u8>>>>,
}

impl InMemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    pub fn get_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.get(path).map(|b| String::from_utf8_lossy(&b).into_owned())
    }

    /// Paths currently held, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl Writer for InMemoryWriter {
    async fn reset_dir(&self, dir: &Path) -> Result<()> {
        let mut files = self.files.lock().unwrap();
        files.retain(|path, _| !path.starts_with(dir));
        debug!("Cleared in-memory directory {}", dir.display());
        Ok(())
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}

/// Serves fixed CSV text per dataset name; unknown datasets fail like a 404.
#[derive(Clone, Default)]
pub struct StaticFetcher {
    sources: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, dataset: impl Into<String>, text: impl Into<String>) -> Self {
        self.sources.insert(dataset.into(), text.into());
        self
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, dataset: &DatasetDescriptor) -> Result<String> {
        self.sources
            .get(&dataset.name)
            .cloned()
            .ok_or_else(|| EtlError::Fetch {
                url: dataset.url.clone(),
                status: 404,
            })
    }
}
