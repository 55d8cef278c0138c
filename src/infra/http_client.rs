use crate::app::ports::Fetcher;
use crate::error::{EtlError, Result};
use crate::types::DatasetDescriptor;
use async_trait::async_trait;
use tracing::info;

/// Downloads dataset CSVs over HTTP.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, dataset: &DatasetDescriptor) -> Result<String> {
        info!("Downloading {} ...", dataset.url);
        let resp = self.client.get(&dataset.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(EtlError::Fetch {
                url: dataset.url.clone(),
                status: status.as_u16(),
            });
        }
        let text = resp.text().await?;
        info!("Downloaded {} bytes for {}", text.len(), dataset.name);
        Ok(text)
    }
}
