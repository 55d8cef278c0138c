use crate::constants::{
    default_dataset_names, raw_snapshot_file_name, DATA_HUB_BASE_URL, DEFAULT_LOG_DIR, DEFAULT_OUTPUT_DIR,
    DEFAULT_RAW_DIR,
};
use crate::error::{EtlError, Result};
use crate::types::DatasetDescriptor;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_dir: PathBuf,
    pub raw_dir: PathBuf,
    pub log_dir: PathBuf,
    pub save_raw_snapshots: bool,
    pub metrics_port: Option<u16>,
    pub datasets: Vec<DatasetDescriptor>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            raw_dir: PathBuf::from(DEFAULT_RAW_DIR),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            save_raw_snapshots: true,
            metrics_port: None,
            datasets: default_datasets(),
        }
    }
}

/// The TRAK data hub datasets processed when none are configured.
pub fn default_datasets() -> Vec<DatasetDescriptor> {
    default_dataset_names()
        .into_iter()
        .map(|name| DatasetDescriptor::new(name, format!("{}/{}", DATA_HUB_BASE_URL, raw_snapshot_file_name(name))))
        .collect()
}

impl Config {
    /// Load `path` if it exists (built-in defaults otherwise), then apply
    /// `TRAK_ETL_*` environment overrides and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| EtlError::Config(format!("Failed to read config file '{}': {}", path.display(), e)))?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        if config.datasets.is_empty() {
            config.datasets = default_datasets();
        }
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(dir) = env_var("TRAK_ETL_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env_var("TRAK_ETL_RAW_DIR") {
            self.raw_dir = PathBuf::from(dir);
        }
        if let Some(port) = env_var("TRAK_ETL_METRICS_PORT") {
            let port = port
                .parse()
                .map_err(|_| EtlError::Config(format!("TRAK_ETL_METRICS_PORT is not a port: {port}")))?;
            self.metrics_port = Some(port);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for ds in &self.datasets {
            if ds.name.trim().is_empty() {
                return Err(EtlError::Config("dataset name must not be empty".to_string()));
            }
            if ds.name.contains(['/', '\\']) || ds.name == "." || ds.name == ".." {
                return Err(EtlError::Config(format!("dataset name is not a plain file name: {}", ds.name)));
            }
            if !seen.insert(ds.name.as_str()) {
                return Err(EtlError::Config(format!("duplicate dataset: {}", ds.name)));
            }
        }
        Ok(())
    }

    /// Datasets to run: all of them, or those named in a comma-separated filter.
    pub fn select_datasets(&self, filter: Option<&str>) -> Result<Vec<DatasetDescriptor>> {
        let Some(filter) = filter else {
            return Ok(self.datasets.clone());
        };
        filter
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|name| {
                self.datasets
                    .iter()
                    .find(|ds| ds.name == name)
                    .cloned()
                    .ok_or_else(|| EtlError::Config(format!("unknown dataset: {name}")))
            })
            .collect()
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
