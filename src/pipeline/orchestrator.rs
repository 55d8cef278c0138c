use crate::app::ports::{Fetcher, Writer};
use crate::constants::{bi_settings_file_name, index_file_name, partition_file_name, raw_snapshot_file_name};
use crate::error::{EtlError, Result};
use crate::infra::csv_codec;
use crate::pipeline::dashboard::DashboardConfig;
use crate::pipeline::manifest::Manifest;
use crate::pipeline::partition::partition_records;
use crate::types::{DatasetDescriptor, Record};
use metrics::{counter, histogram};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Outcome of partitioning one dataset
#[derive(Debug, Clone)]
pub struct DatasetReport {
    pub dataset: String,
    pub total_records: usize,
    pub processed: usize,
    pub skipped: usize,
    pub skipped_samples: Vec<String>,
    /// `(district key, records)` in key order.
    pub partition_counts: Vec<(String, usize)>,
    pub output_dir: PathBuf,
}

/// Every file produced for one dataset, ready to hand to a [`Writer`].
#[derive(Debug, Clone)]
pub struct DatasetArtifacts {
    /// `(file name, contents)`: the partitions in key order, then index, then BI settings.
    pub files: Vec<(String, Vec<u8>)>,
    pub manifest: Manifest,
    pub dashboard: DashboardConfig,
    pub report: DatasetReport,
}

fn to_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json.into_bytes())
}

/// Parse, partition and derive metadata for one dataset's raw CSV text.
pub fn build_artifacts(dataset: &str, text: &str) -> Result<DatasetArtifacts> {
    let parsed = csv_codec::parse_records(text)?;
    let total_records = parsed.records.len();
    let first_raw: Option<Record> = parsed.records.first().cloned();

    let partitioned = partition_records(parsed.records);

    let mut files = Vec::with_capacity(partitioned.iter().count() + 2);
    let mut partition_counts = Vec::new();
    for (key, records) in partitioned.iter() {
        let content = csv_codec::write_records(&parsed.headers, records)?;
        files.push((partition_file_name(dataset, key), content.into_bytes()));
        partition_counts.push((key.to_string(), records.len()));
        debug!("Partition {}: {} records", key, records.len());
    }

    let manifest = Manifest::build(dataset, &partitioned);
    let index_file = index_file_name(dataset);
    files.push((index_file.clone(), to_json_bytes(&manifest)?));

    let empty = Record::new();
    let sample = partitioned
        .first_placed()
        .or(first_raw.as_ref())
        .unwrap_or(&empty);
    let dashboard = DashboardConfig::derive(dataset, &index_file, sample);
    files.push((bi_settings_file_name(dataset), to_json_bytes(&dashboard)?));

    let report = DatasetReport {
        dataset: dataset.to_string(),
        total_records,
        processed: partitioned.processed,
        skipped: partitioned.skipped,
        skipped_samples: partitioned.skipped_samples.clone(),
        partition_counts,
        output_dir: PathBuf::new(),
    };

    Ok(DatasetArtifacts {
        files,
        manifest,
        dashboard,
        report,
    })
}

/// Runs datasets one at a time: fetch, snapshot, partition, write.
pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    writer: Arc<dyn Writer>,
    output_dir: PathBuf,
    raw_dir: Option<PathBuf>,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn Fetcher>, writer: Arc<dyn Writer>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            writer,
            output_dir: output_dir.into(),
            raw_dir: None,
        }
    }

    /// Save each downloaded source text to `<raw_dir>/<dataset>.csv` before partitioning.
    pub fn with_raw_snapshots(mut self, raw_dir: impl Into<PathBuf>) -> Self {
        self.raw_dir = Some(raw_dir.into());
        self
    }

    pub fn dataset_dir(&self, dataset: &str) -> PathBuf {
        self.output_dir.join(dataset)
    }

    async fn fetch_text(&self, dataset: &DatasetDescriptor) -> Result<String> {
        let t_fetch = Instant::now();
        let text = self.fetcher.fetch(dataset).await?;
        histogram!("trak_etl_fetch_duration_seconds", "dataset" => dataset.name.clone())
            .record(t_fetch.elapsed().as_secs_f64());

        if let Some(raw_dir) = &self.raw_dir {
            let path = raw_dir.join(raw_snapshot_file_name(&dataset.name));
            self.writer.write(&path, text.as_bytes()).await?;
            info!("Saved to {}", path.display());
        }
        Ok(text)
    }

    /// Download a dataset and store its raw snapshot without partitioning it.
    #[instrument(skip(self, dataset), fields(dataset = %dataset.name))]
    pub async fn fetch_only(&self, dataset: &DatasetDescriptor) -> Result<PathBuf> {
        let raw_dir = self
            .raw_dir
            .as_ref()
            .ok_or_else(|| EtlError::Config("raw snapshot directory is not set".to_string()))?;
        self.fetch_text(dataset).await?;
        Ok(raw_dir.join(raw_snapshot_file_name(&dataset.name)))
    }

    /// Fetch and partition one dataset, replacing its output directory.
    #[instrument(skip(self, dataset), fields(dataset = %dataset.name))]
    pub async fn run_dataset(&self, dataset: &DatasetDescriptor) -> Result<DatasetReport> {
        counter!("trak_etl_runs_total", "dataset" => dataset.name.clone()).increment(1);
        let t_dataset = Instant::now();

        let text = self.fetch_text(dataset).await?;
        let artifacts = build_artifacts(&dataset.name, &text)?;

        let out_dir = self.dataset_dir(&dataset.name);
        self.write_artifacts(&out_dir, &artifacts.files).await?;
        counter!("trak_etl_files_written_total", "dataset" => dataset.name.clone())
            .increment(artifacts.files.len() as u64);

        let mut report = artifacts.report;
        report.output_dir = out_dir;

        counter!("trak_etl_records_placed_total", "dataset" => dataset.name.clone())
            .increment(report.processed as u64);
        counter!("trak_etl_records_dropped_total", "dataset" => dataset.name.clone())
            .increment(report.skipped as u64);
        histogram!("trak_etl_dataset_duration_seconds", "dataset" => dataset.name.clone())
            .record(t_dataset.elapsed().as_secs_f64());

        info!("Wrote partitions, index, and BI settings for {}", dataset.name);
        if report.skipped > 0 {
            info!(
                "{}: processed {} records, skipped {} invalid district values (examples: {})",
                dataset.name,
                report.processed,
                report.skipped,
                report.skipped_samples.join(", ")
            );
        } else {
            info!("{}: processed {} records, skipped 0 invalid district values", dataset.name, report.processed);
        }
        Ok(report)
    }

    async fn write_artifacts(&self, out_dir: &Path, files: &[(String, Vec<u8>)]) -> Result<()> {
        self.writer.reset_dir(out_dir).await?;
        for (name, contents) in files {
            self.writer.write(&out_dir.join(name), contents).await?;
        }
        Ok(())
    }

    /// Process datasets in order, stopping at the first failure.
    pub async fn run_all(&self, datasets: &[DatasetDescriptor]) -> Result<Vec<DatasetReport>> {
        let mut reports = Vec::with_capacity(datasets.len());
        for dataset in datasets {
            reports.push(self.run_dataset(dataset).await?);
        }
        Ok(reports)
    }
}
