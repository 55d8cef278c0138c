use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use trak_etl::app::ports::{Fetcher, Writer};
use trak_etl::config::Config;
use trak_etl::constants::{self, partition_file_name};
use trak_etl::infra::{FsWriter, HttpFetcher, InMemoryWriter, SnapshotFetcher};
use trak_etl::pipeline::{DatasetReport, Pipeline};

#[derive(Parser)]
#[command(name = "trak_etl")]
#[command(about = "Partition TRAK data hub datasets by district for BI dashboards")]
#[command(version)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = constants::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override the output root (one directory per dataset is created beneath it)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Override where raw downloads are saved and read back from
    #[arg(long, global = true)]
    raw_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download, snapshot and partition each dataset
    Run {
        /// Specific datasets to run (comma-separated)
        #[arg(long)]
        datasets: Option<String>,
        /// Partition without writing any files
        #[arg(long)]
        dry_run: bool,
    },
    /// Download raw snapshots only
    Fetch {
        /// Specific datasets to download (comma-separated)
        #[arg(long)]
        datasets: Option<String>,
    },
    /// Partition previously downloaded snapshots
    Partition {
        /// Specific datasets to process (comma-separated)
        #[arg(long)]
        datasets: Option<String>,
        /// Partition without writing any files
        #[arg(long)]
        dry_run: bool,
    },
}

fn print_report(report: &DatasetReport, dry_run: bool) {
    println!("\n📊 Results for {}:", report.dataset);
    for (district, count) in &report.partition_counts {
        println!("   {}: {} records", partition_file_name(&report.dataset, district), count);
    }
    println!("   Total rows: {}", report.total_records);
    println!("   Processed: {}", report.processed);
    println!("   Skipped: {}", report.skipped);
    if !report.skipped_samples.is_empty() {
        println!("   Skipped examples: {}", report.skipped_samples.join(", "));
    }
    if dry_run {
        println!("   Output directory (dry run, nothing written): {}", report.output_dir.display());
    } else {
        println!("   Output directory: {}", report.output_dir.display());
    }
}

async fn partition_datasets(
    config: &Config,
    fetcher: Arc<dyn Fetcher>,
    filter: Option<&str>,
    dry_run: bool,
    snapshot: bool,
) -> anyhow::Result<()> {
    let datasets = config.select_datasets(filter)?;
    let writer: Arc<dyn Writer> = if dry_run {
        Arc::new(InMemoryWriter::new())
    } else {
        Arc::new(FsWriter)
    };
    let mut pipeline = Pipeline::new(fetcher, writer, &config.output_dir);
    if snapshot && config.save_raw_snapshots && !dry_run {
        pipeline = pipeline.with_raw_snapshots(&config.raw_dir);
    }

    for dataset in &datasets {
        let report = pipeline
            .run_dataset(dataset)
            .await
            .with_context(|| format!("dataset {} failed", dataset.name))?;
        print_report(&report, dry_run);
    }
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load(&cli.config)?;
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(dir) = &cli.raw_dir {
        config.raw_dir = dir.clone();
    }
    Ok(config)
}

async fn run(command: Commands, config: Config) -> anyhow::Result<()> {
    if let Some(port) = config.metrics_port {
        trak_etl::metrics::init_metrics(port);
    }

    match command {
        Commands::Run { datasets, dry_run } => {
            println!("🚀 Running full pipeline (fetch + partition)...");
            partition_datasets(&config, Arc::new(HttpFetcher::new()), datasets.as_deref(), dry_run, true).await?;
        }
        Commands::Fetch { datasets } => {
            println!("📥 Downloading raw snapshots...");
            let pipeline = Pipeline::new(Arc::new(HttpFetcher::new()), Arc::new(FsWriter), &config.output_dir)
                .with_raw_snapshots(&config.raw_dir);
            for dataset in config.select_datasets(datasets.as_deref())? {
                let path = pipeline
                    .fetch_only(&dataset)
                    .await
                    .with_context(|| format!("download of {} failed", dataset.name))?;
                println!("💾 Saved {} to {}", dataset.name, path.display());
            }
        }
        Commands::Partition { datasets, dry_run } => {
            println!("🔨 Partitioning raw snapshots...");
            let fetcher = Arc::new(SnapshotFetcher::new(&config.raw_dir));
            partition_datasets(&config, fetcher, datasets.as_deref(), dry_run, false).await?;
        }
    }
    info!("All datasets completed");
    println!("\n✅ Done");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ ETL failed: {:#}", e);
            std::process::exit(1);
        }
    };
    let log_guard = trak_etl::logging::init_logging(&config.log_dir);

    if let Err(e) = run(cli.command, config).await {
        error!("ETL failed: {:#}", e);
        eprintln!("❌ ETL failed: {:#}", e);
        // exit() skips destructors; flush the file log first
        drop(log_guard);
        std::process::exit(1);
    }
}
