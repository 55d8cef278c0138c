// Partitioning pipeline, leaf-first:
// district -> partition -> manifest / dashboard -> orchestrator
pub mod dashboard;
pub mod district;
pub mod manifest;
pub mod orchestrator;
pub mod partition;

pub use dashboard::DashboardConfig;
pub use district::{normalize_district, NormalizedDistrict};
pub use manifest::Manifest;
pub use orchestrator::{build_artifacts, DatasetArtifacts, DatasetReport, Pipeline};
pub use partition::{partition_records, Partitioned};
