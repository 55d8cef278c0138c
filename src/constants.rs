/// District keys every dataset is partitioned into, in output order.
pub const DISTRICTS: [&str; 13] = [
    "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12", "Various",
];

/// Field carrying the raw district label in every source dataset.
pub const DISTRICT_FIELD: &str = "DISTRICT";

/// Maximum number of rejected district values kept for the run summary.
pub const MAX_SKIPPED_SAMPLES: usize = 5;

/// Placeholder reported for blank district values.
pub const EMPTY_SAMPLE: &str = "(empty)";

/// Number of leading rows whose district normalization is logged at debug level.
pub const DEBUG_ROW_LIMIT: usize = 10;

// Dataset identifiers published on the TRAK data hub
pub const BRIDGE_CONDITION_OWNER_AREA: &str = "eda_assets_bridge_condition_owner_area";
pub const CONSTRUCTION_PROCUREMENT: &str = "eda_construction_procurement";
pub const CURRENT_ENACT_PLAN: &str = "eda_current_enact_plan_data_set";
pub const PROGRAM_MANAGEMENT_AUTHORIZED: &str = "eda_programmanagement_authorized_detailed";

pub const DATA_HUB_BASE_URL: &str = "https://storage.googleapis.com/kytc-trak/data_hub_csv";

// Default locations, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "trak_etl.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "data/report";
pub const DEFAULT_RAW_DIR: &str = "data/raw";
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Get all datasets processed when no `[[datasets]]` are configured
pub fn default_dataset_names() -> Vec<&'static str> {
    vec![
        BRIDGE_CONDITION_OWNER_AREA,
        CONSTRUCTION_PROCUREMENT,
        CURRENT_ENACT_PLAN,
        PROGRAM_MANAGEMENT_AUTHORIZED,
    ]
}

/// File name of one district partition, e.g. `foo-District-03.csv`
pub fn partition_file_name(dataset: &str, district: &str) -> String {
    format!("{dataset}-District-{district}.csv")
}

pub fn index_file_name(dataset: &str) -> String {
    format!("{dataset}.index.json")
}

pub fn bi_settings_file_name(dataset: &str) -> String {
    format!("{dataset}-bi-settings.json")
}

pub fn raw_snapshot_file_name(dataset: &str) -> String {
    format!("{dataset}.csv")
}
