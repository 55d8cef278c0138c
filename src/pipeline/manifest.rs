use crate::constants::partition_file_name;
use crate::pipeline::partition::Partitioned;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Record counts for one dataset's partition files (`<dataset>.index.json`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub total_records: usize,
    /// `(partition file name, records)` in district key order.
    pub files: Vec<(String, usize)>,
}

impl Manifest {
    pub fn build(dataset: &str, partitioned: &Partitioned) -> Self {
        let files = partitioned
            .iter()
            .map(|(key, records)| (partition_file_name(dataset, key), records.len()))
            .collect();
        Self {
            total_records: partitioned.processed,
            files,
        }
    }
}

#[derive(serde::Serialize)]
struct FileEntry {
    records: usize,
}

// Flat object: `totalRecords` followed by one `{ "records": n }` entry per file.
impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.files.len() + 1))?;
        map.serialize_entry("totalRecords", &self.total_records)?;
        for (name, records) in &self.files {
            map.serialize_entry(name, &FileEntry { records: *records })?;
        }
        map.end()
    }
}
