use crate::constants::{DEBUG_ROW_LIMIT, DISTRICTS, DISTRICT_FIELD, EMPTY_SAMPLE, MAX_SKIPPED_SAMPLES};
use crate::pipeline::district::normalize_district;
use crate::types::Record;
use std::collections::BTreeMap;
use tracing::debug;

/// Records of one dataset grouped by district key, plus drop accounting.
#[derive(Debug, Clone)]
pub struct Partitioned {
    partitions: BTreeMap<&'static str, Vec<Record>>,
    /// Records placed into some partition.
    pub processed: usize,
    /// Records dropped for an unrecognized district value.
    pub skipped: usize,
    /// First few distinct rejected raw values.
    pub skipped_samples: Vec<String>,
    first_placed: Option<Record>,
}

impl Partitioned {
    /// Records for `district`; empty for keys outside the fixed set.
    pub fn records(&self, district: &str) -> &[Record] {
        self.partitions.get(district).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(key, records)` for every fixed district key, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[Record])> + '_ {
        DISTRICTS.iter().map(move |d| (*d, self.records(d)))
    }

    /// First record placed into any partition, in input order.
    pub fn first_placed(&self) -> Option<&Record> {
        self.first_placed.as_ref()
    }
}

/// Split `records` by normalized district, rewriting each placed record's
/// district field to its display label. Unrecognized rows are dropped.
pub fn partition_records(records: Vec<Record>) -> Partitioned {
    let mut partitions: BTreeMap<&'static str, Vec<Record>> =
        DISTRICTS.iter().map(|d| (*d, Vec::new())).collect();
    let mut processed = 0;
    let mut skipped = 0;
    let mut skipped_samples: Vec<String> = Vec::new();
    let mut first_placed: Option<Record> = None;

    for (idx, mut record) in records.into_iter().enumerate() {
        let raw = record.get(DISTRICT_FIELD).unwrap_or("").trim().to_string();

        let Some(district) = normalize_district(&raw) else {
            skipped += 1;
            let sample = if raw.is_empty() { EMPTY_SAMPLE.to_string() } else { raw };
            if skipped_samples.len() < MAX_SKIPPED_SAMPLES && !skipped_samples.contains(&sample) {
                skipped_samples.push(sample);
            }
            continue;
        };

        if idx < DEBUG_ROW_LIMIT {
            debug!("Row {}: DISTRICT raw='{}' normalized='{}'", idx, raw, district.label);
        }
        record.set(DISTRICT_FIELD, district.label);
        if first_placed.is_none() {
            first_placed = Some(record.clone());
        }
        partitions.entry(district.key).or_default().push(record);
        processed += 1;
    }

    Partitioned {
        partitions,
        processed,
        skipped,
        skipped_samples,
        first_placed,
    }
}
