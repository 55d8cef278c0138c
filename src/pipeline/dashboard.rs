//! BI settings (`<dataset>-bi-settings.json`) derived from a sample record.
//!
//! Only the sample's field names are inspected. Dimensions are the district and
//! county columns, the metric vocabulary is fixed, and a map block is added when
//! the sample carries `LATITUDE` and `LONGITUDE`. A few datasets get extra map
//! settings from [`MAP_OVERRIDES`].

use crate::constants::BRIDGE_CONDITION_OWNER_AREA;
use crate::types::Record;
use serde::Serialize;

pub const METRICS: [&str; 1] = ["Dataset Records"];
pub const AGGREGATION_TYPES: [&str; 1] = ["Count"];
pub const ORDER_BY: [&str; 2] = ["Dimension", "Metric Agg Result"];
pub const ORDER: [&str; 2] = ["Ascending", "Descending"];

const DIMENSION_FIELDS: [&str; 2] = ["DISTRICT", "COUNTY"];
const LATITUDE_FIELD: &str = "LATITUDE";
const LONGITUDE_FIELD: &str = "LONGITUDE";

/// Extra map settings for one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOverride {
    pub cluster_default: bool,
    pub district_field: &'static str,
    pub county_field: &'static str,
    pub default_color_field: &'static str,
    pub color_field_options: &'static [&'static str],
}

/// Datasets whose map block carries extra settings, keyed by dataset name.
pub const MAP_OVERRIDES: &[(&str, MapOverride)] = &[(
    BRIDGE_CONDITION_OWNER_AREA,
    MapOverride {
        cluster_default: true,
        district_field: "DISTRICT",
        county_field: "COUNTY",
        default_color_field: "GFP",
        color_field_options: &["GFP", "OWNERSHIP", "OWNER", "LOAD_RATING_AGENCY", "NHS"],
    },
)];

pub fn map_override(dataset: &str) -> Option<&'static MapOverride> {
    MAP_OVERRIDES
        .iter()
        .find(|(name, _)| *name == dataset)
        .map(|(_, o)| o)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    pub latitude_field: String,
    pub longitude_field: String,
    #[serde(flatten)]
    pub extra: Option<MapOverride>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    pub dataset_name: String,
    pub index_file: String,
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
    pub aggregation_types: Vec<String>,
    pub order_by: Vec<String>,
    pub order: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<MapConfig>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl DashboardConfig {
    pub fn derive(dataset: &str, index_file: &str, sample: &Record) -> Self {
        let dimensions = sample
            .field_names()
            .filter(|name| DIMENSION_FIELDS.contains(&name.to_uppercase().as_str()))
            .map(str::to_string)
            .collect();

        let map = (sample.contains(LATITUDE_FIELD) && sample.contains(LONGITUDE_FIELD)).then(|| MapConfig {
            latitude_field: LATITUDE_FIELD.to_string(),
            longitude_field: LONGITUDE_FIELD.to_string(),
            extra: map_override(dataset).cloned(),
        });

        Self {
            dataset_name: dataset.to_string(),
            index_file: index_file.to_string(),
            dimensions,
            metrics: strings(&METRICS),
            aggregation_types: strings(&AGGREGATION_TYPES),
            order_by: strings(&ORDER_BY),
            order: strings(&ORDER),
            map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::index_file_name;
    use serde_json::json;

    fn settings(dataset: &str, sample: &Record) -> DashboardConfig {
        DashboardConfig::derive(dataset, &index_file_name(dataset), sample)
    }

    fn sample(fields: &[&str]) -> Record {
        Record::from_pairs(fields.iter().map(|f| (*f, "x")))
    }

    #[test]
    fn dimensions_match_district_and_county_case_insensitively() {
        let config = settings("ds", &sample(&["County", "NAME", "DISTRICT", "district_id"]));
        assert_eq!(config.dimensions, vec!["County", "DISTRICT"]);
        assert_eq!(config.index_file, "ds.index.json");
        assert!(config.map.is_none());
    }

    #[test]
    fn fixed_vocabulary_for_empty_sample() {
        let config = settings("ds", &Record::new());
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            json!({
                "datasetName": "ds",
                "indexFile": "ds.index.json",
                "dimensions": [],
                "metrics": ["Dataset Records"],
                "aggregationTypes": ["Count"],
                "orderBy": ["Dimension", "Metric Agg Result"],
                "order": ["Ascending", "Descending"],
            })
        );
    }

    #[test]
    fn map_requires_both_coordinates_in_exact_case() {
        assert!(settings("ds", &sample(&["LATITUDE"])).map.is_none());
        assert!(settings("ds", &sample(&["latitude", "longitude"])).map.is_none());

        let config = settings("ds", &sample(&["LATITUDE", "LONGITUDE"]));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["map"], json!({ "latitudeField": "LATITUDE", "longitudeField": "LONGITUDE" }));
    }

    #[test]
    fn bridge_dataset_gets_cluster_and_color_settings() {
        let config = settings(
            BRIDGE_CONDITION_OWNER_AREA,
            &sample(&["DISTRICT", "COUNTY", "LATITUDE", "LONGITUDE", "GFP"]),
        );
        let json = serde_json::to_string(&config.map).unwrap();
        assert_eq!(
            json,
            r#"{"latitudeField":"LATITUDE","longitudeField":"LONGITUDE","clusterDefault":true,"districtField":"DISTRICT","countyField":"COUNTY","defaultColorField":"GFP","colorFieldOptions":["GFP","OWNERSHIP","OWNER","LOAD_RATING_AGENCY","NHS"]}"#
        );
    }

    #[test]
    fn bridge_dataset_without_coordinates_has_no_map() {
        let config = settings(BRIDGE_CONDITION_OWNER_AREA, &sample(&["DISTRICT", "COUNTY"]));
        assert!(config.map.is_none());
    }
}
