use crate::constants::DISTRICTS;
use once_cell::sync::Lazy;
use regex::Regex;

static DISTRICT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^district\s*([0-9]{1,2})$").expect("valid district regex"));

/// A district label mapped onto one of the fixed partition keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDistrict {
    /// Partition key, `"01"`..`"12"` or `"Various"`.
    pub key: &'static str,
    /// Display label written back into the record's district field.
    pub label: String,
}

/// Map a raw district value to its partition key.
///
/// Accepts `District <n>` (any case, optional whitespace, one or two digits) and
/// `Various`. Returns `None` for anything else, including syntactically valid
/// district numbers outside 1..=12.
pub fn normalize_district(raw: &str) -> Option<NormalizedDistrict> {
    let trimmed = raw.trim();

    let (candidate, label) = if let Some(caps) = DISTRICT_PATTERN.captures(trimmed) {
        let padded = format!("{:0>2}", &caps[1]);
        let label = format!("District {padded}");
        (padded, label)
    } else if trimmed.eq_ignore_ascii_case("various") {
        ("Various".to_string(), "Various".to_string())
    } else {
        return None;
    };

    // "District 13" and "District 00" match the pattern but are not districts
    let key = DISTRICTS.iter().copied().find(|k| *k == candidate)?;
    Some(NormalizedDistrict { key, label })
}
