//! CSV text <-> [`Record`] conversion backed by the `csv` crate.
//!
//! Parsing treats the first row as the header; every later row must have the
//! same number of fields or the whole document is rejected. Writing quotes
//! fields only when they contain a delimiter, quote or line break.

use crate::error::Result;
use crate::types::Record;
use csv::{ReaderBuilder, WriterBuilder};

const UTF8_BOM: char = '\u{feff}';

/// A parsed CSV document.
#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

pub fn parse_records(text: &str) -> Result<ParsedCsv> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        // A repeated column keeps its first position and takes its last value
        records.push(Record::from_pairs(
            columns.iter().map(String::as_str).zip(row.iter()),
        ));
    }

    let mut headers: Vec<String> = Vec::with_capacity(columns.len());
    for column in columns {
        if !headers.contains(&column) {
            headers.push(column);
        }
    }
    Ok(ParsedCsv { headers, records })
}

/// Serialize `records` under `headers`. Fields missing from a record are written empty.
pub fn write_records(headers: &[String], records: &[Record]) -> Result<String> {
    if headers.is_empty() {
        return Ok(String::new());
    }
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(headers)?;
    for record in records {
        writer.write_record(headers.iter().map(|h| record.get(h).unwrap_or("")))?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows_in_order() {
        let parsed = parse_records("DISTRICT,COUNTY\nDistrict 1,Adair\nVarious,\n").unwrap();
        assert_eq!(parsed.headers, vec!["DISTRICT", "COUNTY"]);
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].get("COUNTY"), Some("Adair"));
        assert_eq!(parsed.records[1].get("DISTRICT"), Some("Various"));
        assert_eq!(parsed.records[1].get("COUNTY"), Some(""));
    }

    #[test]
    fn strips_leading_bom() {
        let parsed = parse_records("\u{feff}DISTRICT\nDistrict 2\n").unwrap();
        assert_eq!(parsed.headers, vec!["DISTRICT"]);
        assert_eq!(parsed.records[0].get("DISTRICT"), Some("District 2"));
    }

    #[test]
    fn repeated_columns_collapse_to_first_position_with_last_value() {
        let parsed = parse_records("DISTRICT,X,Y,X\nDistrict 1,a,c,b\n").unwrap();
        assert_eq!(parsed.headers, vec!["DISTRICT", "X", "Y"]);
        assert_eq!(parsed.records[0].field_names().collect::<Vec<_>>(), vec!["DISTRICT", "X", "Y"]);
        assert_eq!(parsed.records[0].get("X"), Some("b"));

        let text = write_records(&parsed.headers, &parsed.records).unwrap();
        assert_eq!(text, "DISTRICT,X,Y\nDistrict 1,b,c\n");
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(parse_records("A,B\n1,2\n3\n").is_err());
    }

    #[test]
    fn empty_text_has_no_header_and_writes_nothing() {
        let parsed = parse_records("").unwrap();
        assert!(parsed.headers.is_empty());
        assert!(parsed.records.is_empty());
        assert_eq!(write_records(&parsed.headers, &parsed.records).unwrap(), "");
    }

    #[test]
    fn writes_header_only_for_empty_partition() {
        let headers = vec!["DISTRICT".to_string(), "NAME".to_string()];
        assert_eq!(write_records(&headers, &[]).unwrap(), "DISTRICT,NAME\n");
    }

    #[test]
    fn quotes_embedded_commas_quotes_and_newlines() {
        let headers = vec!["DISTRICT".to_string(), "NOTE".to_string()];
        let records = vec![Record::from_pairs([
            ("DISTRICT", "District 04"),
            ("NOTE", "a, \"b\"\nc"),
        ])];
        let text = write_records(&headers, &records).unwrap();
        assert_eq!(text, "DISTRICT,NOTE\nDistrict 04,\"a, \"\"b\"\"\nc\"\n");

        let reparsed = parse_records(&text).unwrap();
        assert_eq!(reparsed.records[0].get("NOTE"), Some("a, \"b\"\nc"));
    }
}
