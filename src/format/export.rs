//! Flat-file export of comparison results.
//!
//! Two interchangeable formats: delimited CSV with a header row derived from
//! the flattened field names, and a JSON document embedding a field schema
//! alongside the row data. Both are re-parseable here, and both preserve
//! numeric types for prices and profit and string types for titles and links.

use crate::matcher::{ComparisonResults, MatchedPair};
use crate::serp::Marketplace;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CSV_HEADER: &str = "source_marketplace,source_title,source_price,source_thumbnail,\
source_link,candidate_marketplace,candidate_title,candidate_price,candidate_thumbnail,\
candidate_link,profit";

const FIELD_COUNT: usize = 11;

/// One marketplace side of an exported pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSide {
    pub marketplace: String,
    pub title: String,
    pub price: Option<f64>,
    pub thumbnail: Option<String>,
    pub link: Option<String>,
}

/// A matched pair flattened for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub source: ExportSide,
    pub candidate: ExportSide,
    pub profit: f64,
}

impl ExportRecord {
    /// Flattens a matched pair, labeling each side with its marketplace.
    pub fn from_pair(pair: &MatchedPair, sell_on: Marketplace) -> Self {
        let side = |record: &crate::serp::ProductRecord, marketplace: Marketplace| ExportSide {
            marketplace: marketplace.label().to_string(),
            title: record.title.clone(),
            price: record.price,
            thumbnail: record.thumbnail.clone(),
            link: record.link.clone(),
        };

        Self {
            source: side(&pair.source, sell_on),
            candidate: side(&pair.candidate, sell_on.other()),
            profit: pair.profit,
        }
    }
}

/// Flattens a whole result set.
pub fn from_results(results: &ComparisonResults) -> Vec<ExportRecord> {
    results.pairs.iter().map(|pair| ExportRecord::from_pair(pair, results.sell_on)).collect()
}

/// Errors from re-parsing exported files.
#[derive(Debug, Error)]
pub enum ExportParseError {
    #[error("CSV input is missing the expected header row")]
    Header,

    #[error("CSV row {0} has {1} fields, expected 11")]
    FieldCount(usize, usize),

    #[error("CSV row {0}: {1:?} is not a number")]
    Number(usize, String),

    #[error("JSON export: {0}")]
    Json(#[from] serde_json::Error),
}

// JSON format

/// JSON export document: schema beside data.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDocument {
    pub schema: Schema,
    pub data: Vec<ExportRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

fn schema() -> Schema {
    let field = |name: &str, field_type: &str| Field {
        name: name.to_string(),
        field_type: field_type.to_string(),
    };

    Schema {
        fields: vec![
            field("source.marketplace", "string"),
            field("source.title", "string"),
            field("source.price", "number"),
            field("source.thumbnail", "string"),
            field("source.link", "string"),
            field("candidate.marketplace", "string"),
            field("candidate.title", "string"),
            field("candidate.price", "number"),
            field("candidate.thumbnail", "string"),
            field("candidate.link", "string"),
            field("profit", "number"),
        ],
    }
}

/// Serializes records to the schema-carrying JSON document.
pub fn to_json(records: &[ExportRecord]) -> String {
    let document = JsonDocument { schema: schema(), data: records.to_vec() };
    serde_json::to_string_pretty(&document).unwrap_or_else(|_| "{}".to_string())
}

/// Parses a JSON export document back into records.
pub fn from_json(input: &str) -> Result<Vec<ExportRecord>, ExportParseError> {
    let document: JsonDocument = serde_json::from_str(input)?;
    Ok(document.data)
}

// CSV format

/// Serializes records to CSV with a header row.
pub fn to_csv(records: &[ExportRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for record in records {
        let fields = [
            csv_escape(&record.source.marketplace),
            csv_escape(&record.source.title),
            number_field(record.source.price),
            optional_field(record.source.thumbnail.as_deref()),
            optional_field(record.source.link.as_deref()),
            csv_escape(&record.candidate.marketplace),
            csv_escape(&record.candidate.title),
            number_field(record.candidate.price),
            optional_field(record.candidate.thumbnail.as_deref()),
            optional_field(record.candidate.link.as_deref()),
            record.profit.to_string(),
        ];
        lines.push(fields.join(","));
    }

    lines.join("\n")
}

/// Parses CSV produced by [`to_csv`] back into records.
pub fn from_csv(input: &str) -> Result<Vec<ExportRecord>, ExportParseError> {
    let mut rows = split_csv(input).into_iter();

    let header = rows.next().ok_or(ExportParseError::Header)?;
    if header.join(",") != CSV_HEADER {
        return Err(ExportParseError::Header);
    }

    let mut records = Vec::new();

    for (index, row) in rows.enumerate() {
        let line = index + 2; // 1-based, after the header
        if row.len() != FIELD_COUNT {
            return Err(ExportParseError::FieldCount(line, row.len()));
        }

        let price = |value: &str| -> Result<Option<f64>, ExportParseError> {
            if value.is_empty() {
                return Ok(None);
            }
            value.parse().map(Some).map_err(|_| ExportParseError::Number(line, value.to_string()))
        };

        let optional =
            |value: &str| if value.is_empty() { None } else { Some(value.to_string()) };

        records.push(ExportRecord {
            source: ExportSide {
                marketplace: row[0].clone(),
                title: row[1].clone(),
                price: price(&row[2])?,
                thumbnail: optional(&row[3]),
                link: optional(&row[4]),
            },
            candidate: ExportSide {
                marketplace: row[5].clone(),
                title: row[6].clone(),
                price: price(&row[7])?,
                thumbnail: optional(&row[8]),
                link: optional(&row[9]),
            },
            profit: row[10]
                .parse()
                .map_err(|_| ExportParseError::Number(line, row[10].clone()))?,
        });
    }

    Ok(records)
}

fn number_field(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn optional_field(value: Option<&str>) -> String {
    value.map(csv_escape).unwrap_or_default()
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Splits CSV input into rows of unescaped fields. Quoted fields may contain
/// commas, doubled quotes, and newlines.
fn split_csv(input: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut field)),
                '\n' => {
                    fields.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut fields));
                }
                '\r' => {}
                _ => field.push(c),
            }
        }
    }

    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        rows.push(fields);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serp::ProductRecord;

    fn make_results() -> ComparisonResults {
        let mut results = ComparisonResults::new("mug", Marketplace::Walmart);
        results.pairs.push(MatchedPair {
            source: ProductRecord {
                title: "Red Mug".to_string(),
                price: Some(5.0),
                thumbnail: Some("https://i5.walmartimages.com/a.jpg".to_string()),
                link: Some("https://www.walmart.com/ip/1".to_string()),
            },
            candidate: ProductRecord {
                title: "Red Coffee Mug".to_string(),
                price: Some(4.0),
                thumbnail: None,
                link: Some("https://www.ebay.com/itm/2".to_string()),
            },
            profit: 1.0,
        });
        results.pairs.push(MatchedPair {
            source: ProductRecord::new("Mug, \"Deluxe\"", None),
            candidate: ProductRecord::new("Deluxe Mug", Some(12.34)),
            profit: 0.0,
        });
        results
    }

    #[test]
    fn test_from_results_labels_sides() {
        let records = from_results(&make_results());

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].source.marketplace, "Walmart");
        assert_eq!(records[0].candidate.marketplace, "eBay");
    }

    #[test]
    fn test_from_results_reverse_orientation() {
        let mut results = make_results();
        results.sell_on = Marketplace::Ebay;

        let records = from_results(&results);
        assert_eq!(records[0].source.marketplace, "eBay");
        assert_eq!(records[0].candidate.marketplace, "Walmart");
    }

    #[test]
    fn test_csv_header() {
        let csv = to_csv(&[]);
        assert_eq!(
            csv,
            "source_marketplace,source_title,source_price,source_thumbnail,source_link,\
             candidate_marketplace,candidate_title,candidate_price,candidate_thumbnail,\
             candidate_link,profit"
        );
    }

    #[test]
    fn test_csv_roundtrip() {
        let records = from_results(&make_results());
        let csv = to_csv(&records);
        let parsed = from_csv(&csv).unwrap();

        assert_eq!(parsed, records);
    }

    #[test]
    fn test_csv_escapes_commas_and_quotes() {
        let records = from_results(&make_results());
        let csv = to_csv(&records);

        assert!(csv.contains("\"Mug, \"\"Deluxe\"\"\""));

        let parsed = from_csv(&csv).unwrap();
        assert_eq!(parsed[1].source.title, "Mug, \"Deluxe\"");
    }

    #[test]
    fn test_csv_missing_price_is_empty_field() {
        let records = from_results(&make_results());
        let csv = to_csv(&records);
        let parsed = from_csv(&csv).unwrap();

        assert!(parsed[1].source.price.is_none());
        assert_eq!(parsed[1].candidate.price, Some(12.34));
    }

    #[test]
    fn test_csv_empty_input() {
        assert!(matches!(from_csv(""), Err(ExportParseError::Header)));
    }

    #[test]
    fn test_csv_header_only_roundtrips_to_zero_records() {
        let parsed = from_csv(&to_csv(&[])).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_csv_bad_field_count() {
        let input = format!("{}\nonly,three,fields", to_csv(&[]));
        let result = from_csv(&input);
        assert!(matches!(result, Err(ExportParseError::FieldCount(2, 3))));
    }

    #[test]
    fn test_csv_bad_number() {
        let records = from_results(&make_results());
        let csv = to_csv(&records).replace("12.34", "not-a-price");

        let result = from_csv(&csv);
        assert!(matches!(result, Err(ExportParseError::Number(_, _))));
    }

    #[test]
    fn test_json_roundtrip() {
        let records = from_results(&make_results());
        let json = to_json(&records);
        let parsed = from_json(&json).unwrap();

        assert_eq!(parsed, records);
    }

    #[test]
    fn test_json_carries_schema() {
        let json = to_json(&from_results(&make_results()));
        let document: JsonDocument = serde_json::from_str(&json).unwrap();

        assert_eq!(document.schema.fields.len(), 11);
        assert_eq!(document.schema.fields[0].name, "source.marketplace");
        assert_eq!(document.schema.fields[0].field_type, "string");
        assert_eq!(document.schema.fields[10].name, "profit");
        assert_eq!(document.schema.fields[10].field_type, "number");
    }

    #[test]
    fn test_json_numeric_types_preserved() {
        let json = to_json(&from_results(&make_results()));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let price = &value["data"][0]["source"]["price"];
        assert!(price.is_f64() || price.is_u64());
        assert!(value["data"][0]["profit"].is_number());
        assert!(value["data"][0]["source"]["title"].is_string());
    }

    #[test]
    fn test_json_empty_document() {
        let json = to_json(&[]);
        let parsed = from_json(&json).unwrap();
        assert!(parsed.is_empty());

        let document: JsonDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(document.schema.fields.len(), 11);
    }

    #[test]
    fn test_json_invalid_input() {
        assert!(from_json("not json").is_err());
    }

    #[test]
    fn test_split_csv_quoted_newline() {
        let rows = split_csv("a,\"line\nbreak\",c\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], vec!["a", "line\nbreak", "c"]);
    }

    #[test]
    fn test_split_csv_crlf() {
        let rows = split_csv("a,b\r\nc,d\r\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }
}
