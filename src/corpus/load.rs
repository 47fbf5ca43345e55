// Loading complaint exports from disk.
//
// Accepts either a JSON array of objects or JSON Lines (one object per
// line). Several files can be concatenated into one corpus, in the order
// given.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::info;

use super::{Corpus, Record};

/// Column names for the identifier and the two categorical labels.
/// Every other column on a row is kept as a text field.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    pub id_column: String,
    pub product_column: String,
    pub tags_column: String,
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self {
            id_column: "Complaint ID".to_string(),
            product_column: "Product".to_string(),
            tags_column: "Tags".to_string(),
        }
    }
}

/// Load and concatenate several export files.
pub fn load_corpus<P: AsRef<Path>>(paths: &[P], schema: &RecordSchema) -> Result<Corpus> {
    if paths.is_empty() {
        anyhow::bail!("No input files given. Set GRIEVANCE_INPUT or pass --input.");
    }

    let mut corpus = Corpus::default();
    for path in paths {
        let part = load_file(path.as_ref(), schema)?;
        corpus.extend(part);
    }

    info!(records = corpus.len(), files = paths.len(), "Loaded corpus");
    Ok(corpus)
}

/// Load one export file.
pub fn load_file(path: &Path, schema: &RecordSchema) -> Result<Corpus> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_records(&raw, schema).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse records from JSON array or JSON Lines text.
pub fn parse_records(raw: &str, schema: &RecordSchema) -> Result<Corpus> {
    let trimmed = raw.trim_start();

    let rows: Vec<Value> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).context("Invalid JSON array")?
    } else {
        trimmed
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).with_context(|| format!("Invalid JSON on line {}", i + 1))
            })
            .collect::<Result<Vec<_>>>()?
    };

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| match row {
            Value::Object(map) => record_from_map(map, schema)
                .with_context(|| format!("Bad record at position {}", i + 1)),
            other => anyhow::bail!(
                "Record at position {} is not an object (found {})",
                i + 1,
                json_kind(&other)
            ),
        })
        .collect()
}

fn record_from_map(map: Map<String, Value>, schema: &RecordSchema) -> Result<Record> {
    let mut id = None;
    let mut record = Record::new(String::new());

    for (key, value) in map {
        let text = value_to_text(value);
        if key == schema.id_column {
            id = text;
        } else if key == schema.product_column {
            record.product = text;
        } else if key == schema.tags_column {
            record.tags = text;
        } else {
            record.fields.insert(key, text);
        }
    }

    match id {
        Some(id) if !id.trim().is_empty() => {
            record.id = id;
            Ok(record)
        }
        _ => anyhow::bail!("Missing identifier column '{}'", schema.id_column),
    }
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NARRATIVE: &str = "Consumer complaint narrative";

    #[test]
    fn test_parse_json_array() {
        let raw = r#"[
            {"Complaint ID": 101, "Product": "Mortgage", "Tags": null, "Consumer complaint narrative": "They lost my payment."},
            {"Complaint ID": "102", "Product": null, "Tags": "Older American", "Consumer complaint narrative": null}
        ]"#;
        let corpus = parse_records(raw, &RecordSchema::default()).unwrap();
        assert_eq!(corpus.len(), 2);

        let first = &corpus.records()[0];
        assert_eq!(first.id, "101");
        assert_eq!(first.product.as_deref(), Some("Mortgage"));
        assert_eq!(first.tags, None);
        assert_eq!(first.field(NARRATIVE), Some("They lost my payment."));

        let second = &corpus.records()[1];
        assert_eq!(second.tags.as_deref(), Some("Older American"));
        assert!(second.has_field(NARRATIVE));
        assert_eq!(second.field(NARRATIVE), None);
    }

    #[test]
    fn test_parse_json_lines_skips_blank_lines() {
        let raw = "{\"Complaint ID\": 1, \"Consumer complaint narrative\": \"a\"}\n\n{\"Complaint ID\": 2}\n";
        let corpus = parse_records(raw, &RecordSchema::default()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert!(!corpus.records()[1].has_field(NARRATIVE));
    }

    #[test]
    fn test_missing_id_is_an_error() {
        let raw = r#"[{"Product": "Mortgage"}]"#;
        assert!(parse_records(raw, &RecordSchema::default()).is_err());
    }

    #[test]
    fn test_non_object_row_is_an_error() {
        let raw = "[1, 2]";
        assert!(parse_records(raw, &RecordSchema::default()).is_err());
    }

    #[test]
    fn test_load_corpus_requires_paths() {
        let paths: Vec<&Path> = Vec::new();
        assert!(load_corpus(&paths, &RecordSchema::default()).is_err());
    }
}
