// Complaint records and the corpus that holds them.
//
// A record keeps its free-text columns in a name-keyed map so the cleaning
// pipeline can target any of them by column name. Product and Tags are the
// two categorical labels every downstream report groups by.

pub mod load;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique complaint identifier
    pub id: String,
    /// Category label ("Product" column); `None` until imputed
    pub product: Option<String>,
    /// Group label ("Tags" column); `None` until imputed
    pub tags: Option<String>,
    /// Free-text columns by name. A key mapped to `None` is a column that is
    /// present on the record but null.
    pub fields: BTreeMap<String, Option<String>>,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            product: None,
            tags: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), Some(value.into()));
        self
    }

    /// Declare a column that is present but null.
    pub fn with_null_field(mut self, name: impl Into<String>) -> Self {
        self.fields.insert(name.into(), None);
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// The value of a text column, or `None` if the column is absent or null.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_deref())
    }

    /// Whether the column exists on this record at all (null counts).
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn set_field(&mut self, name: &str, value: String) {
        self.fields.insert(name.to_string(), Some(value));
    }

    pub fn product_label(&self) -> &str {
        self.product.as_deref().unwrap_or_default()
    }

    pub fn tags_label(&self) -> &str {
        self.tags.as_deref().unwrap_or_default()
    }
}

/// An ordered collection of records that go through one cleaning pass together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    records: Vec<Record>,
}

impl Corpus {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Append every record of `other`, keeping order.
    pub fn extend(&mut self, other: Corpus) {
        self.records.extend(other.records);
    }

    /// The values of one text column, skipping records where it is absent or null.
    pub fn texts(&self, field: &str) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|r| r.field(field).map(str::to_string))
            .collect()
    }

    /// The Product label of every record, in order.
    pub fn products(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.product_label().to_string())
            .collect()
    }

    /// The Tags label of every record, in order.
    pub fn tags(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.tags_label().to_string())
            .collect()
    }
}

impl From<Vec<Record>> for Corpus {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<Record> for Corpus {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
