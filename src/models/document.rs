// file: src/models/document.rs
// description: core document model with typed metadata values
// reference: internal data structures

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

pub type Metadata = BTreeMap<String, MetadataValue>;

/// A scalar metadata value. Untagged so `"sa-1"`, `2` and `2.5` map directly
/// onto JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl MetadataValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Equality without coercion between text and numbers. Integers and
    /// floats compare numerically.
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Native ordering: lexicographic for text, numeric for numbers, `None`
    /// when the kinds differ or a NaN is involved.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            _ => self.as_f64()?.partial_cmp(&other.as_f64()?),
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for MetadataValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for MetadataValue {
    fn from(n: i32) -> Self {
        Self::Integer(n as i64)
    }
}

impl From<f64> for MetadataValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) -> Self {
        self.metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn metadata_value(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.as_ref()?.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let doc = Document::new("Superagent", "A workspace for AI agents")
            .with_metadata("source", "web")
            .with_metadata("version", 2);

        assert_eq!(doc.name, "Superagent");
        assert_eq!(doc.metadata_value("source"), Some(&MetadataValue::from("web")));
        assert_eq!(doc.metadata_value("version"), Some(&MetadataValue::Integer(2)));
        assert!(doc.metadata_value("missing").is_none());
    }

    #[test]
    fn test_metadata_deserializes_untagged() {
        let doc: Document = serde_json::from_str(
            r#"{"name":"a","content":"b","metadata":{"id":"sa-1","version":2,"score":0.5}}"#,
        )
        .unwrap();

        assert_eq!(doc.metadata_value("id"), Some(&MetadataValue::from("sa-1")));
        assert_eq!(doc.metadata_value("version"), Some(&MetadataValue::Integer(2)));
        assert_eq!(doc.metadata_value("score"), Some(&MetadataValue::Float(0.5)));
    }

    #[test]
    fn test_document_without_metadata() {
        let doc: Document = serde_json::from_str(r#"{"name":"a","content":"b"}"#).unwrap();
        assert!(doc.metadata.is_none());
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            r#"{"name":"a","content":"b"}"#
        );
    }

    #[test]
    fn test_strict_eq_and_compare() {
        let two = MetadataValue::Integer(2);
        assert!(two.strict_eq(&MetadataValue::Float(2.0)));
        assert!(!two.strict_eq(&MetadataValue::from("2")));
        assert_eq!(two.compare(&MetadataValue::Integer(1)), Some(Ordering::Greater));
        assert_eq!(
            MetadataValue::from("abc").compare(&MetadataValue::from("abd")),
            Some(Ordering::Less)
        );
        assert_eq!(two.compare(&MetadataValue::from("1")), None);
    }
}
