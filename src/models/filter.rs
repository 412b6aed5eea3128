// file: src/models/filter.rs
// description: metadata filter clauses and comparison operators
// reference: https://docs.rs/serde

use crate::error::ReagError;
use crate::models::document::MetadataValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Equals,
    Contains,
    StartsWith,
    EndsWith,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Regex,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 10] = [
        Self::Equals,
        Self::Contains,
        Self::StartsWith,
        Self::EndsWith,
        Self::NotEquals,
        Self::GreaterThan,
        Self::LessThan,
        Self::GreaterThanOrEqual,
        Self::LessThanOrEqual,
        Self::Regex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::Contains => "contains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::NotEquals => "notEquals",
            Self::GreaterThan => "greaterThan",
            Self::LessThan => "lessThan",
            Self::GreaterThanOrEqual => "greaterThanOrEqual",
            Self::LessThanOrEqual => "lessThanOrEqual",
            Self::Regex => "regex",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = ReagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ReagError::Validation(format!("Unknown filter operator: {}", s)))
    }
}

/// A single metadata predicate. A list of clauses is ANDed; an omitted
/// operator means strict equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataFilter {
    pub key: String,
    pub value: MetadataValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<FilterOperator>,
}

impl MetadataFilter {
    pub fn new(
        key: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<MetadataValue>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            operator: Some(operator),
        }
    }

    /// Clause without an explicit operator.
    pub fn matching(key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            operator: None,
        }
    }

    pub fn equals(key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        Self::new(key, FilterOperator::Equals, value)
    }

    pub fn not_equals(key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        Self::new(key, FilterOperator::NotEquals, value)
    }

    pub fn contains(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, FilterOperator::Contains, value.into())
    }

    pub fn starts_with(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, FilterOperator::StartsWith, value.into())
    }

    pub fn ends_with(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, FilterOperator::EndsWith, value.into())
    }

    pub fn regex(key: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(key, FilterOperator::Regex, pattern.into())
    }

    pub fn greater_than(key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        Self::new(key, FilterOperator::GreaterThan, value)
    }

    pub fn greater_than_or_equal(key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        Self::new(key, FilterOperator::GreaterThanOrEqual, value)
    }

    pub fn less_than(key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        Self::new(key, FilterOperator::LessThan, value)
    }

    pub fn less_than_or_equal(key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        Self::new(key, FilterOperator::LessThanOrEqual, value)
    }
}

/// Parses `key:operator:value` (or `key:value` for plain equality). Values
/// that parse as integers or floats become numbers.
impl FromStr for MetadataFilter {
    type Err = ReagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(3, ':').collect();

        let (key, operator, raw_value) = match parts.as_slice() {
            [key, value] => (*key, None, *value),
            [key, operator, value] => (*key, Some(operator.parse::<FilterOperator>()?), *value),
            _ => {
                return Err(ReagError::Validation(format!(
                    "Filter must look like key:operator:value, got '{}'",
                    s
                )));
            }
        };

        if key.trim().is_empty() {
            return Err(ReagError::Validation(format!(
                "Filter key is empty in '{}'",
                s
            )));
        }

        let value = if let Ok(n) = raw_value.parse::<i64>() {
            MetadataValue::Integer(n)
        } else if let Ok(n) = raw_value.parse::<f64>() {
            MetadataValue::Float(n)
        } else {
            MetadataValue::Text(raw_value.to_string())
        };

        Ok(Self {
            key: key.trim().to_string(),
            value,
            operator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_operator_serde_names() {
        let clause: MetadataFilter = serde_json::from_str(
            r#"{"key":"version","value":2,"operator":"greaterThanOrEqual"}"#,
        )
        .unwrap();

        assert_eq!(clause, MetadataFilter::greater_than_or_equal("version", 2));
        assert_eq!(
            serde_json::to_string(&FilterOperator::StartsWith).unwrap(),
            r#""startsWith""#
        );
    }

    #[test]
    fn test_operator_is_optional() {
        let clause: MetadataFilter = serde_json::from_str(r#"{"key":"id","value":"sa-1"}"#).unwrap();
        assert_eq!(clause.operator, None);
    }

    #[test]
    fn test_parse_filter_string() {
        let clause: MetadataFilter = "id:equals:sa-1".parse().unwrap();
        assert_eq!(clause, MetadataFilter::equals("id", "sa-1"));

        let clause: MetadataFilter = "version:lessThan:3".parse().unwrap();
        assert_eq!(clause.value, MetadataValue::Integer(3));

        let clause: MetadataFilter = "url:regex:^https://.*".parse().unwrap();
        assert_eq!(clause.value, MetadataValue::from("^https://.*"));

        let clause: MetadataFilter = "source:web".parse().unwrap();
        assert_eq!(clause, MetadataFilter::matching("source", "web"));
    }

    #[test]
    fn test_parse_filter_rejects_garbage() {
        assert!("nocolon".parse::<MetadataFilter>().is_err());
        assert!("id:like:x".parse::<MetadataFilter>().is_err());
        assert!(":equals:x".parse::<MetadataFilter>().is_err());
    }
}
