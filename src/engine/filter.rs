// file: src/engine/filter.rs
// description: metadata predicate evaluation over document sequences
// reference: https://docs.rs/regex

use crate::error::{ReagError, Result};
use crate::models::{Document, FilterOperator, MetadataFilter};
use regex::Regex;
use std::cell::OnceCell;
use std::cmp::Ordering;
use tracing::debug;

/// Returns the documents for which every clause holds, in input order. An
/// empty clause list keeps every document.
///
/// Regex clauses are compiled the first time a text value reaches them, so
/// an invalid pattern only fails the pass when it is actually evaluated.
pub fn filter_documents<'d>(
    documents: &'d [Document],
    clauses: &[MetadataFilter],
) -> Result<Vec<&'d Document>> {
    if clauses.is_empty() {
        return Ok(documents.iter().collect());
    }

    let compiled: Vec<CompiledClause> = clauses.iter().map(CompiledClause::new).collect();

    let mut kept = Vec::new();
    'documents: for document in documents {
        for clause in &compiled {
            if !clause.matches(document)? {
                continue 'documents;
            }
        }
        kept.push(document);
    }

    debug!(
        "Metadata filter kept {} of {} documents ({} clauses)",
        kept.len(),
        documents.len(),
        clauses.len()
    );

    Ok(kept)
}

/// A clause whose regex, if any, is compiled at most once per filter pass.
struct CompiledClause<'c> {
    clause: &'c MetadataFilter,
    pattern: OnceCell<std::result::Result<Regex, regex::Error>>,
}

impl<'c> CompiledClause<'c> {
    fn new(clause: &'c MetadataFilter) -> Self {
        Self {
            clause,
            pattern: OnceCell::new(),
        }
    }

    fn regex_match(&self, pattern: &str, text: &str) -> Result<bool> {
        match self.pattern.get_or_init(|| Regex::new(pattern)) {
            Ok(regex) => Ok(regex.is_match(text)),
            Err(e) => Err(ReagError::InvalidFilter {
                key: self.clause.key.clone(),
                message: e.to_string(),
            }),
        }
    }

    fn matches(&self, document: &Document) -> Result<bool> {
        // Presence is a key check: zero and empty values still count.
        let Some(actual) = document.metadata_value(&self.clause.key) else {
            return Ok(false);
        };
        let expected = &self.clause.value;

        if let (Some(actual_text), Some(expected_text)) = (actual.as_text(), expected.as_text()) {
            match self.clause.operator {
                Some(FilterOperator::Contains) => return Ok(actual_text.contains(expected_text)),
                Some(FilterOperator::StartsWith) => {
                    return Ok(actual_text.starts_with(expected_text));
                }
                Some(FilterOperator::EndsWith) => return Ok(actual_text.ends_with(expected_text)),
                Some(FilterOperator::Regex) => return self.regex_match(expected_text, actual_text),
                _ => {}
            }
        }

        let ordering = || actual.compare(expected);

        let matched = match self.clause.operator {
            Some(FilterOperator::NotEquals) => !actual.strict_eq(expected),
            Some(FilterOperator::GreaterThan) => ordering() == Some(Ordering::Greater),
            Some(FilterOperator::LessThan) => ordering() == Some(Ordering::Less),
            Some(FilterOperator::GreaterThanOrEqual) => {
                matches!(ordering(), Some(Ordering::Greater | Ordering::Equal))
            }
            Some(FilterOperator::LessThanOrEqual) => {
                matches!(ordering(), Some(Ordering::Less | Ordering::Equal))
            }
            // equals, no operator, and text operators on non-text values
            _ => actual.strict_eq(expected),
        };

        Ok(matched)
    }
}
