// file: src/loader/frontmatter.rs
// description: YAML frontmatter extraction into document metadata
// reference: https://docs.rs/yaml-rust

use crate::error::{ReagError, Result};
use crate::models::{Metadata, MetadataValue};
use tracing::debug;
use yaml_rust::{Yaml, YamlLoader};

#[derive(Debug, Clone, Default)]
pub struct ParsedSource {
    pub metadata: Metadata,
    pub body: String,
}

pub struct FrontmatterParser;

impl FrontmatterParser {
    pub fn new() -> Self {
        Self
    }

    /// Splits a leading `---` fenced YAML block from the body. Scalar values
    /// become metadata; nested values are ignored. Content without
    /// frontmatter is returned unchanged with empty metadata.
    pub fn extract(&self, content: &str) -> Result<ParsedSource> {
        let Some((yaml, body)) = split_frontmatter(content) else {
            return Ok(ParsedSource {
                metadata: Metadata::new(),
                body: content.to_string(),
            });
        };

        let docs = YamlLoader::load_from_str(yaml)
            .map_err(|e| ReagError::Validation(format!("YAML frontmatter parse error: {}", e)))?;

        let mut metadata = Metadata::new();

        if let Some(Yaml::Hash(hash)) = docs.first() {
            for (key, value) in hash {
                let Some(key) = key.as_str() else {
                    continue;
                };
                match scalar_value(value) {
                    Some(value) => {
                        metadata.insert(key.to_string(), value);
                    }
                    None => debug!("Ignoring non-scalar frontmatter field '{}'", key),
                }
            }
        }

        Ok(ParsedSource {
            metadata,
            body: body.trim_start().to_string(),
        })
    }
}

impl Default for FrontmatterParser {
    fn default() -> Self {
        Self::new()
    }
}

fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

fn scalar_value(value: &Yaml) -> Option<MetadataValue> {
    match value {
        Yaml::String(s) => Some(MetadataValue::Text(s.clone())),
        Yaml::Integer(n) => Some(MetadataValue::Integer(*n)),
        Yaml::Real(raw) => raw.parse::<f64>().ok().map(MetadataValue::Float),
        Yaml::Boolean(b) => Some(MetadataValue::Text(b.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontmatter_extraction() {
        let parser = FrontmatterParser::new();
        let content = "---\ntitle: Test\nversion: 2\nscore: 0.5\ndraft: false\ntags: [a, b]\n---\n\n# Content";

        let parsed = parser.extract(content).unwrap();

        assert_eq!(parsed.metadata.get("title"), Some(&MetadataValue::from("Test")));
        assert_eq!(parsed.metadata.get("version"), Some(&MetadataValue::Integer(2)));
        assert_eq!(parsed.metadata.get("score"), Some(&MetadataValue::Float(0.5)));
        assert_eq!(parsed.metadata.get("draft"), Some(&MetadataValue::from("false")));
        assert!(!parsed.metadata.contains_key("tags"));
        assert_eq!(parsed.body, "# Content");
    }

    #[test]
    fn test_no_frontmatter() {
        let parser = FrontmatterParser::new();
        let parsed = parser.extract("# Just a heading\n---\nnot yaml").unwrap();

        assert!(parsed.metadata.is_empty());
        assert_eq!(parsed.body, "# Just a heading\n---\nnot yaml");
    }

    #[test]
    fn test_unterminated_frontmatter_is_body() {
        let parser = FrontmatterParser::new();
        let parsed = parser.extract("---\ntitle: x\n# no closing fence").unwrap();
        assert!(parsed.metadata.is_empty());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let parser = FrontmatterParser::new();
        assert!(parser.extract("---\ntitle: [unclosed\n---\nbody").is_err());
    }
}
