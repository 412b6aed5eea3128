// file: src/exporter/json.rs
// description: json export of query results with run metadata

use crate::engine::QueryStats;
use crate::error::Result;
use crate::models::QueryResult;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize)]
pub struct QueryReport<'r, 'd, T> {
    pub prompt: &'r str,
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<QueryStats>,
    pub results: &'r [QueryResult<'d, T>],
}

impl<'r, 'd, T: Serialize> QueryReport<'r, 'd, T> {
    pub fn new(prompt: &'r str, results: &'r [QueryResult<'d, T>]) -> Self {
        Self {
            prompt,
            generated_at: Utc::now().to_rfc3339(),
            stats: None,
            results,
        }
    }

    pub fn with_stats(mut self, stats: QueryStats) -> Self {
        self.stats = Some(stats);
        self
    }
}

#[derive(Debug, Clone)]
pub struct JsonExporter {
    pretty: bool,
}

impl JsonExporter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn render<S: Serialize>(&self, value: &S) -> Result<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(rendered)
    }

    /// Writes to `output`, creating parent directories, or to stdout when
    /// no path is given.
    pub fn export<S: Serialize>(&self, value: &S, output: Option<&Path>) -> Result<Option<PathBuf>> {
        let rendered = self.render(value)?;

        match output {
            Some(path) => {
                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, rendered)?;
                info!("Results written to {}", path.display());
                Ok(Some(path.to_path_buf()))
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", rendered)?;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Answer, Document};
    use tempfile::tempdir;

    #[test]
    fn test_export_report_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/results.json");
        let doc = Document::new("Superagent", "content").with_metadata("id", "sa-1");
        let results = vec![QueryResult::new(
            Answer {
                content: "passage".to_string(),
                reasoning: "relevant".to_string(),
                is_irrelevant: false,
            },
            &doc,
        )];

        let report = QueryReport::new("What is Superagent?", &results);
        let written = JsonExporter::new(true)
            .export(&report, Some(&path))
            .unwrap();
        assert_eq!(written.as_deref(), Some(path.as_path()));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["prompt"], "What is Superagent?");
        assert_eq!(json["results"][0]["content"], "passage");
        assert_eq!(json["results"][0]["document"]["metadata"]["id"], "sa-1");
        assert!(json.get("stats").is_none());
    }

    #[test]
    fn test_render_compact() {
        let rendered = JsonExporter::new(false).render(&vec![1, 2]).unwrap();
        assert_eq!(rendered, "[1,2]");
    }
}
