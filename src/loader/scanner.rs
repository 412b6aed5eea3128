// file: src/loader/scanner.rs
// description: Directory walking that turns text files into documents
// reference: https://docs.rs/walkdir

use crate::config::LoaderConfig;
use crate::error::{ReagError, Result};
use crate::loader::frontmatter::FrontmatterParser;
use crate::models::{Document, MetadataValue};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub struct DocumentScanner {
    config: LoaderConfig,
    frontmatter: FrontmatterParser,
}

impl DocumentScanner {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            frontmatter: FrontmatterParser::new(),
        }
    }

    /// Walks `root` in path order. Each document is named by its path
    /// relative to `root`; frontmatter scalars become metadata and a `path`
    /// key is added unless the frontmatter sets one.
    pub fn scan_directory(&self, root: &Path) -> Result<Vec<Document>> {
        info!("Scanning directory: {}", root.display());
        let mut documents = Vec::new();
        let max_size = (self.config.max_file_size_mb as u64) * 1024 * 1024;

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative_path = path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");

            if self.should_skip(&relative_path) || !self.has_wanted_extension(path) {
                debug!("Skipping file: {}", relative_path);
                continue;
            }

            if let Ok(metadata) = entry.metadata()
                && max_size > 0
                && metadata.len() > max_size
            {
                warn!(
                    "Skipping large file ({} MB): {}",
                    metadata.len() / 1024 / 1024,
                    relative_path
                );
                continue;
            }

            documents.push(self.load_file(path, &relative_path)?);
        }

        info!("Loaded {} documents", documents.len());
        Ok(documents)
    }

    pub fn load_file(&self, path: &Path, name: &str) -> Result<Document> {
        let content = fs::read_to_string(path).map_err(|e| ReagError::Loader {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let parsed = self
            .frontmatter
            .extract(&content)
            .map_err(|e| ReagError::Loader {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut metadata = parsed.metadata;
        metadata
            .entry("path".to_string())
            .or_insert_with(|| MetadataValue::from(name));

        Ok(Document {
            name: name.to_string(),
            content: parsed.body,
            metadata: Some(metadata),
        })
    }

    fn has_wanted_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.config
                    .extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
    }

    fn should_skip(&self, relative_path: &str) -> bool {
        self.config.skip_patterns.iter().any(|pattern| {
            if let Some(suffix) = pattern.strip_prefix('*') {
                relative_path.ends_with(suffix)
            } else {
                relative_path.contains(pattern.as_str())
            }
        })
    }
}
