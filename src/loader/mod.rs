// file: src/loader/mod.rs
// description: document loading from json files and markdown directories
// reference: internal module structure

mod frontmatter;
mod json;
mod scanner;

pub use frontmatter::{FrontmatterParser, ParsedSource};
pub use json::load_json_documents;
pub use scanner::DocumentScanner;

use crate::config::LoaderConfig;
use crate::error::{ReagError, Result};
use crate::models::Document;
use std::path::Path;

/// Loads documents from a directory (walked recursively), a `.json` file
/// holding an array of documents, or a single text file.
pub fn load_documents(path: &Path, config: &LoaderConfig) -> Result<Vec<Document>> {
    if path.is_dir() {
        return DocumentScanner::new(config.clone()).scan_directory(path);
    }

    if !path.is_file() {
        return Err(ReagError::Loader {
            path: path.to_path_buf(),
            message: "not a file or directory".to_string(),
        });
    }

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json_documents(path),
        _ => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            DocumentScanner::new(config.clone())
                .load_file(path, &name)
                .map(|doc| vec![doc])
        }
    }
}
