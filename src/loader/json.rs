// file: src/loader/json.rs
// description: reads a json array of documents from disk

use crate::error::{ReagError, Result};
use crate::models::Document;
use std::fs;
use std::path::Path;
use tracing::info;

pub fn load_json_documents(path: &Path) -> Result<Vec<Document>> {
    let raw = fs::read_to_string(path)?;

    let documents: Vec<Document> =
        serde_json::from_str(&raw).map_err(|e| ReagError::Loader {
            path: path.to_path_buf(),
            message: format!("expected a JSON array of documents: {}", e),
        })?;

    info!("Loaded {} documents from {}", documents.len(), path.display());
    Ok(documents)
}
