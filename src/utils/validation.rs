// file: src/utils/validation.rs
// description: input validation helpers shared by config and cli
// reference: input validation patterns

use crate::error::{ReagError, Result};
use std::path::Path;

const MAX_BATCH_SIZE: usize = 10_000;

pub struct Validator;

impl Validator {
    pub fn validate_prompt(prompt: &str) -> Result<()> {
        if prompt.trim().is_empty() {
            return Err(ReagError::Validation("Prompt is empty".to_string()));
        }
        Ok(())
    }

    pub fn validate_content_not_empty(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(ReagError::Validation("Content is empty".to_string()));
        }
        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ReagError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn validate_batch_size(size: usize) -> Result<()> {
        if size == 0 {
            return Err(ReagError::Validation(
                "Batch size must be greater than 0".to_string(),
            ));
        }

        if size > MAX_BATCH_SIZE {
            return Err(ReagError::Validation(format!(
                "Batch size too large (max {})",
                MAX_BATCH_SIZE
            )));
        }

        Ok(())
    }

    pub fn validate_source_path(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(ReagError::Validation(format!(
                "Document source does not exist: {}",
                path.display()
            )));
        }
        Ok(())
    }
}
