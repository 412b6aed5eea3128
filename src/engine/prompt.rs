// file: src/engine/prompt.rs
// description: default system prompt and per-document prompt rendering
// reference: internal prompt conventions

use crate::error::Result;
use crate::models::Document;

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a research assistant answering questions from a single source document.

Read the source in full before answering. Decide whether the source contains \
information that helps answer the user's question.

- If it does, set isIrrelevant to false, quote or closely paraphrase the \
relevant passage in content, and explain in reasoning why the passage answers \
the question.
- If it does not, set isIrrelevant to true and leave content empty. Use \
reasoning to say briefly why the source does not help.

Only use the provided source. Do not rely on prior knowledge and do not invent \
facts that the source does not state.";

/// Renders the document block appended to the system prompt. Metadata is
/// compact JSON, `null` when the document has none.
pub fn render_source(document: &Document) -> Result<String> {
    let metadata = serde_json::to_string(&document.metadata)?;
    Ok(format!(
        "Name: {}\nMetadata: {}\nContent: {}",
        document.name, metadata, document.content
    ))
}

pub fn augmented_system_prompt(system: &str, document: &Document) -> Result<String> {
    Ok(format!(
        "{}\n\n# Available source\n\n{}",
        system,
        render_source(document)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_source_with_metadata() {
        let doc = Document::new("Superagent", "A workspace for AI agents")
            .with_metadata("url", "https://superagent.sh")
            .with_metadata("version", 2);

        assert_eq!(
            render_source(&doc).unwrap(),
            "Name: Superagent\nMetadata: {\"url\":\"https://superagent.sh\",\"version\":2}\nContent: A workspace for AI agents"
        );
    }

    #[test]
    fn test_render_source_without_metadata() {
        let doc = Document::new("plain", "body");
        assert_eq!(
            render_source(&doc).unwrap(),
            "Name: plain\nMetadata: null\nContent: body"
        );
    }

    #[test]
    fn test_augmented_prompt_layout() {
        let doc = Document::new("plain", "body");
        let prompt = augmented_system_prompt("base text", &doc).unwrap();
        assert!(prompt.starts_with("base text\n\n# Available source\n\nName: plain"));
    }
}
