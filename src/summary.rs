//! Document summary - condenses uploaded documents into outline input.

use crate::documents::Document;
use crate::error::{GenerationError, ValidationError};
use crate::llm::GenerationRequest;
use crate::repair::parse_json;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Structured summary output from the LLM.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DocumentSummary {
    /// Summary of all documents with the facts, figures and tables worth presenting
    pub summary: String,
}

/// Supplies plain-text summaries of documents for the outline step.
#[async_trait]
pub trait SummarySupplier: Send + Sync {
    async fn summarize(&self, documents: &[Document]) -> Result<String, GenerationError>;
}

const SYSTEM_PROMPT: &str = r#"You are an analyst preparing source material for a presentation.

Summarize the provided documents.

# Notes
- Keep every number, statistic and table that could be shown on a slide.
- Keep the structure of the documents as markdown headings and bullet points.
- Do not add facts that are not in the documents."#;

pub fn build_request(documents: &[Document]) -> GenerationRequest {
    let user = documents
        .iter()
        .map(|doc| format!("# Document: {}\n\n{}", doc.name, doc.text))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");
    GenerationRequest::for_schema::<DocumentSummary>(SYSTEM_PROMPT, user)
}

pub fn validate(raw: &str) -> Result<String, ValidationError> {
    let summary: DocumentSummary = parse_json(raw)?;
    let text = summary.summary.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyField("summary"));
    }
    Ok(text.to_string())
}
