//! The structured-generation capability consumed by the pipeline.

use crate::error::UpstreamError;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde_json::Value;

/// One structured-generation request: instructions, payload, target schema,
/// and any validation feedback gathered by earlier attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: String,
    pub user: String,
    pub schema: Value,
    pub feedback: Vec<String>,
}

impl GenerationRequest {
    /// Build a request whose target schema is derived from `T`.
    pub fn for_schema<T: JsonSchema>(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            schema: schemars::schema_for!(T).to_value(),
            feedback: Vec::new(),
        }
    }

    /// Record why the previous response was rejected.
    pub fn push_feedback(&mut self, error: impl ToString) {
        self.feedback.push(error.to_string());
    }

    /// The user payload with repair feedback appended.
    pub fn user_message(&self) -> String {
        if self.feedback.is_empty() {
            return self.user.clone();
        }

        let mut message = self.user.clone();
        message.push_str("\n\n# Previous responses were rejected\n");
        for (attempt, error) in self.feedback.iter().enumerate() {
            message.push_str(&format!("- Attempt {}: {}\n", attempt + 1, error));
        }
        message.push_str("Fix these errors and respond again with the complete JSON.");
        message
    }

    /// The target schema as pretty JSON for prompt-only providers.
    pub fn schema_text(&self) -> String {
        serde_json::to_string_pretty(&self.schema).unwrap_or_else(|_| self.schema.to_string())
    }
}

/// A language model that answers with text meant to match a JSON schema.
///
/// Implementations report transport and provider failures as
/// [`UpstreamError`]; anything that came back is returned verbatim, even if
/// it does not match the schema.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    async fn invoke(&self, request: &GenerationRequest) -> Result<String, UpstreamError>;
}

/// Strip markdown code block wrappers from a JSON response
pub fn strip_markdown_json(text: &str) -> &str {
    let trimmed = text.trim();

    // Remove ```json ... ``` or ``` ... ```
    if let Some(without_fence) = trimmed.strip_prefix("```") {
        let without_prefix = match without_fence.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &without_fence[4..],
            _ => without_fence,
        };
        if let Some(end_idx) = without_prefix.rfind("```") {
            return without_prefix[..end_idx].trim();
        }
    }

    trimmed
}
