//! Error taxonomy for the generation pipeline.
//!
//! `ValidationError` never leaves the repair loop on its own; it is either
//! repaired or wrapped into `GenerationError::GenerationFailed`.

use std::fmt;
use thiserror::Error;

/// The generation step a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    DocumentSummary,
    Outline,
    Structure,
    SlideContent,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::DocumentSummary => "document summary",
            Step::Outline => "outline",
            Step::Structure => "structure",
            Step::SlideContent => "slide content",
        };
        f.write_str(name)
    }
}

/// Structured output that failed schema, cardinality or domain checks.
///
/// The `Display` text is what gets fed back to the model on repair, so every
/// message names the offending slide and the rule it broke.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("response is not valid JSON for the requested schema: {0}")]
    Malformed(String),
    #[error("expected exactly {expected} slides, got {actual}")]
    SlideCount { expected: usize, actual: usize },
    #[error("slide {index}: title must not be empty")]
    EmptyTitle { index: usize },
    #[error("slide {index}: title \"{title}\" must not contain a slide number")]
    OrdinalInTitle { index: usize, title: String },
    #[error("slide {index}: body must not repeat the slide title \"{title}\"")]
    TitleInBody { index: usize, title: String },
    #[error("slide {index}: type {tag} is not a valid slide type, use one of 1, 2, 4, 5, 6, 7, 8, 9")]
    UnknownType { index: usize, tag: i64 },
    #[error("slide {index}: type 3 is not permitted")]
    ReservedType { index: usize },
    #[error("slide {index}: type {actual} does not match the assigned type {expected}")]
    AssignmentMismatch { index: usize, expected: u8, actual: u8 },
    #[error("slide {index}: content does not match type {tag}: {reason}")]
    ContentMismatch { index: usize, tag: u8, reason: String },
    #[error("slide {index}: {field} must have between {min} and {max} items, got {actual}")]
    ItemCount {
        index: usize,
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },
    #[error("slide {index}: {field} must be between {min} and {max} characters, got {actual}")]
    TextLength {
        index: usize,
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },
    #[error("slide {index}: type {tag} must not carry a graph, only types 5 and 9 may")]
    UnexpectedGraph { index: usize, tag: u8 },
    #[error("slide {index}: graph must be a JSON object")]
    InvalidGraph { index: usize },
    #[error("slide {second}: graph is identical to the graph on slide {first}")]
    DuplicateGraph { first: usize, second: usize },
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

/// The structured-generation capability could not be reached.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct UpstreamError(pub String);

impl UpstreamError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Terminal failures surfaced by the pipeline entry points.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("{step} generation failed after {attempts} attempts: {last_error}")]
    GenerationFailed {
        step: Step,
        attempts: u32,
        last_error: ValidationError,
    },
    #[error("language model unavailable: {0}")]
    UpstreamUnavailable(#[from] UpstreamError),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
