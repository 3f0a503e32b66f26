//! # Decksmith
//!
//! Turns a topic or a set of documents into a typed slide deck using LLMs.
//!
//! ## Features
//!
//! - **Three-step pipeline**: outline, layout classification, then slide content
//! - **Validated output**: every model response is checked and repaired with feedback
//! - **Typed slides**: nine closed slide layouts with strict rendering shapes
//! - **Provider Agnostic**: Gemini via rstructor, OpenAI and Ollama over HTTP

pub mod agent;
pub mod config;
pub mod content;
pub mod documents;
pub mod error;
pub mod llm;
pub mod llm_content;
pub mod outline;
pub mod pipeline;
pub mod repair;
pub mod slides;
pub mod storage;
pub mod structure;
pub mod summary;

pub use config::Config;
pub use content::{SlideContent, SlideModel, SlideType};
pub use error::{GenerationError, Step, UpstreamError, ValidationError};
pub use llm::{GenerationRequest, StructuredGenerator};
pub use outline::{Outline, OutlineSlide};
pub use pipeline::{GenerationSettings, Pipeline, Presentation, PresentationRequest};
pub use storage::Storage;
pub use structure::StructureAssignment;
pub use summary::SummarySupplier;
