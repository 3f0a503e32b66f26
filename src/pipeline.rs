//! The generation pipeline: outline, structure, then slide content.
//!
//! A `Pipeline` holds its model clients and settings and nothing else, so one
//! instance can serve many concurrent requests. Every entry point is a future
//! that can be dropped at any await point; dropping it abandons the in-flight
//! model call and any remaining repair attempts.

use crate::agent::{build_generator, AgentError};
use crate::config::Config;
use crate::content::SlideModel;
use crate::documents::Document;
use crate::error::{GenerationError, Step};
use crate::llm::StructuredGenerator;
use crate::outline::{self, Outline, OutlineInput, OutlineSlide, MAX_SLIDES, MIN_SLIDES};
use crate::repair::RepairLoop;
use crate::slides;
use crate::structure::{self, StructureAssignment};
use crate::summary::{self, SummarySupplier};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Settings threaded into the pipeline at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub max_attempts: u32,
    pub language: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_attempts: crate::repair::DEFAULT_MAX_ATTEMPTS,
            language: "English".to_string(),
        }
    }
}

/// What a caller asks for when creating a presentation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PresentationRequest {
    pub prompt: Option<String>,
    pub n_slides: usize,
    pub language: Option<String>,
}

/// A generated deck with the outline and structure it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub title: String,
    pub notes: Option<Vec<String>>,
    pub outline: Outline,
    pub structure: StructureAssignment,
    pub slides: Vec<SlideModel>,
}

pub struct Pipeline {
    large: Arc<dyn StructuredGenerator>,
    small: Arc<dyn StructuredGenerator>,
    settings: GenerationSettings,
}

impl Pipeline {
    /// `large` serves outlines, slide content and summaries; `small` serves
    /// structure classification.
    pub fn new(
        large: Arc<dyn StructuredGenerator>,
        small: Arc<dyn StructuredGenerator>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            large,
            small,
            settings,
        }
    }

    /// Build provider clients from configuration.
    pub fn from_config(config: &Config) -> Result<Self, AgentError> {
        let large = build_generator(config, &config.llm.large_model)?;
        let small = if config.llm.small_model == config.llm.large_model {
            Arc::clone(&large)
        } else {
            build_generator(config, &config.llm.small_model)?
        };
        let settings = GenerationSettings {
            max_attempts: config.generation.max_attempts,
            language: config.generation.language.clone(),
        };
        Ok(Self::new(large, small, settings))
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    fn large_loop(&self) -> RepairLoop<'_> {
        RepairLoop::new(self.large.as_ref(), self.settings.max_attempts)
    }

    fn small_loop(&self) -> RepairLoop<'_> {
        RepairLoop::new(self.small.as_ref(), self.settings.max_attempts)
    }

    /// Turn a prompt and optional document summary into an outline of
    /// exactly `n_slides` slides.
    pub async fn generate_outline(
        &self,
        prompt: Option<&str>,
        n_slides: usize,
        language: Option<&str>,
        summary: Option<&str>,
    ) -> Result<Outline, GenerationError> {
        if !(MIN_SLIDES..=MAX_SLIDES).contains(&n_slides) {
            return Err(GenerationError::InvalidRequest(format!(
                "slide count must be between {MIN_SLIDES} and {MAX_SLIDES}, got {n_slides}"
            )));
        }
        let has_prompt = prompt.is_some_and(|p| !p.trim().is_empty());
        if !has_prompt && summary.is_none() {
            return Err(GenerationError::InvalidRequest(
                "a prompt or a document summary is required".to_string(),
            ));
        }

        let input = OutlineInput {
            prompt,
            n_slides,
            language: language.unwrap_or(&self.settings.language),
            summary,
        };
        log::info!("generating outline: {} slides in {}", n_slides, input.language);

        self.large_loop()
            .run(Step::Outline, outline::build_request(&input), |raw| {
                outline::validate(raw, n_slides)
            })
            .await
    }

    /// Assign a slide type to every outline slide.
    pub async fn classify_structure(
        &self,
        outline: &Outline,
    ) -> Result<StructureAssignment, GenerationError> {
        let n_slides = outline.slides.len();
        log::info!("classifying structure of {n_slides} slides");

        self.small_loop()
            .run(Step::Structure, structure::build_request(outline), |raw| {
                structure::validate(raw, n_slides)
            })
            .await
    }

    /// Expand outline slides into typed content, letting the model pick each
    /// slide's type.
    pub async fn generate_slide_content(
        &self,
        title: &str,
        notes: &[String],
        outline_slides: &[OutlineSlide],
    ) -> Result<Vec<SlideModel>, GenerationError> {
        self.generate_content(title, notes, outline_slides, None)
            .await
    }

    /// Expand outline slides into typed content following an assignment.
    pub async fn generate_slide_content_with_structure(
        &self,
        title: &str,
        notes: &[String],
        outline_slides: &[OutlineSlide],
        structure: &StructureAssignment,
    ) -> Result<Vec<SlideModel>, GenerationError> {
        if structure.len() != outline_slides.len() {
            return Err(GenerationError::InvalidRequest(format!(
                "structure has {} slides but the outline has {}",
                structure.len(),
                outline_slides.len()
            )));
        }
        self.generate_content(title, notes, outline_slides, Some(structure))
            .await
    }

    async fn generate_content(
        &self,
        title: &str,
        notes: &[String],
        outline_slides: &[OutlineSlide],
        structure: Option<&StructureAssignment>,
    ) -> Result<Vec<SlideModel>, GenerationError> {
        let n_slides = outline_slides.len();
        if n_slides == 0 {
            return Err(GenerationError::InvalidRequest(
                "outline has no slides".to_string(),
            ));
        }
        log::info!("generating content for {n_slides} slides");

        let request = slides::build_request(title, notes, outline_slides, structure);
        self.large_loop()
            .run(Step::SlideContent, request, |raw| {
                slides::validate(raw, n_slides, structure)
            })
            .await
    }

    /// Run outline, structure and content in order.
    pub async fn generate_presentation(
        &self,
        request: &PresentationRequest,
        summary: Option<&str>,
    ) -> Result<Presentation, GenerationError> {
        let outline = self
            .generate_outline(
                request.prompt.as_deref(),
                request.n_slides,
                request.language.as_deref(),
                summary,
            )
            .await?;

        let structure = self.classify_structure(&outline).await?;

        let slides = self
            .generate_slide_content_with_structure(
                &outline.title,
                outline.notes(),
                &outline.slides,
                &structure,
            )
            .await?;

        Ok(Presentation {
            title: outline.title.clone(),
            notes: outline.notes.clone(),
            outline,
            structure,
            slides,
        })
    }
}

#[async_trait]
impl SummarySupplier for Pipeline {
    async fn summarize(&self, documents: &[Document]) -> Result<String, GenerationError> {
        if documents.is_empty() {
            return Err(GenerationError::InvalidRequest(
                "no documents to summarize".to_string(),
            ));
        }
        log::info!("summarizing {} documents", documents.len());

        self.large_loop()
            .run(
                Step::DocumentSummary,
                summary::build_request(documents),
                summary::validate,
            )
            .await
    }
}
