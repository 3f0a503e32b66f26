//! Validation-and-repair loop shared by every generation step.
//!
//! Each attempt issues one request and validates the raw response. A
//! rejected response is fed back to the model as context for the next
//! attempt; after `max_attempts` requests the step fails. Upstream errors end
//! the loop immediately since re-asking cannot fix a transport problem.

use crate::error::{GenerationError, Step, ValidationError};
use crate::llm::{strip_markdown_json, GenerationRequest, StructuredGenerator};
use serde::de::DeserializeOwned;

/// Default number of requests a step may issue before it fails.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

pub struct RepairLoop<'a> {
    generator: &'a dyn StructuredGenerator,
    max_attempts: u32,
}

impl<'a> RepairLoop<'a> {
    pub fn new(generator: &'a dyn StructuredGenerator, max_attempts: u32) -> Self {
        Self {
            generator,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Request, validate and repair until `validate` accepts a response.
    pub async fn run<T, F>(
        &self,
        step: Step,
        mut request: GenerationRequest,
        validate: F,
    ) -> Result<T, GenerationError>
    where
        F: Fn(&str) -> Result<T, ValidationError>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            log::debug!("{step}: requesting attempt {attempt}/{}", self.max_attempts);
            let raw = self.generator.invoke(&request).await?;

            let error = match validate(&raw) {
                Ok(value) => {
                    log::info!("{step}: accepted on attempt {attempt}");
                    return Ok(value);
                }
                Err(error) => error,
            };

            if attempt >= self.max_attempts {
                log::warn!("{step}: giving up after {attempt} attempts: {error}");
                return Err(GenerationError::GenerationFailed {
                    step,
                    attempts: attempt,
                    last_error: error,
                });
            }

            log::warn!("{step}: attempt {attempt} rejected, repairing: {error}");
            request.push_feedback(&error);
        }
    }
}

/// Parse a raw response into `T`, tolerating markdown code fences.
pub fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, ValidationError> {
    serde_json::from_str(strip_markdown_json(raw))
        .map_err(|e| ValidationError::Malformed(e.to_string()))
}
