//! Generation Pipeline: tries each configured model in order.
//!
//! Flow per model: complete (JSON mode, bounded tokens, per-attempt timeout) →
//! parse → structural validation → return on first success.
//!
//! An auth or quota failure stops the traversal at once. Anything else moves on
//! to the next model. After the list is exhausted the last failure is classified
//! and returned; earlier failures are only logged.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::ModelSpec;
use crate::icebreakers::classify::{classify, AttemptFailure, ErrorClass};
use crate::icebreakers::prompts::Prompt;
use crate::icebreakers::response::parse_reply;
use crate::llm_client::{CompletionProvider, CompletionRequest, LlmError};
use crate::models::icebreaker::GenerationResult;

pub const TEMPERATURE: f32 = 0.7;

/// Terminal pipeline failure. `detail` is for logs only and never reaches clients.
#[derive(Debug, Error)]
#[error("{class:?}: {detail}")]
pub struct GenerationError {
    pub class: ErrorClass,
    pub detail: String,
}

#[derive(Clone)]
pub struct IcebreakerGenerator {
    provider: Arc<dyn CompletionProvider>,
    models: Vec<ModelSpec>,
}

impl IcebreakerGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>, models: Vec<ModelSpec>) -> Self {
        Self { provider, models }
    }

    pub fn models(&self) -> &[ModelSpec] {
        &self.models
    }

    pub async fn generate(&self, prompt: &Prompt) -> Result<GenerationResult, GenerationError> {
        let mut last_failure: Option<(ErrorClass, AttemptFailure)> = None;

        for model in &self.models {
            info!("Attempting icebreaker generation with model {}", model.name);

            match self.attempt(model, prompt).await {
                Ok(result) => {
                    info!("Generated icebreakers using model {}", model.name);
                    return Ok(result);
                }
                Err(failure) => {
                    let class = classify(&failure);
                    warn!("Model {} failed ({}): {failure}", model.name, class.code());

                    let halt = class.halts_fallback();
                    last_failure = Some((class, failure));
                    if halt {
                        break;
                    }
                }
            }
        }

        let Some((class, failure)) = last_failure else {
            return Err(GenerationError {
                class: ErrorClass::ServiceError,
                detail: "no models configured".to_string(),
            });
        };

        // Timeouts, transport faults and 5xx carry no specific signal.
        let class = match class {
            ErrorClass::ServiceError => ErrorClass::GenerationFailed,
            other => other,
        };

        error!("All models failed; reporting {}: {failure}", class.code());
        Err(GenerationError {
            class,
            detail: failure.to_string(),
        })
    }

    async fn attempt(
        &self,
        model: &ModelSpec,
        prompt: &Prompt,
    ) -> Result<GenerationResult, AttemptFailure> {
        let request = CompletionRequest {
            model: &model.name,
            system: &prompt.system,
            user: &prompt.user,
            temperature: TEMPERATURE,
            max_tokens: model.max_tokens,
            json_mode: true,
            timeout: model.timeout,
        };

        let raw = tokio::time::timeout(model.timeout, self.provider.complete(request))
            .await
            .map_err(|_| LlmError::Timeout {
                model: model.name.clone(),
                after: model.timeout,
            })??;

        Ok(parse_reply(&raw)?)
    }
}
