//! Scripted `CompletionProvider` for pipeline and router tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::llm_client::{CompletionProvider, CompletionRequest, LlmError};

/// What a scripted model does when called.
#[derive(Debug, Clone)]
pub enum Script {
    Reply(String),
    ApiError {
        status: u16,
        message: String,
        code: Option<String>,
    },
    /// Never answers within any sane timeout.
    Hang,
}

impl Script {
    pub fn api_error(status: u16, message: &str) -> Self {
        Script::ApiError {
            status,
            message: message.to_string(),
            code: None,
        }
    }
}

/// A well-formed three-pair reply.
pub fn valid_reply() -> String {
    json!({
        "icebreakers": [
            {"line1": "Taking Acme from zero to $2m ARR is a standout run.",
             "line2": "I build automations that keep GA4 and Klaviyo reporting effortless."},
            {"line1": "Your Klaviyo stack looks like it does a lot of heavy lifting.",
             "line2": "Keen to share how teams like yours cut manual lead follow-ups."},
            {"line1": "Growth leaders who live in GA4 usually fight messy dashboards.",
             "line2": "I turn those weekly reports into a one-click tool."}
        ],
        "notes": "Anchored on the ARR milestone and the marketing stack."
    })
    .to_string()
}

#[derive(Default)]
pub struct ScriptedProvider {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, model: &str, script: Script) -> Self {
        self.scripts.insert(model.to_string(), script);
        self
    }

    /// Models called so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.model.to_string());
        }

        match self.scripts.get(request.model).cloned() {
            Some(Script::Reply(text)) => Ok(text),
            Some(Script::ApiError {
                status,
                message,
                code,
            }) => Err(LlmError::Api {
                status,
                message,
                code,
            }),
            Some(Script::Hang) => {
                tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
                Err(LlmError::EmptyContent)
            }
            None => Err(LlmError::Api {
                status: 404,
                message: format!("The model `{}` does not exist", request.model),
                code: Some("model_not_found".to_string()),
            }),
        }
    }
}
