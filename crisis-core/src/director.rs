//! The crisis director.
//!
//! Owns the completion client and the generation settings, and exposes the
//! four generation steps the rest of the system needs: the opening
//! scenario, per-turn decision processing, post-run advice, and a generic
//! chat relay. The director performs no state mutation itself — decision
//! replies come back parsed but unapplied.

use crate::parse::{parse_reply, ModelReply};
use crate::prompts;
use crate::state::SessionState;
use mistral::{Message, Mistral, Request};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Errors from the director.
#[derive(Debug, Error)]
pub enum DirectorError {
    #[error("Mistral API error: {0}")]
    Api(#[from] mistral::Error),

    #[error("No API key configured")]
    NoApiKey,
}

/// Generation settings for the director.
#[derive(Debug, Clone)]
pub struct DirectorConfig {
    /// Model override; the client default is used when absent.
    pub model: Option<String>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Maximum tokens per generation.
    pub max_tokens: usize,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            model: None,
            temperature: Some(0.7),
            max_tokens: 1000,
        }
    }
}

/// The LLM-facing orchestration layer.
pub struct CrisisDirector {
    client: Mistral,
    config: DirectorConfig,
}

impl CrisisDirector {
    /// Create a director with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Mistral::new(api_key),
            config: DirectorConfig::default(),
        }
    }

    /// Create a director from the MISTRAL_API_KEY environment variable.
    pub fn from_env() -> Result<Self, DirectorError> {
        let client = Mistral::from_env().map_err(|_| DirectorError::NoApiKey)?;
        Ok(Self {
            client,
            config: DirectorConfig::default(),
        })
    }

    /// Use an already-built client (custom timeout, model, ...).
    pub fn with_client(client: Mistral) -> Self {
        Self {
            client,
            config: DirectorConfig::default(),
        }
    }

    /// Configure the director.
    pub fn with_config(mut self, config: DirectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Relay an arbitrary conversation and return the generated text.
    pub async fn chat(&self, messages: Vec<Message>) -> Result<String, DirectorError> {
        let response = self.client.complete(self.request(messages)).await?;
        Ok(response.text().to_string())
    }

    /// Generate the opening crisis scenario for the given starting state.
    pub async fn generate_scenario(&self, state: &SessionState) -> Result<String, DirectorError> {
        debug!("generating crisis scenario");
        let prompt = prompts::scenario_prompt(state);
        self.chat(vec![Message::user(prompt)]).await
    }

    /// Resolve one user decision into a parsed reply.
    ///
    /// Only the completion call can fail here; malformed reply text
    /// degrades inside the parser rather than erroring.
    pub async fn process_decision(
        &self,
        state: &SessionState,
        user_action: &str,
        recent_events: &[String],
    ) -> Result<ModelReply, DirectorError> {
        debug!(action = user_action, "processing user decision");
        let prompt = prompts::decision_prompt(state, user_action, recent_events);
        let text = self.chat(vec![Message::user(prompt)]).await?;

        let reply = parse_reply(&text);
        debug!(
            narrative_len = reply.narrative.len(),
            directives = reply.directives.len(),
            "parsed decision reply"
        );
        Ok(reply)
    }

    /// Generate personalized preparedness advice from a completed run.
    pub async fn generate_advice(
        &self,
        profile: &Value,
        final_state: &SessionState,
        simulation_log: &[String],
    ) -> Result<String, DirectorError> {
        debug!("generating personalized crisis advice");
        let prompt = prompts::advice_prompt(profile, final_state, simulation_log);
        self.chat(vec![Message::user(prompt)]).await
    }

    fn request(&self, messages: Vec<Message>) -> Request {
        let mut request = Request::new(messages).with_max_tokens(self.config.max_tokens);
        if let Some(ref model) = self.config.model {
            request = request.with_model(model);
        }
        if let Some(temperature) = self.config.temperature {
            request = request.with_temperature(temperature);
        }
        request
    }
}
