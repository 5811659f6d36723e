//! ConsultationService - one persona, one question, one answer.
//!
//! Every call is independent: the service keeps no history and no counters,
//! so a single instance can be shared across tasks.

use std::sync::Arc;

use sage_core::chat::{ChatBackend, ChatMessage, ChatRequest};
use sage_core::consultation::{
    ConsultationRequest, ConsultationResult, DEFAULT_MODEL, ErrorKind, MAX_OUTPUT_TOKENS,
    TEMPERATURE,
};
use sage_core::persona::{Persona, PersonaCatalog};

pub struct ConsultationService<B: ChatBackend> {
    backend: B,
    catalog: Arc<PersonaCatalog>,
    model: String,
}

impl<B: ChatBackend> ConsultationService<B> {
    /// Uses the built-in persona catalog and the default model.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            catalog: PersonaCatalog::builtin(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_catalog(mut self, catalog: Arc<PersonaCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn catalog(&self) -> &PersonaCatalog {
        &self.catalog
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Validates the input, asks the backend once and classifies the outcome.
    ///
    /// Checks run in order and the first failure wins: credentials, persona,
    /// query. Nothing is sent upstream unless all three pass. Upstream
    /// failures are returned as [`ErrorKind::UpstreamError`], never raised.
    pub async fn consult(
        &self,
        persona_key: &str,
        query_text: &str,
        credentials: Option<&str>,
    ) -> ConsultationResult {
        let Some(credentials) = credentials.filter(|token| !token.trim().is_empty()) else {
            tracing::debug!("Rejected consultation: no credentials");
            return ConsultationResult::failure(
                ErrorKind::MissingCredentials,
                "no API key was supplied",
            );
        };

        let Some(persona) = self.catalog.lookup_str(persona_key) else {
            tracing::debug!("Rejected consultation: unknown persona '{}'", persona_key);
            return ConsultationResult::failure(
                ErrorKind::UnknownPersona,
                format!("unknown persona key '{persona_key}'"),
            );
        };

        if query_text.trim().is_empty() {
            tracing::debug!("Rejected consultation: empty query");
            return ConsultationResult::failure(ErrorKind::EmptyQuery, "query is empty");
        }

        let request = self.build_request(persona, query_text);
        tracing::info!(
            persona = %persona.key,
            model = %self.model,
            backend = self.backend.name(),
            "Dispatching consultation"
        );

        match self.backend.complete(credentials, request).await {
            Ok(text) => ConsultationResult::success(text),
            Err(err) => {
                tracing::warn!(
                    persona = %persona.key,
                    kind = err.kind_label(),
                    "Upstream call failed: {}",
                    err
                );
                err.into()
            }
        }
    }

    /// Same as [`ConsultationService::consult`], taking a request value.
    pub async fn consult_request(
        &self,
        request: &ConsultationRequest,
        credentials: Option<&str>,
    ) -> ConsultationResult {
        self.consult(&request.persona_key, &request.query_text, credentials)
            .await
    }

    fn build_request(&self, persona: &Persona, query_text: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(persona.instruction.clone()),
                ChatMessage::user(query_text),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}
