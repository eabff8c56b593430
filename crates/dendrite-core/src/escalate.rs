//! Escalation to a local Ollama model for questions the rule tiers cannot
//! answer. Wraps ollama-rs with a simple API; every escalated question
//! carries the same fixed description of the note-taking domain.
//!
//! Failures never reach the user raw: the router catches them and replies
//! with canned text instead.

use ollama_rs::generation::completion::request::GenerationRequest;
use ollama_rs::Ollama;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "llama3.2";
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Static context bundle sent unchanged with every escalated question.
pub const DOMAIN_CONTEXT: &str = "\
You are the assistant inside a local note-taking system (a \"second brain\"). \
The vault holds three kinds of markdown notes: fleeting notes (one file per \
captured thought under Notes/Fleeting), journal notes (daily, weekly, and \
monthly logs under Notes/Journal), and project notes (one append-only log per \
project under Projects). Captured thoughts are classified into categories \
such as task, idea, decision, or question, and expanded into a scaffold the \
user completes by hand. Answer briefly and concretely.";

/// Seam for the external-AI collaborator, so the router can be exercised
/// with a stub.
pub trait Escalator {
    fn escalate(
        &self,
        question: &str,
    ) -> impl std::future::Future<Output = Result<String, EscalateError>> + Send;
}

/// Thin wrapper around Ollama for completion-based escalation.
#[derive(Debug, Clone)]
pub struct OllamaEscalator {
    inner: Ollama,
    model: String,
}

impl OllamaEscalator {
    /// Create from URL string. Default: http://localhost:11434.
    pub fn from_url(url: &str) -> Result<Self, EscalateError> {
        let inner = Ollama::try_new(url).map_err(EscalateError::ParseUrl)?;
        Ok(Self { inner, model: DEFAULT_MODEL.to_string() })
    }

    /// Create with default localhost:11434.
    pub fn localhost() -> Self {
        Self::from_url(DEFAULT_BASE_URL).expect("default URL is valid")
    }

    /// Set the completion model (e.g. `llama3.2`, `mistral`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Escalator for OllamaEscalator {
    async fn escalate(&self, question: &str) -> Result<String, EscalateError> {
        let prompt = format!("{DOMAIN_CONTEXT}\n\nQuestion: {question}");
        let res = self
            .inner
            .generate(GenerationRequest::new(self.model.clone(), prompt))
            .await
            .map_err(|e| EscalateError::Request(e.to_string()))?;
        Ok(res.response)
    }
}

#[derive(Debug, Error)]
pub enum EscalateError {
    #[error("invalid Ollama URL: {0}")]
    ParseUrl(#[from] url::ParseError),
    #[error("escalation request failed: {0}")]
    Request(String),
}
