//! External text generation providers.
//!
//! A provider is anything implementing [`TextGenerationProvider`]: it receives a rendered prompt
//! and returns the raw reply text. Interpreting the reply is left to the caller.
mod anthropic;
mod openai;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fixture_core::{confidence, StrategyKind};
use thiserror::Error;

use crate::config::OptimizerConfig;

/// Instructions given to every provider ahead of the prompt.
pub(crate) const SYSTEM_PROMPT: &str = "You are an expert tournament organizer. You arrange \
    participants into fair and competitive fixtures and always answer with valid JSON.";

/// A capability to turn a prompt into generated text.
#[async_trait]
pub trait TextGenerationProvider: Send + Sync {
    /// Returns the kind of this provider.
    fn kind(&self) -> ProviderKind;

    /// Sends `prompt` to the provider and returns the text of its reply.
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String>;
}

/// Sampling options of a single completion request.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    #[inline]
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 1000,
        }
    }
}

impl From<&OptimizerConfig> for CompletionOptions {
    #[inline]
    fn from(config: &OptimizerConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// The known external providers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
}

impl ProviderKind {
    /// Returns the fixed confidence score of results produced by this provider.
    #[inline]
    pub fn confidence(self) -> u8 {
        match self {
            Self::OpenAi => confidence::OPENAI,
            Self::Anthropic => confidence::ANTHROPIC,
        }
    }

    #[inline]
    pub fn strategy(self) -> StrategyKind {
        match self {
            Self::OpenAi => StrategyKind::OpenAi,
            Self::Anthropic => StrategyKind::Anthropic,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Anthropic => "claude-3-5-haiku-latest",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com/v1",
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
        })
    }
}

/// Creates the [`TextGenerationProvider`] of `kind` from `config`.
///
/// # Errors
///
/// Returns [`ProviderError::MissingCredential`] if no api key is configured for `kind`, or
/// [`ProviderError::Http`] if the http client cannot be created.
pub fn from_config(
    kind: ProviderKind,
    config: &OptimizerConfig,
) -> Result<Arc<dyn TextGenerationProvider>> {
    let timeout = Duration::from_secs(config.timeout);
    let provider_config = config.provider(kind);

    let provider: Arc<dyn TextGenerationProvider> = match kind {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(provider_config, timeout)?),
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(provider_config, timeout)?),
    };

    Ok(provider)
}

/// An `Result<T>` using [`ProviderError`] as an error type.
pub type Result<T> = std::result::Result<T, ProviderError>;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no api key configured for {0}")]
    MissingCredential(ProviderKind),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("provider reply contained no text")]
    EmptyReply,
}
