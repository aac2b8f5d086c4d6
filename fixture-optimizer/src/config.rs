use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::ProviderKind;

/// Selects the strategy used by the [`FixtureOptimizationService`].
///
/// [`FixtureOptimizationService`]: crate::FixtureOptimizationService
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderMode {
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    #[default]
    Local,
}

impl ProviderMode {
    /// Returns the [`ProviderKind`] of this mode, or `None` for [`ProviderMode::Local`].
    #[inline]
    pub fn provider(self) -> Option<ProviderKind> {
        match self {
            Self::OpenAi => Some(ProviderKind::OpenAi),
            Self::Anthropic => Some(ProviderKind::Anthropic),
            Self::Local => None,
        }
    }
}

impl Display for ProviderMode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Local => "local",
        })
    }
}

impl FromStr for ProviderMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "local" => Ok(Self::Local),
            _ => Err(UnknownMode(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown optimizer mode: {0}")]
pub struct UnknownMode(pub String);

/// Connection settings of a single provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// The credential of the provider. A provider without a key is never called.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl ProviderConfig {
    /// Returns the default `ProviderConfig` of `kind` without an api key.
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            api_key: None,
            model: kind.default_model().to_owned(),
            base_url: kind.default_base_url().to_owned(),
        }
    }

    /// Returns the api key if one is configured and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    /// Returns the configured model, or the default model of `kind` if none is set.
    pub fn model(&self, kind: ProviderKind) -> &str {
        non_empty(&self.model).unwrap_or_else(|| kind.default_model())
    }

    /// Returns the configured base url, or the default base url of `kind` if none is set.
    pub fn base_url(&self, kind: ProviderKind) -> &str {
        non_empty(&self.base_url)
            .unwrap_or_else(|| kind.default_base_url())
            .trim_end_matches('/')
    }
}

#[inline]
fn non_empty(s: &str) -> Option<&str> {
    Some(s.trim()).filter(|s| !s.is_empty())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub mode: ProviderMode,
    pub openai: ProviderConfig,
    pub anthropic: ProviderConfig,
    /// Sampling temperature sent to the provider. Kept low to favor stable replies.
    pub temperature: f32,
    /// Upper bound of tokens in the provider reply.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl OptimizerConfig {
    /// Returns the [`ProviderConfig`] of `kind`.
    pub fn provider(&self, kind: ProviderKind) -> &ProviderConfig {
        match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Anthropic => &self.anthropic,
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            mode: ProviderMode::default(),
            openai: ProviderConfig::new(ProviderKind::OpenAi),
            anthropic: ProviderConfig::new(ProviderKind::Anthropic),
            temperature: 0.3,
            max_tokens: 1000,
            timeout: 30,
        }
    }
}

impl Default for ProviderConfig {
    #[inline]
    fn default() -> Self {
        Self {
            api_key: None,
            model: String::new(),
            base_url: String::new(),
        }
    }
}
