//! # fixture-optimizer
//!
//! Seeds tournament participants using an external text generation provider, falling back to
//! the deterministic [`LocalStrategy`] of `fixture-core` whenever the provider is not configured
//! or fails.
//!
//! Important types:
//! - [`FixtureOptimizationService`]: The entry point. Never returns an error.
//! - [`TextGenerationProvider`]: The capability to complete a prompt. Implemented by
//! [`OpenAiProvider`] and [`AnthropicProvider`], and by fakes in tests.
//! - [`ProviderStrategy`]: Renders the prompt, calls the provider and parses its reply.
//! - [`OptimizerConfig`]: Selects the provider and holds its credentials.
//!
//! [`LocalStrategy`]: fixture_core::LocalStrategy
pub mod config;
pub mod parse;
pub mod prompt;
pub mod provider;

mod service;
mod strategy;

pub use config::{OptimizerConfig, ProviderConfig, ProviderMode};
pub use provider::{
    AnthropicProvider, CompletionOptions, OpenAiProvider, ProviderError, ProviderKind,
    TextGenerationProvider,
};
pub use service::FixtureOptimizationService;
pub use strategy::ProviderStrategy;
