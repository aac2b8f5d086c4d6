use std::sync::Arc;

use fixture_core::{LocalStrategy, OptimizationRequest, OptimizationResult};

use crate::config::{OptimizerConfig, ProviderMode};
use crate::provider::{self, CompletionOptions, TextGenerationProvider};
use crate::strategy::ProviderStrategy;

/// The entry point for seeding participants.
///
/// The strategy is selected by [`OptimizerConfig::mode`]. Whatever happens while talking to a
/// provider, [`optimize`] always returns a result: failures are answered by the
/// [`LocalStrategy`] instead.
///
/// [`optimize`]: Self::optimize
#[derive(Clone)]
pub struct FixtureOptimizationService {
    mode: ProviderMode,
    provider: Option<ProviderStrategy>,
    local: LocalStrategy,
}

impl FixtureOptimizationService {
    /// Creates a new `FixtureOptimizationService` from `config`.
    ///
    /// A provider mode without a usable provider, e.g. because the api key is missing, is not an
    /// error. Every call is answered locally instead.
    pub fn new(config: &OptimizerConfig) -> Self {
        let provider = config.mode.provider().and_then(|kind| {
            let provider = match provider::from_config(kind, config) {
                Ok(provider) => provider,
                Err(err) => {
                    log::warn!("{} provider is unavailable: {}", kind, err);
                    return None;
                }
            };

            Self::strategy(provider, config.into())
        });

        Self {
            mode: config.mode,
            provider,
            local: LocalStrategy::new(),
        }
    }

    /// Creates a new `FixtureOptimizationService` calling `provider`.
    pub fn with_provider(
        provider: Arc<dyn TextGenerationProvider>,
        options: CompletionOptions,
    ) -> Self {
        let mode = match provider.kind() {
            provider::ProviderKind::OpenAi => ProviderMode::OpenAi,
            provider::ProviderKind::Anthropic => ProviderMode::Anthropic,
        };

        Self {
            mode,
            provider: Self::strategy(provider, options),
            local: LocalStrategy::new(),
        }
    }

    /// Creates a new `FixtureOptimizationService` that only uses the [`LocalStrategy`].
    pub fn local() -> Self {
        Self {
            mode: ProviderMode::Local,
            provider: None,
            local: LocalStrategy::new(),
        }
    }

    #[inline]
    pub fn mode(&self) -> ProviderMode {
        self.mode
    }

    fn strategy(
        provider: Arc<dyn TextGenerationProvider>,
        options: CompletionOptions,
    ) -> Option<ProviderStrategy> {
        match ProviderStrategy::new(provider, options) {
            Ok(strategy) => Some(strategy),
            Err(err) => {
                log::error!("Failed to create provider strategy: {}", err);
                None
            }
        }
    }

    /// Arranges the participants of `request` into a seeding order.
    ///
    /// The order of the returned [`OptimizationResult`] is always a permutation of the
    /// participant ids of `request`.
    pub async fn optimize(&self, request: &OptimizationRequest) -> OptimizationResult {
        // Nothing to arrange, the provider is not consulted.
        if request.participants.len() <= 1 {
            return self.local.optimize(request);
        }

        let strategy = match (&self.provider, self.mode) {
            (Some(strategy), _) => strategy,
            (None, ProviderMode::Local) => {
                log::debug!("Using local strategy");
                return self.local.optimize(request);
            }
            (None, mode) => {
                log::warn!("No usable {} provider, using local strategy", mode);
                return self.fallback(request);
            }
        };

        log::debug!("Using {} strategy", strategy.provider().kind());

        match strategy.optimize(request).await {
            Ok(result) => result,
            Err(err) => {
                log::error!(
                    "{} provider failed, falling back to local strategy: {}",
                    strategy.provider().kind(),
                    err
                );

                self.fallback(request)
            }
        }
    }

    fn fallback(&self, request: &OptimizationRequest) -> OptimizationResult {
        let mut result = self.local.optimize(request);
        result.fallback = true;
        result
    }
}

impl Default for FixtureOptimizationService {
    #[inline]
    fn default() -> Self {
        Self::local()
    }
}
