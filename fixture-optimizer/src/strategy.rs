use std::sync::Arc;

use fixture_core::{confidence, OptimizationRequest, OptimizationResult};

use crate::parse::ReplyParser;
use crate::prompt;
use crate::provider::{CompletionOptions, ProviderError, TextGenerationProvider};

/// Seeds participants by asking a [`TextGenerationProvider`].
///
/// A reply that cannot be interpreted is not an error: the participants are returned in their
/// original order. Only a failure to obtain a reply at all is returned as an error.
#[derive(Clone)]
pub struct ProviderStrategy {
    provider: Arc<dyn TextGenerationProvider>,
    options: CompletionOptions,
    parser: ReplyParser,
}

impl ProviderStrategy {
    pub fn new(
        provider: Arc<dyn TextGenerationProvider>,
        options: CompletionOptions,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            provider,
            options,
            parser: ReplyParser::new()?,
        })
    }

    #[inline]
    pub fn provider(&self) -> &dyn TextGenerationProvider {
        &*self.provider
    }

    pub async fn optimize(
        &self,
        request: &OptimizationRequest,
    ) -> Result<OptimizationResult, ProviderError> {
        let kind = self.provider.kind();
        let prompt = prompt::render(request);

        log::debug!(
            "Requesting seeding of {} participants from {}",
            request.participants.len(),
            kind
        );

        let text = self.provider.complete(&prompt, &self.options).await?;

        let result = match self.parser.parse(&text, &request.participants) {
            Ok(reply) => OptimizationResult {
                order: reply.order,
                reasoning: reply.reasoning,
                confidence: kind.confidence(),
                suggestions: reply.suggestions,
                strategy: kind.strategy(),
                fallback: false,
            },
            Err(err) => {
                log::warn!("Failed to parse {} reply: {}", kind, err);

                OptimizationResult {
                    order: request.ids(),
                    reasoning: format!(
                        "Failed to parse the {} response ({}), the original order is kept.",
                        kind, err
                    ),
                    confidence: confidence::PARSE_FALLBACK,
                    suggestions: Vec::new(),
                    strategy: kind.strategy(),
                    fallback: false,
                }
            }
        };

        Ok(result)
    }
}
