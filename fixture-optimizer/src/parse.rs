use fixture_core::{validate_order, OrderError, Participant, ParticipantId};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_REASONING: &str = "No reasoning was provided.";

/// The usable content of a provider reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub order: Vec<ParticipantId>,
    pub reasoning: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("reply contains no json object")]
    NoJsonObject,
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidOrder(#[from] OrderError),
}

/// Extracts a [`Reply`] from free text.
///
/// The text may contain anything around the json object. The first object starting with a key
/// or closing immediately is parsed, anything after its closing brace is ignored. Every missing
/// key falls back to its default independently.
#[derive(Clone, Debug)]
pub struct ReplyParser {
    object_start: Regex,
}

impl ReplyParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            object_start: Regex::new(r#"\{\s*["}]"#)?,
        })
    }

    /// Parses `text` as a reply ordering `participants`.
    ///
    /// # Errors
    ///
    /// Returns an error if no json object is found, the object is invalid, or the `order` is not
    /// a permutation of the ids of `participants`.
    pub fn parse(&self, text: &str, participants: &[Participant]) -> Result<Reply, ParseError> {
        let start = self
            .object_start
            .find(text)
            .ok_or(ParseError::NoJsonObject)?
            .start();

        let raw: RawReply = serde_json::Deserializer::from_str(&text[start..])
            .into_iter::<RawReply>()
            .next()
            .ok_or(ParseError::NoJsonObject)??;

        let order = match raw.order {
            Some(order) => {
                let order: Vec<ParticipantId> = order.into_iter().map(ParticipantId).collect();
                validate_order(participants, &order)?;
                order
            }
            None => participants.iter().map(|p| p.id.clone()).collect(),
        };

        Ok(Reply {
            order,
            reasoning: raw
                .reasoning
                .unwrap_or_else(|| DEFAULT_REASONING.to_owned()),
            suggestions: raw.suggestions.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawReply {
    order: Option<Vec<String>>,
    reasoning: Option<String>,
    suggestions: Option<Vec<String>>,
}
