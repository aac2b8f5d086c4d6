//! # fixture-core
//!
//! This crate contains the pure, I/O free parts of building tournament fixtures: arranging
//! participants into a seeding order and laying out a single elimination bracket for display.
//!
//! Important types:
//! - [`Participant`]: An entrant of a tournament with an optional team and performance stats.
//! - [`OptimizationRequest`]: The participants, format, goals and constraints of a seeding run.
//! - [`OptimizationResult`]: A seeding order together with reasoning and a confidence score.
//! - [`LocalStrategy`]: The deterministic seeding strategy. It never fails.
//! - [`Match`]: A *match* or *heat* of a bracket, linked to other matches only through its
//! round and match number.
//! - [`LayoutEngine`]: Computes the on-screen position and connector lines of every match.
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to all public data types.
//!
pub mod layout;
pub mod seeding;
mod strategy;
mod utils;

pub use layout::{EntrantKind, Layout, LayoutEngine};
pub use strategy::{confidence, LocalStrategy};

use thiserror::Error;

use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The unique identifier of a [`Participant`].
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[repr(transparent)]
pub struct ParticipantId(pub String);

impl Display for ParticipantId {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for ParticipantId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    #[inline]
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ParticipantId {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// An entrant taking part in a tournament.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub team_id: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub team_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: Option<Stats>,
}

impl Participant {
    /// Creates a new `Participant` without a team or stats.
    pub fn new<I, N>(id: I, name: N) -> Self
    where
        I: Into<ParticipantId>,
        N: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            team_id: None,
            team_name: None,
            stats: None,
        }
    }

    /// Returns the win rate of the participant in percent, if it is known.
    #[inline]
    pub fn win_rate(&self) -> Option<f64> {
        self.stats.as_ref().map(|stats| stats.win_rate)
    }
}

/// Performance statistics of a [`Participant`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stats {
    pub wins: u32,
    pub losses: u32,
    /// The win rate in percent, between `0` and `100`.
    pub win_rate: f64,
}

/// The format of the draw a seeding is produced for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Format {
    #[default]
    Knockout,
    RoundRobin,
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Knockout => "knockout",
            Self::RoundRobin => "round robin",
        })
    }
}

/// Soft goals applied when arranging participants. All goals are independent flags.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Goals {
    pub balance_skill_levels: bool,
    pub avoid_same_team_first_round: bool,
    pub prioritize_competitive_matches: bool,
    pub fair_scheduling: bool,
}

/// Scheduling bounds. These are only ever described to an external provider and are never
/// enforced on the produced order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Constraints {
    pub max_matches_per_day: Option<u32>,
    /// Minimum rest between two matches of the same participant, in minutes.
    pub min_rest_between_matches: Option<u32>,
}

impl Constraints {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max_matches_per_day.is_none() && self.min_rest_between_matches.is_none()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptimizationRequest {
    pub participants: Vec<Participant>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub format: Format,
    #[cfg_attr(feature = "serde", serde(default))]
    pub goals: Goals,
    #[cfg_attr(feature = "serde", serde(default))]
    pub constraints: Constraints,
}

impl OptimizationRequest {
    /// Returns the ids of all participants in their input order.
    pub fn ids(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.id.clone()).collect()
    }
}

/// The strategy that produced an [`OptimizationResult`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StrategyKind {
    Local,
    #[cfg_attr(feature = "serde", serde(rename = "openai"))]
    OpenAi,
    Anthropic,
}

/// A seeding order and the metadata describing how it was produced.
///
/// `order` is always a permutation of the ids of the request's participants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptimizationResult {
    pub order: Vec<ParticipantId>,
    pub reasoning: String,
    /// Strategy defined confidence between `0` and `100`.
    pub confidence: u8,
    pub suggestions: Vec<String>,
    pub strategy: StrategyKind,
    /// `true` if the local strategy answered in place of a failed or unconfigured provider.
    pub fallback: bool,
}

/// An `Result<T>` using [`OrderError`] as an error type.
pub type Result<T> = std::result::Result<T, OrderError>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("invalid order length: expected {expected}, found {found}")]
    Length { expected: usize, found: usize },
    #[error("participant {0} appears more than once")]
    Duplicate(ParticipantId),
    #[error("unknown participant {0}")]
    Unknown(ParticipantId),
}

/// Checks that `order` contains every id of `participants` exactly once.
pub fn validate_order(participants: &[Participant], order: &[ParticipantId]) -> Result<()> {
    if participants.len() != order.len() {
        return Err(OrderError::Length {
            expected: participants.len(),
            found: order.len(),
        });
    }

    let known: HashSet<&ParticipantId> = participants.iter().map(|p| &p.id).collect();
    let mut seen = HashSet::with_capacity(order.len());

    for id in order {
        if !known.contains(id) {
            return Err(OrderError::Unknown(id.clone()));
        }

        if !seen.insert(id) {
            return Err(OrderError::Duplicate(id.clone()));
        }
    }

    Ok(())
}

/// The state of a [`Match`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MatchStatus {
    #[default]
    Draft,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Walkover,
}

impl MatchStatus {
    /// Returns the human readable label of the status. A walkover is displayed as a bye.
    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Scheduled => "Scheduled",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Walkover => "Bye",
        }
    }
}

impl Display for MatchStatus {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A match of two parties within a bracket.
///
/// A `Match` has no pointer to the match its winner advances to. The bracket tree is derived
/// from `round` and `match_number` alone, see [`layout::parent_of`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Match {
    pub id: u64,
    /// The 1-based round, `1` being the earliest round.
    pub round: u32,
    /// The 1-based number of the match within its round.
    pub match_number: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub home: Option<ParticipantId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub away: Option<ParticipantId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub home_score: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub away_score: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub winner: Option<ParticipantId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: MatchStatus,
}

impl Match {
    /// Creates a new [`MatchStatus::Draft`] `Match` without any participants.
    #[inline]
    pub fn new(id: u64, round: u32, match_number: u32) -> Self {
        Self {
            id,
            round,
            match_number,
            ..Default::default()
        }
    }

    /// Returns `true` if the match has a winner.
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.winner.is_some()
    }

    /// Returns `true` if the match was resolved without play.
    #[inline]
    pub fn is_bye(&self) -> bool {
        matches!(self.status, MatchStatus::Walkover)
    }
}
