//! # Bracket Layout
//!
//! The `layout` module computes where every [`Match`] of a single elimination bracket is drawn
//! and how the lines connecting it to the next round are routed.
//!
//! Matches are not linked to each other explicitly. A match at `index` within `round` (sorted by
//! match number) feeds into the match at `index / 2` of the next round, see [`parent_of`]. Even
//! indexes are the top feeder, odd indexes the bottom feeder:
//!
//! ```text
//! |   ROUND 1   |   ROUND 2   |    FINAL    |
//! | ----------- | ----------- | ----------- |
//! | Match[0] ---|             |             |
//! |             |-- Match[0] -|             |
//! | Match[1] ---|             |             |
//! |             |             |-- Match[0]  |
//! | Match[2] ---|             |             |
//! |             |-- Match[1] -|             |
//! | Match[3] ---|             |             |
//! ```
//!
//! The canvas always reserves space for a perfect power-of-two bracket. Positions are derived
//! backwards from the final, which is centered vertically.
use crate::utils::NumExt;
use crate::Match;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The type of entrants playing in the bracket. Player cards are larger than team cards.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EntrantKind {
    Player,
    #[default]
    Team,
}

impl EntrantKind {
    /// Returns the [`Dimensions`] used to draw matches of this kind.
    pub fn dimensions(self) -> Dimensions {
        match self {
            Self::Player => Dimensions {
                match_width: 260.0,
                match_height: 96.0,
                vertical_gap: 24.0,
                round_gap: 64.0,
            },
            Self::Team => Dimensions {
                match_width: 220.0,
                match_height: 72.0,
                vertical_gap: 24.0,
                round_gap: 64.0,
            },
        }
    }
}

impl Display for EntrantKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Player => "Player",
            Self::Team => "Team",
        })
    }
}

/// The size of a match card and the spacing between cards, in layout units.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dimensions {
    pub match_width: f64,
    pub match_height: f64,
    /// Space between two matches of the same round in a fully populated round.
    pub vertical_gap: f64,
    /// Horizontal space between two rounds. Connectors are routed within this space.
    pub round_gap: f64,
}

impl Dimensions {
    /// Returns the height reserved for a single match in the first round of a perfect bracket.
    #[inline]
    pub fn slot_height(&self) -> f64 {
        self.match_height + self.vertical_gap
    }
}

impl Default for Dimensions {
    #[inline]
    fn default() -> Self {
        EntrantKind::default().dimensions()
    }
}

/// Returns the `(round, index)` of the match the winner of the match at `index` within `round`
/// advances to.
#[inline]
pub fn parent_of(round: u32, index: usize) -> (u32, usize) {
    (round.saturating_add(1), index / 2)
}

/// The slot a feeder match occupies in the match it feeds into.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FeederSlot {
    Top,
    Bottom,
}

impl FeederSlot {
    /// Returns the `FeederSlot` of the match at `index` within its round.
    #[inline]
    pub fn of(index: usize) -> Self {
        if index % 2 == 0 {
            Self::Top
        } else {
            Self::Bottom
        }
    }

    /// Returns `true` if this `FeederSlot` is [`Top`].
    ///
    /// [`Top`]: Self::Top
    #[inline]
    pub fn is_top(&self) -> bool {
        matches!(self, Self::Top)
    }
}

/// Returns the display label of `round` in a bracket with `total_rounds` rounds.
///
/// The last round is the final and the one before it the semi-finals. Quarter-finals are only
/// named as such when they are not the opening round; an opening round is always numbered.
pub fn round_label(round: u32, total_rounds: u32) -> Cow<'static, str> {
    match total_rounds.checked_sub(round) {
        Some(0) => Cow::Borrowed("Final"),
        Some(1) if total_rounds > 1 => Cow::Borrowed("Semi-Finals"),
        Some(2) if total_rounds > 3 => Cow::Borrowed("Quarter-Finals"),
        _ => Cow::Owned(format!("Round {}", round)),
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConnectorKind {
    /// Horizontal line from the right edge of a match to the middle of the round gap.
    Stub,
    /// Vertical line joining the stubs of two sibling feeders.
    Vertical,
    /// Horizontal line from the middle of a [`Vertical`] line into the next round.
    ///
    /// [`Vertical`]: Self::Vertical
    Join,
}

/// A presentation hint whether the line leads to a decided result.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConnectorState {
    Resolved,
    Pending,
}

impl ConnectorState {
    #[inline]
    fn from_resolved(resolved: bool) -> Self {
        if resolved {
            Self::Resolved
        } else {
            Self::Pending
        }
    }
}

/// A straight line segment between two points.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Connector {
    pub kind: ConnectorKind,
    pub from: Point,
    pub to: Point,
    pub state: ConnectorState,
}

/// The computed position of a single [`Match`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchPosition {
    pub id: u64,
    pub round: u32,
    /// The index of the match within its round, ordered by match number.
    pub index: usize,
    pub x: f64,
    pub top_y: f64,
    pub center_y: f64,
    pub connectors: Vec<Connector>,
}

/// A labeled column containing all matches of a round.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoundColumn {
    pub round: u32,
    pub label: String,
    pub x: f64,
}

/// The output of [`LayoutEngine::layout`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layout {
    pub rounds: Vec<RoundColumn>,
    /// All positioned matches, ordered by round and index.
    pub matches: Vec<MatchPosition>,
    pub width: f64,
    pub height: f64,
}

impl Layout {
    /// Returns the [`MatchPosition`] of the match with the given `id`.
    pub fn get(&self, id: u64) -> Option<&MatchPosition> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Returns the labels of all rounds in ascending round order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.rounds.iter().map(|r| r.label.as_str())
    }
}

/// Lays out single elimination brackets.
///
/// `LayoutEngine` keeps no state between calls, laying out the same matches twice yields the
/// same [`Layout`].
#[derive(Copy, Clone, Debug, Default)]
pub struct LayoutEngine {
    dimensions: Dimensions,
}

impl LayoutEngine {
    /// Creates a new `LayoutEngine` using the dimensions of `kind`.
    #[inline]
    pub fn new(kind: EntrantKind) -> Self {
        Self::with_dimensions(kind.dimensions())
    }

    #[inline]
    pub fn with_dimensions(dimensions: Dimensions) -> Self {
        Self { dimensions }
    }

    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Computes the [`Layout`] of `matches`.
    ///
    /// This never fails. A match whose next round has no match to feed into is spaced evenly
    /// within its own round instead.
    pub fn layout(&self, matches: &[Match]) -> Layout {
        let dims = self.dimensions;

        let mut rounds: BTreeMap<u32, Vec<&Match>> = BTreeMap::new();
        for m in matches {
            rounds.entry(m.round).or_default().push(m);
        }

        for round in rounds.values_mut() {
            round.sort_by_key(|m| m.match_number);
        }

        let total_rounds = match rounds.keys().next_back() {
            Some(round) => *round,
            None => return Layout::default(),
        };

        let height = total_rounds.saturating_sub(1).exp2_clamped() * dims.slot_height();

        log::debug!(
            "Laying out {} matches in {} rounds (height {})",
            matches.len(),
            total_rounds,
            height
        );

        // Center of every match, derived backwards starting at the final. A center is linked
        // if it was derived from the match it feeds into.
        let mut centers: BTreeMap<u32, Vec<Center>> = BTreeMap::new();
        for (&round, round_matches) in rounds.iter().rev() {
            let next = round
                .checked_add(1)
                .and_then(|next_round| centers.get(&next_round));

            // Height of a single slot in this round of a perfect bracket.
            let slot = height / (total_rounds - round).exp2_clamped();

            let round_centers: Vec<Center> = (0..round_matches.len())
                .map(|index| {
                    let (_, parent) = parent_of(round, index);

                    match next.and_then(|next| next.get(parent)) {
                        Some(parent) if round != total_rounds => {
                            let y = match FeederSlot::of(index) {
                                FeederSlot::Top => parent.y - slot / 2.0,
                                FeederSlot::Bottom => parent.y + slot / 2.0,
                            };

                            Center { y, linked: true }
                        }
                        _ => {
                            if round != total_rounds {
                                log::debug!(
                                    "No next match for match {} in round {}, spacing evenly",
                                    index,
                                    round
                                );
                            }

                            Center {
                                y: spaced_evenly(height, round_matches.len(), index),
                                linked: false,
                            }
                        }
                    }
                })
                .collect();

            centers.insert(round, round_centers);
        }

        // Round 0 gets a column of its own in front of round 1.
        let first_column = rounds.keys().next().map_or(1, |round| (*round).min(1));

        let mut layout = Layout {
            rounds: Vec::with_capacity(rounds.len()),
            matches: Vec::with_capacity(matches.len()),
            width: (f64::from(total_rounds - first_column) + 1.0)
                * (dims.match_width + dims.round_gap)
                - dims.round_gap,
            height,
        };

        for (&round, round_matches) in &rounds {
            let x = column_x(&dims, round - first_column);
            let round_centers = &centers[&round];

            layout.rounds.push(RoundColumn {
                round,
                label: round_label(round, total_rounds).into_owned(),
                x,
            });

            for (index, m) in round_matches.iter().enumerate() {
                let center = round_centers[index];

                let connectors = if round == total_rounds {
                    Vec::new()
                } else {
                    // Siblings are only joined where the match they feed into exists.
                    let sibling = round_matches
                        .get(index + 1)
                        .zip(round_centers.get(index + 1))
                        .filter(|_| center.linked && FeederSlot::of(index).is_top());

                    route_connectors(
                        &dims,
                        x,
                        (*m, center.y),
                        sibling.map(|(m, c)| (*m, c.y)),
                    )
                };

                layout.matches.push(MatchPosition {
                    id: m.id,
                    round,
                    index,
                    x,
                    top_y: center.y - dims.match_height / 2.0,
                    center_y: center.y,
                    connectors,
                });
            }
        }

        layout
    }
}

#[inline]
fn spaced_evenly(height: f64, len: usize, index: usize) -> f64 {
    height / len as f64 * (index as f64 + 0.5)
}

#[derive(Copy, Clone, Debug)]
struct Center {
    y: f64,
    linked: bool,
}

#[inline]
fn column_x(dims: &Dimensions, column: u32) -> f64 {
    f64::from(column) * (dims.match_width + dims.round_gap)
}

/// Routes the connectors of a match at column `x`. Only the top feeder of a sibling pair
/// carries the [`ConnectorKind::Vertical`] and [`ConnectorKind::Join`] lines.
fn route_connectors(
    dims: &Dimensions,
    x: f64,
    (m, center): (&Match, f64),
    sibling: Option<(&Match, f64)>,
) -> Vec<Connector> {
    let right = x + dims.match_width;
    let mid = right + dims.round_gap / 2.0;

    let mut connectors = vec![Connector {
        kind: ConnectorKind::Stub,
        from: Point::new(right, center),
        to: Point::new(mid, center),
        state: ConnectorState::from_resolved(m.is_resolved()),
    }];

    if let Some((sibling, sibling_center)) = sibling {
        let state = ConnectorState::from_resolved(m.is_resolved() && sibling.is_resolved());
        let join_y = (center + sibling_center) / 2.0;

        connectors.push(Connector {
            kind: ConnectorKind::Vertical,
            from: Point::new(mid, center),
            to: Point::new(mid, sibling_center),
            state,
        });
        connectors.push(Connector {
            kind: ConnectorKind::Join,
            from: Point::new(mid, join_y),
            to: Point::new(right + dims.round_gap, join_y),
            state,
        });
    }

    connectors
}

#[cfg(test)]
mod tests {
    use super::{
        parent_of, round_label, ConnectorKind, ConnectorState, EntrantKind, FeederSlot,
        LayoutEngine, Point,
    };
    use crate::{Match, ParticipantId};

    /// Builds a perfect bracket with `rounds` rounds. Match ids are assigned in round order,
    /// starting at 1.
    fn bracket(rounds: u32) -> Vec<Match> {
        let mut matches = Vec::new();
        let mut id = 1;

        for round in 1..=rounds {
            for number in 1..=(1 << (rounds - round)) {
                matches.push(Match::new(id, round, number));
                id += 1;
            }
        }

        matches
    }

    #[test]
    fn test_parent_of() {
        assert_eq!(parent_of(1, 0), (2, 0));
        assert_eq!(parent_of(1, 1), (2, 0));
        assert_eq!(parent_of(1, 2), (2, 1));
        assert_eq!(parent_of(3, 7), (4, 3));

        assert_eq!(FeederSlot::of(0), FeederSlot::Top);
        assert_eq!(FeederSlot::of(1), FeederSlot::Bottom);
        assert_eq!(FeederSlot::of(4), FeederSlot::Top);
    }

    #[test]
    fn test_round_label() {
        let labels: Vec<_> = (1..=3).map(|round| round_label(round, 3)).collect();
        assert_eq!(labels, ["Round 1", "Semi-Finals", "Final"]);

        let labels: Vec<_> = (1..=5).map(|round| round_label(round, 5)).collect();
        assert_eq!(
            labels,
            ["Round 1", "Round 2", "Quarter-Finals", "Semi-Finals", "Final"]
        );

        assert_eq!(round_label(1, 1), "Final");
        assert_eq!(round_label(1, 2), "Semi-Finals");
        assert_eq!(round_label(0, 1), "Round 0");
    }

    #[test]
    fn test_layout_empty() {
        let layout = LayoutEngine::default().layout(&[]);

        assert!(layout.matches.is_empty());
        assert!(layout.rounds.is_empty());
        assert_eq!(layout.height, 0.0);
    }

    #[test]
    fn test_layout_final_only() {
        let engine = LayoutEngine::new(EntrantKind::Team);
        let dims = engine.dimensions();
        let layout = engine.layout(&bracket(1));

        let m = layout.get(1).unwrap();
        assert_eq!(layout.height, dims.slot_height());
        assert_eq!(m.center_y, layout.height / 2.0);
        assert_eq!(m.top_y, m.center_y - dims.match_height / 2.0);
        assert!(m.connectors.is_empty());
        assert_eq!(layout.labels().collect::<Vec<_>>(), ["Final"]);
    }

    #[test]
    fn test_layout_symmetry() {
        let engine = LayoutEngine::new(EntrantKind::Player);
        let layout = engine.layout(&bracket(2));

        let first = layout.get(1).unwrap().center_y;
        let second = layout.get(2).unwrap().center_y;
        let r#final = layout.get(3).unwrap().center_y;

        assert_eq!(r#final, layout.height / 2.0);
        assert!(first < r#final);
        assert_eq!(r#final - first, second - r#final);
    }

    #[test]
    fn test_layout_positions() {
        let engine = LayoutEngine::new(EntrantKind::Team);
        let dims = engine.dimensions();
        let slot = dims.slot_height();
        let layout = engine.layout(&bracket(3));

        assert_eq!(layout.height, 4.0 * slot);
        assert_eq!(
            layout.labels().collect::<Vec<_>>(),
            ["Round 1", "Semi-Finals", "Final"]
        );

        // The first round of a perfect bracket is evenly spaced.
        let centers: Vec<f64> = (1..=4).map(|id| layout.get(id).unwrap().center_y).collect();
        assert_eq!(
            centers,
            [0.5 * slot, 1.5 * slot, 2.5 * slot, 3.5 * slot]
        );

        let centers: Vec<f64> = (5..=6).map(|id| layout.get(id).unwrap().center_y).collect();
        assert_eq!(centers, [slot, 3.0 * slot]);
        assert_eq!(layout.get(7).unwrap().center_y, 2.0 * slot);

        // Columns move right by one card and one gap per round.
        assert_eq!(layout.get(1).unwrap().x, 0.0);
        assert_eq!(layout.get(5).unwrap().x, dims.match_width + dims.round_gap);
        assert_eq!(
            layout.width,
            3.0 * dims.match_width + 2.0 * dims.round_gap
        );
    }

    #[test]
    fn test_layout_unordered_input() {
        let engine = LayoutEngine::new(EntrantKind::Team);

        let mut matches = bracket(3);
        let ordered = engine.layout(&matches);

        matches.reverse();
        let reversed = engine.layout(&matches);

        for m in &ordered.matches {
            let other = reversed.get(m.id).unwrap();
            assert_eq!(m.center_y, other.center_y);
            assert_eq!(m.top_y, other.top_y);
        }
    }

    #[test]
    fn test_layout_idempotent() {
        let engine = LayoutEngine::new(EntrantKind::Player);
        let matches = bracket(4);

        assert_eq!(engine.layout(&matches), engine.layout(&matches));
    }

    #[test]
    fn test_layout_connectors() {
        let engine = LayoutEngine::new(EntrantKind::Team);
        let dims = engine.dimensions();

        let mut matches = bracket(2);
        matches[0].winner = Some(ParticipantId::from("a"));

        let layout = engine.layout(&matches);
        let top = layout.get(1).unwrap();
        let bottom = layout.get(2).unwrap();

        let right = dims.match_width;
        let mid = right + dims.round_gap / 2.0;

        assert_eq!(top.connectors.len(), 3);
        assert_eq!(top.connectors[0].kind, ConnectorKind::Stub);
        assert_eq!(top.connectors[0].from, Point::new(right, top.center_y));
        assert_eq!(top.connectors[0].to, Point::new(mid, top.center_y));
        assert_eq!(top.connectors[0].state, ConnectorState::Resolved);

        assert_eq!(top.connectors[1].kind, ConnectorKind::Vertical);
        assert_eq!(top.connectors[1].to, Point::new(mid, bottom.center_y));
        // The sibling has no winner yet.
        assert_eq!(top.connectors[1].state, ConnectorState::Pending);

        let r#final = layout.get(3).unwrap();
        assert_eq!(top.connectors[2].kind, ConnectorKind::Join);
        assert_eq!(
            top.connectors[2].to,
            Point::new(r#final.x, r#final.center_y)
        );

        assert_eq!(bottom.connectors.len(), 1);
        assert_eq!(bottom.connectors[0].state, ConnectorState::Pending);
        assert!(r#final.connectors.is_empty());
    }

    #[test]
    fn test_layout_missing_feeder_round() {
        let engine = LayoutEngine::new(EntrantKind::Team);
        let slot = engine.dimensions().slot_height();

        // Round 2 is missing entirely.
        let matches = vec![Match::new(1, 1, 1), Match::new(2, 1, 2), Match::new(3, 3, 1)];
        let layout = engine.layout(&matches);

        assert_eq!(layout.height, 4.0 * slot);
        assert_eq!(layout.get(1).unwrap().center_y, slot);
        assert_eq!(layout.get(2).unwrap().center_y, 3.0 * slot);
        assert_eq!(layout.get(3).unwrap().center_y, 2.0 * slot);

        // Without a match to feed into the pair is not joined.
        for id in [1, 2] {
            let connectors = &layout.get(id).unwrap().connectors;
            assert_eq!(connectors.len(), 1);
            assert_eq!(connectors[0].kind, ConnectorKind::Stub);
        }

        // A round with more matches than the next round can take.
        let matches = vec![
            Match::new(1, 1, 1),
            Match::new(2, 1, 2),
            Match::new(3, 1, 3),
            Match::new(4, 2, 1),
        ];
        let layout = engine.layout(&matches);
        assert_eq!(layout.get(3).unwrap().center_y, layout.height / 3.0 * 2.5);
    }

    #[test]
    fn test_layout_round_zero() {
        let engine = LayoutEngine::new(EntrantKind::Team);
        let dims = engine.dimensions();
        let column = dims.match_width + dims.round_gap;

        let matches = vec![Match::new(1, 0, 1), Match::new(2, 1, 1), Match::new(3, 2, 1)];
        let layout = engine.layout(&matches);

        assert_eq!(layout.get(1).unwrap().x, 0.0);
        assert_eq!(layout.get(2).unwrap().x, column);
        assert_eq!(layout.get(3).unwrap().x, 2.0 * column);
        assert_eq!(layout.width, 3.0 * column - dims.round_gap);

        let columns: Vec<f64> = layout.rounds.iter().map(|r| r.x).collect();
        assert_eq!(columns, [0.0, column, 2.0 * column]);

        // A missing opening round keeps its column.
        let layout = engine.layout(&[Match::new(1, 2, 1)]);
        assert_eq!(layout.get(1).unwrap().x, column);
        assert_eq!(layout.width, 2.0 * column - dims.round_gap);
    }

    #[test]
    fn test_layout_extreme_rounds() {
        let engine = LayoutEngine::new(EntrantKind::Team);

        let matches = vec![Match::new(1, 0, 1), Match::new(2, u32::MAX, 1)];
        let layout = engine.layout(&matches);

        assert_eq!(layout.matches.len(), 2);
        assert!(layout.height.is_finite());
        assert!(layout.matches.iter().all(|m| m.center_y.is_finite()));
    }
}
