use crate::seeding::{balance_skill, separate_teams};
use crate::{Format, OptimizationRequest, OptimizationResult, Participant, StrategyKind};

/// Confidence scores reported by each strategy.
///
/// The scores are fixed per strategy and express how much the strategy is trusted, they are
/// not measured from the produced order.
pub mod confidence {
    pub const OPENAI: u8 = 85;
    pub const ANTHROPIC: u8 = 80;
    pub const LOCAL: u8 = 70;
    /// A provider replied, but the reply could not be used to reorder the participants.
    pub const PARSE_FALLBACK: u8 = 50;
}

const REASONING: &str = "Applied rule-based seeding: teammates are spread across the first \
    round and participants are paired strong against weak where requested.";

const SUGGESTIONS: [&str; 3] = [
    "Review the seeding manually before publishing the fixture.",
    "Add win/loss statistics to participants to improve skill balancing.",
    "Configure an external provider for more detailed optimization.",
];

/// The deterministic seeding strategy.
///
/// `LocalStrategy` applies the goals of a request as a fixed pipeline:
/// 1. `avoid_same_team_first_round` (knockout only): [`separate_teams`]
/// 2. `balance_skill_levels`: [`balance_skill`]
///
/// When both goals are set the skill balancing fully replaces the team separation.
#[derive(Copy, Clone, Debug, Default)]
pub struct LocalStrategy;

impl LocalStrategy {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Arranges the participants of `request`. This never fails.
    pub fn optimize(&self, request: &OptimizationRequest) -> OptimizationResult {
        let goals = &request.goals;

        let mut order: Vec<&Participant> = request.participants.iter().collect();

        if order.len() > 1 {
            if goals.avoid_same_team_first_round && request.format == Format::Knockout {
                order = separate_teams(&request.participants);
            }

            if goals.balance_skill_levels {
                order = balance_skill(&order);
            }
        }

        log::debug!("Local strategy arranged {} participants", order.len());

        OptimizationResult {
            order: order.into_iter().map(|p| p.id.clone()).collect(),
            reasoning: REASONING.to_owned(),
            confidence: confidence::LOCAL,
            suggestions: SUGGESTIONS.iter().map(|s| (*s).to_owned()).collect(),
            strategy: StrategyKind::Local,
            fallback: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{confidence, LocalStrategy};
    use crate::{
        validate_order, Format, Goals, OptimizationRequest, Participant, ParticipantId, Stats,
        StrategyKind,
    };

    fn request(participants: Vec<Participant>, goals: Goals) -> OptimizationRequest {
        OptimizationRequest {
            participants,
            goals,
            ..Default::default()
        }
    }

    fn participant(id: &str, team: Option<&str>, win_rate: f64) -> Participant {
        Participant {
            team_id: team.map(str::to_owned),
            stats: Some(Stats {
                wins: 0,
                losses: 0,
                win_rate,
            }),
            ..Participant::new(id, id)
        }
    }

    fn order(ids: &[&str]) -> Vec<ParticipantId> {
        ids.iter().map(|id| ParticipantId::from(*id)).collect()
    }

    const BOTH: Goals = Goals {
        balance_skill_levels: true,
        avoid_same_team_first_round: true,
        prioritize_competitive_matches: false,
        fair_scheduling: false,
    };

    #[test]
    fn test_local_strategy_empty() {
        let result = LocalStrategy::new().optimize(&request(vec![], BOTH));

        assert!(result.order.is_empty());
        assert_eq!(result.confidence, confidence::LOCAL);
        assert_eq!(result.strategy, StrategyKind::Local);
        assert!(!result.fallback);
        assert!(!result.suggestions.is_empty());
    }

    #[test]
    fn test_local_strategy_single() {
        let result =
            LocalStrategy::new().optimize(&request(vec![participant("a", Some("t"), 10.0)], BOTH));

        assert_eq!(result.order, order(&["a"]));
    }

    #[test]
    fn test_local_strategy_identity() {
        let participants = vec![
            participant("a", Some("t1"), 10.0),
            participant("b", Some("t1"), 90.0),
            participant("c", None, 50.0),
        ];

        let result = LocalStrategy::new().optimize(&request(participants, Goals::default()));
        assert_eq!(result.order, order(&["a", "b", "c"]));
    }

    #[test]
    fn test_local_strategy_team_separation() {
        let participants = vec![
            participant("a", Some("team1"), 50.0),
            participant("b", Some("team1"), 50.0),
            participant("c", Some("team2"), 50.0),
            participant("d", None, 50.0),
        ];
        let goals = Goals {
            avoid_same_team_first_round: true,
            ..Default::default()
        };

        let req = request(participants, goals);
        let result = LocalStrategy::new().optimize(&req);

        assert_eq!(result.order, order(&["a", "c", "b", "d"]));
        assert_eq!(validate_order(&req.participants, &result.order), Ok(()));

        let team = |id: &ParticipantId| {
            req.participants
                .iter()
                .find(|p| p.id == *id)
                .and_then(|p| p.team_id.clone())
        };
        assert_ne!(team(&result.order[0]), team(&result.order[1]));

        // Team separation only applies to knockout draws.
        let req = OptimizationRequest {
            format: Format::RoundRobin,
            ..req
        };
        let result = LocalStrategy::new().optimize(&req);
        assert_eq!(result.order, order(&["a", "b", "c", "d"]));
    }

    #[test]
    fn test_local_strategy_skill_balance() {
        let participants = vec![
            participant("p90", None, 90.0),
            participant("p80", None, 80.0),
            participant("p70", None, 70.0),
            participant("p60", None, 60.0),
            participant("p50", None, 50.0),
        ];
        let goals = Goals {
            balance_skill_levels: true,
            ..Default::default()
        };

        let result = LocalStrategy::new().optimize(&request(participants, goals));
        assert_eq!(result.order, order(&["p90", "p50", "p80", "p60", "p70"]));
    }

    #[test]
    fn test_local_strategy_skill_balance_overrides_team_separation() {
        let participants = vec![
            participant("a", Some("team1"), 90.0),
            participant("b", Some("team1"), 10.0),
            participant("c", Some("team2"), 80.0),
            participant("d", Some("team2"), 20.0),
        ];

        let result = LocalStrategy::new().optimize(&request(participants, BOTH));
        // Same output as skill balancing alone.
        assert_eq!(result.order, order(&["a", "b", "c", "d"]));
    }
}
