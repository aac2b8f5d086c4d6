use std::fmt::Write;

use fixture_core::{Goals, OptimizationRequest, Participant};

/// Renders the natural language prompt describing `request`.
pub fn render(request: &OptimizationRequest) -> String {
    let mut prompt = String::new();

    // Writing into a `String` never fails.
    let _ = writeln!(
        prompt,
        "Arrange the participants of a {} tournament into an optimal seeding order.",
        request.format
    );

    prompt.push_str("\nParticipants:\n");
    for participant in &request.participants {
        let _ = writeln!(prompt, "{}", participant_line(participant));
    }

    prompt.push_str("\nOptimization goals:\n");
    let goals = goal_lines(&request.goals);
    if goals.is_empty() {
        prompt.push_str("- None, keep a sensible default order\n");
    }
    for goal in goals {
        let _ = writeln!(prompt, "- {}", goal);
    }

    let constraints = &request.constraints;
    if !constraints.is_empty() {
        prompt.push_str("\nConstraints:\n");
        if let Some(max) = constraints.max_matches_per_day {
            let _ = writeln!(prompt, "- At most {} matches per participant per day", max);
        }
        if let Some(rest) = constraints.min_rest_between_matches {
            let _ = writeln!(prompt, "- At least {} minutes of rest between matches", rest);
        }
    }

    prompt.push_str(
        "\nRespond with a JSON object of the form \
        {\"order\": [\"<participant id>\", ...], \"reasoning\": \"<explanation>\", \
        \"suggestions\": [\"<suggestion>\", ...]}. \
        The order must contain every participant id exactly once.",
    );

    prompt
}

fn participant_line(participant: &Participant) -> String {
    let team = participant
        .team_name
        .as_deref()
        .or(participant.team_id.as_deref())
        .unwrap_or("None");
    let win_rate = match participant.win_rate() {
        Some(rate) => format!("{:.1}%", rate),
        None => "Unknown".to_owned(),
    };

    format!(
        "- {} (id: {}, team: {}, win rate: {})",
        participant.name, participant.id, team, win_rate
    )
}

fn goal_lines(goals: &Goals) -> Vec<&'static str> {
    let mut lines = Vec::new();

    if goals.balance_skill_levels {
        lines.push("Balance skill levels so strong participants face weaker ones early");
    }
    if goals.avoid_same_team_first_round {
        lines.push("Avoid participants of the same team meeting in the first round");
    }
    if goals.prioritize_competitive_matches {
        lines.push("Prioritize competitive matches between evenly rated participants");
    }
    if goals.fair_scheduling {
        lines.push("Schedule matches fairly so no participant is overloaded");
    }

    lines
}
