//! # Seed Arrangement
//!
//! Pure passes that reorder a list of [`Participant`]s according to a single goal. Each pass
//! takes the output of the previous pass as its input, the order in which passes are applied is
//! decided by the caller.
use crate::Participant;

/// The win rate assumed for participants without stats, treating them as average.
pub const DEFAULT_WIN_RATE: f64 = 50.0;

/// Moves one representative of every team to the front of the list.
///
/// Teams are visited in the order they are first encountered. All participants that were not
/// picked as a representative, including participants without a team, follow in their original
/// relative order.
pub fn separate_teams(participants: &[Participant]) -> Vec<&Participant> {
    let mut teams: Vec<&str> = Vec::new();
    let mut front = Vec::new();
    let mut rest = Vec::new();

    for participant in participants {
        match participant.team_id.as_deref() {
            Some(team) if !teams.contains(&team) => {
                teams.push(team);
                front.push(participant);
            }
            _ => rest.push(participant),
        }
    }

    log::debug!(
        "Separated {} teams from {} participants",
        teams.len(),
        participants.len()
    );

    front.extend(rest);
    front
}

/// Sorts the participants by win rate and redistributes them in a snake draft.
///
/// The strongest remaining participant is followed by the weakest remaining one, alternating
/// until all participants are placed. Adjacent positions therefore pair high against low rated
/// participants. Participants without stats are treated as [`DEFAULT_WIN_RATE`].
pub fn balance_skill<T>(participants: &[T]) -> Vec<T>
where
    T: AsRef<Participant> + Clone,
{
    let mut sorted = participants.to_vec();
    // Stable sort keeps equally rated participants in their input order.
    sorted.sort_by(|a, b| win_rate(b.as_ref()).total_cmp(&win_rate(a.as_ref())));

    let mut output = Vec::with_capacity(sorted.len());
    let mut sorted = sorted.into_iter();

    loop {
        match sorted.next() {
            Some(strongest) => output.push(strongest),
            None => break,
        }

        match sorted.next_back() {
            Some(weakest) => output.push(weakest),
            None => break,
        }
    }

    output
}

#[inline]
fn win_rate(participant: &Participant) -> f64 {
    participant.win_rate().unwrap_or(DEFAULT_WIN_RATE)
}

impl AsRef<Participant> for Participant {
    #[inline]
    fn as_ref(&self) -> &Participant {
        self
    }
}
