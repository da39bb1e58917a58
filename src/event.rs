//! Sporting events and their recorded outcome.

use crate::comparator::Score;
use crate::types::EventId;

/// Score state of an event. Settlement only runs once `finalized` is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventOutcome {
    pub score: Score,
    pub finalized: bool,
}

impl EventOutcome {
    pub fn final_score(home: u32, away: u32) -> Self {
        Self {
            score: Score::new(home, away),
            finalized: true,
        }
    }
}

/// An event wagers are placed on.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub id: EventId,
    pub home_team: String,
    pub away_team: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub outcome: EventOutcome,
}

impl Event {
    pub fn new(id: EventId, home_team: impl Into<String>, away_team: impl Into<String>) -> Self {
        Self {
            id,
            home_team: home_team.into(),
            away_team: away_team.into(),
            outcome: EventOutcome::default(),
        }
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.outcome.finalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_event_is_not_final() {
        let event = Event::new(EventId(1), "Lions", "Bears");
        assert!(!event.is_final());
        assert_eq!(event.outcome.score, Score::new(0, 0));
    }

    #[test]
    fn final_score() {
        let outcome = EventOutcome::final_score(3, 1);
        assert!(outcome.finalized);
        assert_eq!(outcome.score.to_string(), "3-1");
    }
}
