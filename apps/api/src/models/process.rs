use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Stage of a selection process. Stored as snake_case text.
///
/// `Hired` and `Rejected` are terminal: once a process lands there it
/// cannot move again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Received,
    Screening,
    Interview,
    Offer,
    Hired,
    Rejected,
}

impl Stage {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "received" => Some(Stage::Received),
            "screening" => Some(Stage::Screening),
            "interview" => Some(Stage::Interview),
            "offer" => Some(Stage::Offer),
            "hired" => Some(Stage::Hired),
            "rejected" => Some(Stage::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::Screening => "screening",
            Stage::Interview => "interview",
            Stage::Offer => "offer",
            Stage::Hired => "hired",
            Stage::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Hired | Stage::Rejected)
    }

    /// Whether a process at this stage may move to `next`. Non-terminal
    /// stages move freely; a terminal stage only accepts a same-stage
    /// no-op.
    pub fn can_transition_to(self, next: Stage) -> bool {
        !self.is_terminal() || next == self
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SelectionProcessRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub position: String,
    pub stage: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_stages() {
        assert_eq!(Stage::parse("received"), Some(Stage::Received));
        assert_eq!(Stage::parse("hired"), Some(Stage::Hired));
        assert_eq!(Stage::parse("on_hold"), None);
    }

    #[test]
    fn test_round_trip_as_str() {
        for stage in [
            Stage::Received,
            Stage::Screening,
            Stage::Interview,
            Stage::Offer,
            Stage::Hired,
            Stage::Rejected,
        ] {
            assert_eq!(Stage::parse(stage.as_str()), Some(stage));
        }
    }

    #[test]
    fn test_terminal_stages() {
        assert!(Stage::Hired.is_terminal());
        assert!(Stage::Rejected.is_terminal());
        assert!(!Stage::Offer.is_terminal());
        assert!(!Stage::Received.is_terminal());
    }

    #[test]
    fn test_non_terminal_stages_move_freely() {
        assert!(Stage::Received.can_transition_to(Stage::Screening));
        assert!(Stage::Screening.can_transition_to(Stage::Rejected));
        assert!(Stage::Interview.can_transition_to(Stage::Received));
        assert!(Stage::Offer.can_transition_to(Stage::Hired));
    }

    #[test]
    fn test_terminal_stages_cannot_be_left() {
        for terminal in [Stage::Hired, Stage::Rejected] {
            for next in [
                Stage::Received,
                Stage::Screening,
                Stage::Interview,
                Stage::Offer,
            ] {
                assert!(
                    !terminal.can_transition_to(next),
                    "{} -> {} should be rejected",
                    terminal.as_str(),
                    next.as_str()
                );
            }
        }
        assert!(!Stage::Hired.can_transition_to(Stage::Rejected));
        assert!(!Stage::Rejected.can_transition_to(Stage::Hired));
    }

    #[test]
    fn test_terminal_same_stage_is_a_noop() {
        assert!(Stage::Hired.can_transition_to(Stage::Hired));
        assert!(Stage::Rejected.can_transition_to(Stage::Rejected));
    }
}
