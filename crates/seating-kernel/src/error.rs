//! Errors surfaced by the engine.

use crate::model::RoomId;

/// Failures that stop the engine before it produces an arrangement.
///
/// Residual desk conflicts are not errors; they come back on an `Ok`
/// [`crate::SeatingOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeatingError {
    #[error("no people to seat")]
    EmptyRoster,
    #[error("no classrooms defined")]
    NoRooms,
    #[error(
        "not enough seats: {people} people but only {seats} seats (short by {})",
        .people - .seats
    )]
    InsufficientCapacity { people: usize, seats: usize },
    #[error("unknown room: {0}")]
    UnknownRoom(RoomId),
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
    #[error("cancelled by observer")]
    Cancelled,
}

impl SeatingError {
    /// True for the missing-input failures (no people, no rooms).
    pub fn is_precondition(&self) -> bool {
        matches!(self, SeatingError::EmptyRoster | SeatingError::NoRooms)
    }

    /// Seats missing for a capacity failure.
    pub fn deficit(&self) -> Option<usize> {
        match self {
            SeatingError::InsufficientCapacity { people, seats } => {
                Some(people.saturating_sub(*seats))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message_reports_deficit() {
        let err = SeatingError::InsufficientCapacity {
            people: 10,
            seats: 8,
        };
        assert_eq!(err.deficit(), Some(2));
        assert_eq!(
            err.to_string(),
            "not enough seats: 10 people but only 8 seats (short by 2)"
        );
        assert!(!err.is_precondition());
    }

    #[test]
    fn test_precondition_classification() {
        assert!(SeatingError::EmptyRoster.is_precondition());
        assert!(SeatingError::NoRooms.is_precondition());
        assert!(!SeatingError::Cancelled.is_precondition());
        assert_eq!(SeatingError::NoRooms.deficit(), None);
    }
}
