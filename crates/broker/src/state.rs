//! Adventure process state machine.

use serde::{Deserialize, Serialize};

/// One step of the adventure booking saga, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    /// Charge the client's account through the bank.
    Payment,
    /// Reserve a hotel room for the adventure dates.
    Room,
    /// Reserve the activity for all participants.
    Activity,
}

impl Step {
    /// All steps in the order the coordinator runs them.
    pub const ALL: [Step; 3] = [Step::Payment, Step::Room, Step::Activity];

    /// Returns the step name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Payment => "payment",
            Step::Room => "room",
            Step::Activity => "activity",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The state of an adventure's booking process.
///
/// State transitions:
/// ```text
/// NotStarted ──► PaymentPending ──► PaymentDone ──► RoomPending ──► RoomDone
///                      │                                 │              │
///                      ▼                                 ▼              ▼
///               Failed(Payment)                    Failed(Room)   ActivityPending ──► ActivityDone
///                                                                       │
///                                                                       ▼
///                                                                Failed(Activity)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AdventureState {
    /// The process has not been started.
    #[default]
    NotStarted,

    /// The bank call is in flight.
    PaymentPending,

    /// Payment confirmed, room not yet requested.
    PaymentDone,

    /// The hotel call is in flight.
    RoomPending,

    /// Room confirmed, activity not yet requested.
    RoomDone,

    /// The activity call is in flight.
    ActivityPending,

    /// Every step succeeded (terminal state).
    ActivityDone,

    /// The given step failed; later steps never ran (terminal state).
    Failed(Step),
}

impl AdventureState {
    /// Returns true if the given step may be started from this state.
    pub fn can_start(&self, step: Step) -> bool {
        matches!(
            (self, step),
            (AdventureState::NotStarted, Step::Payment)
                | (AdventureState::PaymentDone, Step::Room)
                | (AdventureState::RoomDone, Step::Activity)
        )
    }

    /// Returns the step currently awaiting a remote answer, if any.
    pub fn pending_step(&self) -> Option<Step> {
        match self {
            AdventureState::PaymentPending => Some(Step::Payment),
            AdventureState::RoomPending => Some(Step::Room),
            AdventureState::ActivityPending => Some(Step::Activity),
            _ => None,
        }
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AdventureState::ActivityDone | AdventureState::Failed(_)
        )
    }

    /// Returns the state reached once `step` has been started.
    pub(crate) fn pending(step: Step) -> Self {
        match step {
            Step::Payment => AdventureState::PaymentPending,
            Step::Room => AdventureState::RoomPending,
            Step::Activity => AdventureState::ActivityPending,
        }
    }

    /// Returns the state reached once `step` has completed.
    pub(crate) fn done(step: Step) -> Self {
        match step {
            Step::Payment => AdventureState::PaymentDone,
            Step::Room => AdventureState::RoomDone,
            Step::Activity => AdventureState::ActivityDone,
        }
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdventureState::NotStarted => "NotStarted",
            AdventureState::PaymentPending => "PaymentPending",
            AdventureState::PaymentDone => "PaymentDone",
            AdventureState::RoomPending => "RoomPending",
            AdventureState::RoomDone => "RoomDone",
            AdventureState::ActivityPending => "ActivityPending",
            AdventureState::ActivityDone => "ActivityDone",
            AdventureState::Failed(_) => "Failed",
        }
    }
}

impl std::fmt::Display for AdventureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdventureState::Failed(step) => write!(f, "Failed({step})"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_not_started() {
        assert_eq!(AdventureState::default(), AdventureState::NotStarted);
    }

    #[test]
    fn test_steps_start_only_in_order() {
        assert!(AdventureState::NotStarted.can_start(Step::Payment));
        assert!(!AdventureState::NotStarted.can_start(Step::Room));
        assert!(!AdventureState::NotStarted.can_start(Step::Activity));

        assert!(AdventureState::PaymentDone.can_start(Step::Room));
        assert!(!AdventureState::PaymentDone.can_start(Step::Payment));
        assert!(!AdventureState::PaymentPending.can_start(Step::Room));

        assert!(AdventureState::RoomDone.can_start(Step::Activity));
        assert!(!AdventureState::ActivityDone.can_start(Step::Payment));
        assert!(!AdventureState::Failed(Step::Payment).can_start(Step::Room));
    }

    #[test]
    fn test_pending_step() {
        assert_eq!(AdventureState::NotStarted.pending_step(), None);
        assert_eq!(
            AdventureState::PaymentPending.pending_step(),
            Some(Step::Payment)
        );
        assert_eq!(AdventureState::RoomPending.pending_step(), Some(Step::Room));
        assert_eq!(
            AdventureState::ActivityPending.pending_step(),
            Some(Step::Activity)
        );
        assert_eq!(AdventureState::RoomDone.pending_step(), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!AdventureState::NotStarted.is_terminal());
        assert!(!AdventureState::RoomDone.is_terminal());
        assert!(!AdventureState::ActivityPending.is_terminal());
        assert!(AdventureState::ActivityDone.is_terminal());
        for step in Step::ALL {
            assert!(AdventureState::Failed(step).is_terminal());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(AdventureState::NotStarted.to_string(), "NotStarted");
        assert_eq!(AdventureState::RoomPending.to_string(), "RoomPending");
        assert_eq!(
            AdventureState::Failed(Step::Room).to_string(),
            "Failed(room)"
        );
        assert_eq!(Step::Activity.to_string(), "activity");
    }

    #[test]
    fn test_serialization() {
        let state = AdventureState::Failed(Step::Activity);
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: AdventureState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
