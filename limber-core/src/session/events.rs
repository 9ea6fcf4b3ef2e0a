use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of feeding one frame to an `ExerciseSession`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    NoChange,
    /// Carries the new repetition count.
    CountIncremented(u32),
    /// Carries the index of the exercise that starts next.
    ExerciseCompleted(usize),
    SessionCompleted,
}

impl SessionEvent {
    pub fn is_no_change(&self) -> bool {
        matches!(self, SessionEvent::NoChange)
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::NoChange => write!(f, "no change"),
            SessionEvent::CountIncremented(count) => write!(f, "count {}", count),
            SessionEvent::ExerciseCompleted(next) => {
                write!(f, "exercise completed, next is #{}", next + 1)
            }
            SessionEvent::SessionCompleted => write!(f, "session completed"),
        }
    }
}
