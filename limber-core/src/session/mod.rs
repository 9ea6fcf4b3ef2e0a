//! Session module for counting exercise repetitions.
//!
//! `ExerciseSession` is the per-frame state machine. `SessionRecorder` wraps
//! it and keeps a `SessionSummary` of the run.

mod events;
mod rules;
mod session;
mod summary;

pub use events::SessionEvent;
pub use rules::{ExerciseState, TurnDirection};
pub use session::ExerciseSession;
pub use summary::{ExerciseSummary, SessionRecorder, SessionSummary};
