use log::{debug, info, trace};

use super::events::SessionEvent;
use super::rules::ExerciseState;
use crate::config::SessionConfig;
use crate::error::{LimberError, Result};
use crate::exercise::{DEFAULT_REPETITIONS, ExerciseKind, STANDARD_SEQUENCE};
use crate::landmarks::LandmarkSnapshot;

/// Progress through an ordered list of exercises.
///
/// The repetition count stays within `0..repetitions_per_exercise` between
/// frames: it is reset on the frame that completes an exercise. Once every
/// exercise is done the session is terminal and ignores further frames.
#[derive(Debug, Clone)]
pub struct ExerciseSession {
    exercises: Vec<ExerciseKind>,
    current: usize,
    repetitions_per_exercise: u32,
    count: u32,
    state: Option<ExerciseState>,
}

impl ExerciseSession {
    pub fn new(exercises: Vec<ExerciseKind>, repetitions_per_exercise: u32) -> Result<Self> {
        if repetitions_per_exercise == 0 {
            return Err(LimberError::invalid_config(
                "repetitions per exercise must be at least 1",
            ));
        }
        let Some(&first) = exercises.first() else {
            return Err(LimberError::invalid_config("exercise list is empty"));
        };

        debug!(
            "ExerciseSession::new {} exercises, {} repetitions each",
            exercises.len(),
            repetitions_per_exercise
        );

        Ok(Self {
            exercises,
            current: 0,
            repetitions_per_exercise,
            count: 0,
            state: Some(ExerciseState::initial(first)),
        })
    }

    /// The standard three-exercise routine with ten repetitions each.
    pub fn standard() -> Self {
        Self {
            exercises: STANDARD_SEQUENCE.to_vec(),
            current: 0,
            repetitions_per_exercise: DEFAULT_REPETITIONS,
            count: 0,
            state: Some(ExerciseState::initial(STANDARD_SEQUENCE[0])),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        Self::new(config.exercises.clone(), config.repetitions_per_exercise)
    }

    /// Feeds one frame to the active exercise's rule.
    ///
    /// `None` means no pose was detected. Neither that nor a snapshot missing
    /// the landmarks the rule reads changes anything.
    pub fn advance(&mut self, snapshot: Option<&LandmarkSnapshot>) -> SessionEvent {
        let Some(state) = self.state.as_mut() else {
            trace!("advance called on a completed session");
            return SessionEvent::NoChange;
        };
        let Some(snapshot) = snapshot else {
            return SessionEvent::NoChange;
        };

        if !state.apply(snapshot) {
            return SessionEvent::NoChange;
        }

        let kind = state.kind();
        self.count += 1;
        info!("{} count: {}", kind, self.count);

        if self.count < self.repetitions_per_exercise {
            return SessionEvent::CountIncremented(self.count);
        }

        self.count = 0;
        self.current += 1;
        match self.exercises.get(self.current) {
            Some(&next) => {
                self.state = Some(ExerciseState::initial(next));
                info!("{} complete, next up: {}", kind, next);
                SessionEvent::ExerciseCompleted(self.current)
            }
            None => {
                self.state = None;
                info!("{} complete, session finished", kind);
                SessionEvent::SessionCompleted
            }
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The active exercise, or `None` once the session is complete.
    pub fn current_exercise(&self) -> Option<ExerciseKind> {
        self.state.map(|s| s.kind())
    }

    pub fn display_name(&self) -> Option<&'static str> {
        self.current_exercise().map(|k| k.display_name())
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn repetitions_per_exercise(&self) -> u32 {
        self.repetitions_per_exercise
    }

    pub fn total_exercises(&self) -> usize {
        self.exercises.len()
    }

    pub fn exercises(&self) -> &[ExerciseKind] {
        &self.exercises
    }

    pub fn sub_state(&self) -> Option<&ExerciseState> {
        self.state.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.exercises.len()
    }
}

impl Default for ExerciseSession {
    fn default() -> Self {
        Self::standard()
    }
}
