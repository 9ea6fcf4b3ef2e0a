//! Run statistics for an exercise session.

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::events::SessionEvent;
use super::session::ExerciseSession;
use crate::error::Result;
use crate::exercise::ExerciseKind;
use crate::landmarks::LandmarkSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSummary {
    pub kind: ExerciseKind,
    pub repetitions: u32,
    pub frames: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ExerciseSummary {
    fn new(kind: ExerciseKind) -> Self {
        Self {
            kind,
            repetitions: 0,
            frames: 0,
            started_at: None,
            completed_at: None,
        }
    }

    /// Time from the first frame of the exercise to its last repetition.
    pub fn duration(&self) -> Option<Duration> {
        Some(self.completed_at? - self.started_at?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub completed: bool,
    pub frames_processed: u64,
    pub frames_without_pose: u64,
    pub exercises: Vec<ExerciseSummary>,
}

impl SessionSummary {
    pub fn total_repetitions(&self) -> u32 {
        self.exercises.iter().map(|e| e.repetitions).sum()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_pretty()?)?;
        info!("Wrote session summary to {}", path.display());
        Ok(())
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.completed { "completed" } else { "stopped early" };
        writeln!(
            f,
            "Session {} - {} frames ({} without a pose)",
            status, self.frames_processed, self.frames_without_pose
        )?;
        for exercise in &self.exercises {
            let duration = exercise
                .duration()
                .map(|d| format!(" in {:.1}s", d.num_milliseconds() as f64 / 1000.0))
                .unwrap_or_default();
            writeln!(
                f,
                "\t{}: {} reps over {} frames{}",
                exercise.kind, exercise.repetitions, exercise.frames, duration
            )?;
        }
        Ok(())
    }
}

/// Drives an `ExerciseSession` and keeps a `SessionSummary` of the run.
pub struct SessionRecorder {
    session: ExerciseSession,
    summary: SessionSummary,
}

impl SessionRecorder {
    pub fn new(session: ExerciseSession) -> Self {
        let summary = SessionSummary {
            started_at: Utc::now(),
            finished_at: None,
            completed: false,
            frames_processed: 0,
            frames_without_pose: 0,
            exercises: session
                .exercises()
                .iter()
                .map(|k| ExerciseSummary::new(*k))
                .collect(),
        };
        Self { session, summary }
    }

    /// Forwards one frame to the session and records it. Frames arriving
    /// after completion are not counted.
    pub fn process(&mut self, snapshot: Option<&LandmarkSnapshot>) -> SessionEvent {
        if self.session.is_complete() {
            return SessionEvent::NoChange;
        }

        let index = self.session.current_index();
        let now = Utc::now();

        self.summary.frames_processed += 1;
        if snapshot.is_none() {
            self.summary.frames_without_pose += 1;
        }

        let exercise = &mut self.summary.exercises[index];
        exercise.frames += 1;
        exercise.started_at.get_or_insert(now);

        let event = self.session.advance(snapshot);
        match event {
            SessionEvent::NoChange => {}
            SessionEvent::CountIncremented(count) => exercise.repetitions = count,
            SessionEvent::ExerciseCompleted(_) | SessionEvent::SessionCompleted => {
                exercise.repetitions = self.session.repetitions_per_exercise();
                exercise.completed_at = Some(now);
                debug!(
                    "SessionRecorder::process {} finished at frame {}",
                    exercise.kind, self.summary.frames_processed
                );
            }
        }

        if event == SessionEvent::SessionCompleted {
            self.summary.completed = true;
            self.summary.finished_at = Some(now);
        }

        event
    }

    pub fn session(&self) -> &ExerciseSession {
        &self.session
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    /// Ends the run, stamping the finish time if the session was cut short.
    pub fn finish(mut self) -> SessionSummary {
        if self.summary.finished_at.is_none() {
            self.summary.finished_at = Some(Utc::now());
        }
        self.summary
    }
}
