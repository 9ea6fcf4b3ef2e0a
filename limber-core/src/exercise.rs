use serde::{Deserialize, Serialize};
use std::fmt;

use crate::landmarks::BodyLandmark;

/// Both wrists above this height count as arms raised.
pub const UP_THRESHOLD: f32 = 0.4;
/// Both wrists below this height count as arms lowered.
pub const DOWN_THRESHOLD: f32 = 0.8;
/// Nose left of this position counts as a left turn.
pub const LEFT_TURN_THRESHOLD: f32 = 0.4;
/// Nose right of this position counts as a right turn.
pub const RIGHT_TURN_THRESHOLD: f32 = 0.6;
/// Both shoulders above this height count as a shrug.
pub const SHRUG_THRESHOLD: f32 = 0.3;

pub const DEFAULT_REPETITIONS: u32 = 10;

/// Arm Raise → Head Turn → Shoulder Shrugs.
pub const STANDARD_SEQUENCE: [ExerciseKind; 3] = [
    ExerciseKind::ArmRaise,
    ExerciseKind::HeadTurn,
    ExerciseKind::ShoulderShrug,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    ArmRaise,
    HeadTurn,
    ShoulderShrug,
}

impl ExerciseKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ExerciseKind::ArmRaise => "Arm Raise",
            ExerciseKind::HeadTurn => "Head Turn",
            ExerciseKind::ShoulderShrug => "Shoulder Shrugs",
        }
    }

    /// Landmarks the counting rule reads.
    pub fn landmarks(&self) -> &'static [BodyLandmark] {
        match self {
            ExerciseKind::ArmRaise => &[BodyLandmark::LeftWrist, BodyLandmark::RightWrist],
            ExerciseKind::HeadTurn => &[BodyLandmark::Nose],
            ExerciseKind::ShoulderShrug => {
                &[BodyLandmark::LeftShoulder, BodyLandmark::RightShoulder]
            }
        }
    }

    /// One-line description of the counting rule.
    pub fn rule(&self) -> String {
        match self {
            ExerciseKind::ArmRaise => format!(
                "both wrists y < {} then both wrists y > {}",
                UP_THRESHOLD, DOWN_THRESHOLD
            ),
            ExerciseKind::HeadTurn => format!(
                "nose x < {} or nose x > {}, alternating",
                LEFT_TURN_THRESHOLD, RIGHT_TURN_THRESHOLD
            ),
            ExerciseKind::ShoulderShrug => format!(
                "both shoulders y < {}, every frame held",
                SHRUG_THRESHOLD
            ),
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
