//! Per-exercise counting rules.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::exercise::{
    DOWN_THRESHOLD, ExerciseKind, LEFT_TURN_THRESHOLD, RIGHT_TURN_THRESHOLD, SHRUG_THRESHOLD,
    UP_THRESHOLD,
};
use crate::landmarks::{BodyLandmark, LandmarkSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDirection {
    Left,
    Right,
}

impl fmt::Display for TurnDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnDirection::Left => write!(f, "left"),
            TurnDirection::Right => write!(f, "right"),
        }
    }
}

/// The active exercise together with the memory its rule needs between
/// frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseState {
    ArmRaise { arms_up: bool },
    HeadTurn { last_turn: Option<TurnDirection> },
    ShoulderShrug,
}

impl ExerciseState {
    pub fn initial(kind: ExerciseKind) -> Self {
        match kind {
            ExerciseKind::ArmRaise => ExerciseState::ArmRaise { arms_up: false },
            ExerciseKind::HeadTurn => ExerciseState::HeadTurn { last_turn: None },
            ExerciseKind::ShoulderShrug => ExerciseState::ShoulderShrug,
        }
    }

    pub fn kind(&self) -> ExerciseKind {
        match self {
            ExerciseState::ArmRaise { .. } => ExerciseKind::ArmRaise,
            ExerciseState::HeadTurn { .. } => ExerciseKind::HeadTurn,
            ExerciseState::ShoulderShrug => ExerciseKind::ShoulderShrug,
        }
    }

    /// Applies the rule for this exercise to one snapshot. Returns `true`
    /// when a repetition was completed on this frame.
    pub(crate) fn apply(&mut self, snapshot: &LandmarkSnapshot) -> bool {
        match self {
            ExerciseState::ArmRaise { arms_up } => arm_raise(arms_up, snapshot),
            ExerciseState::HeadTurn { last_turn } => head_turn(last_turn, snapshot),
            ExerciseState::ShoulderShrug => shoulder_shrug(snapshot),
        }
    }
}

fn arm_raise(arms_up: &mut bool, snapshot: &LandmarkSnapshot) -> bool {
    let Some((left, right)) = snapshot.pair(BodyLandmark::LeftWrist, BodyLandmark::RightWrist)
    else {
        return false;
    };

    if left.y < UP_THRESHOLD && right.y < UP_THRESHOLD && !*arms_up {
        *arms_up = true;
        debug!("Arms raised");
    }

    if left.y > DOWN_THRESHOLD && right.y > DOWN_THRESHOLD && *arms_up {
        *arms_up = false;
        debug!("Arms lowered");
        return true;
    }

    false
}

fn head_turn(last_turn: &mut Option<TurnDirection>, snapshot: &LandmarkSnapshot) -> bool {
    let Some(nose) = snapshot.get(BodyLandmark::Nose) else {
        return false;
    };

    let turn = if nose.x < LEFT_TURN_THRESHOLD {
        TurnDirection::Left
    } else if nose.x > RIGHT_TURN_THRESHOLD {
        TurnDirection::Right
    } else {
        return false;
    };

    if *last_turn == Some(turn) {
        return false;
    }

    *last_turn = Some(turn);
    debug!("Head turned {}", turn);
    true
}

// Counts on every qualifying frame: a held shrug keeps counting.
fn shoulder_shrug(snapshot: &LandmarkSnapshot) -> bool {
    let Some((left, right)) =
        snapshot.pair(BodyLandmark::LeftShoulder, BodyLandmark::RightShoulder)
    else {
        return false;
    };

    let shrugged = left.y < SHRUG_THRESHOLD && right.y < SHRUG_THRESHOLD;
    if shrugged {
        debug!("Shoulder shrug");
    }
    shrugged
}
