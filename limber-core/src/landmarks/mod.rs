//! Body landmarks as reported by a pose-estimation pass.
//!
//! Coordinates are normalized to the frame: `x` grows to the right and `y`
//! grows downward, both in `[0, 1]`. Landmark identifiers follow the
//! 33-point MediaPipe Pose layout so that index-ordered output from such a
//! model can be used directly.

mod frame;

pub use frame::{FrameDecoder, FrameReader, parse_frame};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// MediaPipe Pose landmark indices (33 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    pub const COUNT: usize = 33;

    /// Every landmark, in model index order.
    pub const ALL: [BodyLandmark; Self::COUNT] = [
        BodyLandmark::Nose,
        BodyLandmark::LeftEyeInner,
        BodyLandmark::LeftEye,
        BodyLandmark::LeftEyeOuter,
        BodyLandmark::RightEyeInner,
        BodyLandmark::RightEye,
        BodyLandmark::RightEyeOuter,
        BodyLandmark::LeftEar,
        BodyLandmark::RightEar,
        BodyLandmark::MouthLeft,
        BodyLandmark::MouthRight,
        BodyLandmark::LeftShoulder,
        BodyLandmark::RightShoulder,
        BodyLandmark::LeftElbow,
        BodyLandmark::RightElbow,
        BodyLandmark::LeftWrist,
        BodyLandmark::RightWrist,
        BodyLandmark::LeftPinky,
        BodyLandmark::RightPinky,
        BodyLandmark::LeftIndex,
        BodyLandmark::RightIndex,
        BodyLandmark::LeftThumb,
        BodyLandmark::RightThumb,
        BodyLandmark::LeftHip,
        BodyLandmark::RightHip,
        BodyLandmark::LeftKnee,
        BodyLandmark::RightKnee,
        BodyLandmark::LeftAnkle,
        BodyLandmark::RightAnkle,
        BodyLandmark::LeftHeel,
        BodyLandmark::RightHeel,
        BodyLandmark::LeftFootIndex,
        BodyLandmark::RightFootIndex,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyLandmark::Nose => "nose",
            BodyLandmark::LeftEyeInner => "left_eye_inner",
            BodyLandmark::LeftEye => "left_eye",
            BodyLandmark::LeftEyeOuter => "left_eye_outer",
            BodyLandmark::RightEyeInner => "right_eye_inner",
            BodyLandmark::RightEye => "right_eye",
            BodyLandmark::RightEyeOuter => "right_eye_outer",
            BodyLandmark::LeftEar => "left_ear",
            BodyLandmark::RightEar => "right_ear",
            BodyLandmark::MouthLeft => "mouth_left",
            BodyLandmark::MouthRight => "mouth_right",
            BodyLandmark::LeftShoulder => "left_shoulder",
            BodyLandmark::RightShoulder => "right_shoulder",
            BodyLandmark::LeftElbow => "left_elbow",
            BodyLandmark::RightElbow => "right_elbow",
            BodyLandmark::LeftWrist => "left_wrist",
            BodyLandmark::RightWrist => "right_wrist",
            BodyLandmark::LeftPinky => "left_pinky",
            BodyLandmark::RightPinky => "right_pinky",
            BodyLandmark::LeftIndex => "left_index",
            BodyLandmark::RightIndex => "right_index",
            BodyLandmark::LeftThumb => "left_thumb",
            BodyLandmark::RightThumb => "right_thumb",
            BodyLandmark::LeftHip => "left_hip",
            BodyLandmark::RightHip => "right_hip",
            BodyLandmark::LeftKnee => "left_knee",
            BodyLandmark::RightKnee => "right_knee",
            BodyLandmark::LeftAnkle => "left_ankle",
            BodyLandmark::RightAnkle => "right_ankle",
            BodyLandmark::LeftHeel => "left_heel",
            BodyLandmark::RightHeel => "right_heel",
            BodyLandmark::LeftFootIndex => "left_foot_index",
            BodyLandmark::RightFootIndex => "right_foot_index",
        }
    }
}

impl std::fmt::Display for BodyLandmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized 2D landmark position. Depth and visibility are not used for
/// counting and are dropped on input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The landmarks detected in one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSnapshot {
    points: BTreeMap<BodyLandmark, Landmark>,
}

impl LandmarkSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy when assembling a snapshot by hand.
    pub fn with(mut self, landmark: BodyLandmark, x: f32, y: f32) -> Self {
        self.points.insert(landmark, Landmark::new(x, y));
        self
    }

    /// Builds a snapshot from points in model index order. Points past the
    /// last known landmark are ignored.
    pub fn from_indexed<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Landmark>,
    {
        points
            .into_iter()
            .enumerate()
            .filter_map(|(idx, point)| BodyLandmark::from_index(idx).map(|lm| (lm, point)))
            .collect()
    }

    pub fn insert(&mut self, landmark: BodyLandmark, point: Landmark) -> Option<Landmark> {
        self.points.insert(landmark, point)
    }

    pub fn get(&self, landmark: BodyLandmark) -> Option<Landmark> {
        self.points.get(&landmark).copied()
    }

    /// Looks up two landmarks at once; `None` unless both are present.
    pub fn pair(&self, a: BodyLandmark, b: BodyLandmark) -> Option<(Landmark, Landmark)> {
        Some((self.get(a)?, self.get(b)?))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyLandmark, Landmark)> + '_ {
        self.points.iter().map(|(lm, p)| (*lm, *p))
    }
}

impl FromIterator<(BodyLandmark, Landmark)> for LandmarkSnapshot {
    fn from_iter<T: IntoIterator<Item = (BodyLandmark, Landmark)>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_match_model_layout() {
        assert_eq!(BodyLandmark::Nose.index(), 0);
        assert_eq!(BodyLandmark::LeftShoulder.index(), 11);
        assert_eq!(BodyLandmark::RightShoulder.index(), 12);
        assert_eq!(BodyLandmark::LeftWrist.index(), 15);
        assert_eq!(BodyLandmark::RightWrist.index(), 16);
        for (idx, lm) in BodyLandmark::ALL.iter().enumerate() {
            assert_eq!(lm.index(), idx);
            assert_eq!(BodyLandmark::from_index(idx), Some(*lm));
        }
        assert_eq!(BodyLandmark::from_index(BodyLandmark::COUNT), None);
    }

    #[test]
    fn names_match_serde_names() {
        for lm in BodyLandmark::ALL {
            let json = serde_json::to_string(&lm).unwrap();
            assert_eq!(json, format!("\"{}\"", lm.as_str()));
        }
    }

    #[test]
    fn from_indexed_drops_extra_points() {
        let mut points = vec![Landmark::new(0.5, 0.5); BodyLandmark::COUNT];
        points[15] = Landmark::new(0.1, 0.2);
        points.push(Landmark::new(0.9, 0.9));

        let snapshot = LandmarkSnapshot::from_indexed(points);
        assert_eq!(snapshot.len(), BodyLandmark::COUNT);
        assert_eq!(
            snapshot.get(BodyLandmark::LeftWrist),
            Some(Landmark::new(0.1, 0.2))
        );
    }

    #[test]
    fn insert_replaces_and_iterates_in_index_order() {
        let mut snapshot = LandmarkSnapshot::new();
        assert!(snapshot.is_empty());

        snapshot.insert(BodyLandmark::RightWrist, Landmark::new(0.7, 0.5));
        snapshot.insert(BodyLandmark::Nose, Landmark::new(0.5, 0.1));
        let old = snapshot.insert(BodyLandmark::Nose, Landmark::new(0.2, 0.1));
        assert_eq!(old, Some(Landmark::new(0.5, 0.1)));

        let order: Vec<BodyLandmark> = snapshot.iter().map(|(lm, _)| lm).collect();
        assert_eq!(order, vec![BodyLandmark::Nose, BodyLandmark::RightWrist]);
    }

    #[test]
    fn pair_requires_both_points() {
        let snapshot = LandmarkSnapshot::new().with(BodyLandmark::LeftWrist, 0.3, 0.3);
        assert!(
            snapshot
                .pair(BodyLandmark::LeftWrist, BodyLandmark::RightWrist)
                .is_none()
        );

        let snapshot = snapshot.with(BodyLandmark::RightWrist, 0.7, 0.3);
        let (left, right) = snapshot
            .pair(BodyLandmark::LeftWrist, BodyLandmark::RightWrist)
            .unwrap();
        assert_eq!(left.x, 0.3);
        assert_eq!(right.x, 0.7);
    }
}
