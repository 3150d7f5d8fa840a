use crate::{error::Error, point::Point};
use ordered_float::NotNan;
use std::{fmt, iter::FromIterator, str::FromStr};

/// Anatomical landmarks reported by a body pose detector.
///
/// The first seventeen variants follow the PoseNet/COCO keypoint order, so a
/// PoseNet keypoint index converts directly with `Joint::from_usize`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, num_derive::FromPrimitive)]
pub enum Joint {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    Neck,
    Root,
}

pub const NUM_JOINTS: usize = 19;

impl Joint {
    pub const ALL: [Joint; NUM_JOINTS] = [
        Joint::Nose,
        Joint::LeftEye,
        Joint::RightEye,
        Joint::LeftEar,
        Joint::RightEar,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
        Joint::Neck,
        Joint::Root,
    ];

    #[inline]
    pub fn idx(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Joint::Nose => "nose",
            Joint::LeftEye => "left_eye",
            Joint::RightEye => "right_eye",
            Joint::LeftEar => "left_ear",
            Joint::RightEar => "right_ear",
            Joint::LeftShoulder => "left_shoulder",
            Joint::RightShoulder => "right_shoulder",
            Joint::LeftElbow => "left_elbow",
            Joint::RightElbow => "right_elbow",
            Joint::LeftWrist => "left_wrist",
            Joint::RightWrist => "right_wrist",
            Joint::LeftHip => "left_hip",
            Joint::RightHip => "right_hip",
            Joint::LeftKnee => "left_knee",
            Joint::RightKnee => "right_knee",
            Joint::LeftAnkle => "left_ankle",
            Joint::RightAnkle => "right_ankle",
            Joint::Neck => "neck",
            Joint::Root => "root",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Joint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Joint::ALL
            .iter()
            .copied()
            .find(|joint| joint.name() == s)
            .ok_or_else(|| Error::UnknownJointName(s.to_owned()))
    }
}

/// A detected joint location and the detector's confidence in it.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Keypoint {
    pub location: Point,
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Result<Self, Error> {
        Ok(Self {
            location: Point::new(x, y)?,
            confidence: NotNan::new(confidence)
                .map_err(|e| Error::ConstructNotNan(e, confidence))?
                .into_inner(),
        })
    }

    /// Like [`Keypoint::new`], additionally requiring every value to lie in `[0, 1]`.
    pub fn checked(joint: Joint, x: f32, y: f32, confidence: f32) -> Result<Self, Error> {
        let keypoint = Self::new(x, y, confidence)?;
        for &(name, value) in &[("x", x), ("y", y), ("confidence", confidence)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::ValueOutOfRange { joint, name, value });
            }
        }
        Ok(keypoint)
    }
}

/// The joints detected for a single body in a single frame.
///
/// Joints the detector did not localize are absent.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KeypointObservation {
    keypoints: [Option<Keypoint>; NUM_JOINTS],
}

impl Default for KeypointObservation {
    fn default() -> Self {
        Self {
            keypoints: [None; NUM_JOINTS],
        }
    }
}

impl KeypointObservation {
    pub fn builder() -> Builder {
        Builder::default()
    }

    #[inline]
    pub fn get(&self, joint: Joint) -> Option<&Keypoint> {
        self.keypoints[joint.idx()].as_ref()
    }

    pub fn contains(&self, joint: Joint) -> bool {
        self.get(joint).is_some()
    }

    pub fn len(&self) -> usize {
        self.keypoints.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Joint, &Keypoint)> + '_ {
        self.keypoints
            .iter()
            .enumerate()
            .filter_map(|(i, keypoint)| keypoint.as_ref().map(|keypoint| (Joint::ALL[i], keypoint)))
    }
}

impl FromIterator<(Joint, Keypoint)> for KeypointObservation {
    fn from_iter<I: IntoIterator<Item = (Joint, Keypoint)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Builder::default(), |builder, (joint, keypoint)| {
                builder.joint(joint, keypoint)
            })
            .build()
    }
}

#[derive(Debug, Default)]
pub struct Builder {
    observation: KeypointObservation,
}

impl Builder {
    /// Set `joint`, replacing any earlier keypoint for it.
    pub fn joint(mut self, joint: Joint, keypoint: Keypoint) -> Self {
        self.observation.keypoints[joint.idx()] = Some(keypoint);
        self
    }

    pub fn build(self) -> KeypointObservation {
        self.observation
    }
}

/// All bodies observed in one delivered video frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub number: usize,
    pub observations: Vec<KeypointObservation>,
}

pub mod constants {
    use super::Joint::{self, *};

    /// Number of keypoints in a PoseNet pose.
    pub const NUM_POSENET_KEYPOINTS: usize = 17;

    pub const LEFT_ARM: [Joint; 3] = [LeftWrist, LeftElbow, LeftShoulder];
    pub const RIGHT_ARM: [Joint; 3] = [RightWrist, RightElbow, RightShoulder];
}
