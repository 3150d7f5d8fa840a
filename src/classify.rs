//! Flexed-bicep classification from a single body's keypoints.
//!
//! An arm is flexed when its elbow is level with or above its shoulder and
//! its wrist sits within a small box around the shoulder. Each arm is judged
//! on its own: a missing or low-confidence joint only rules out that arm.

use crate::pose::{constants, Joint, Keypoint, KeypointObservation};
use tracing::trace;

/// Confidence a joint must strictly exceed to take part in classification.
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Per-axis distance, in normalized coordinates, under which a wrist counts
/// as near its shoulder.
pub const PROXIMITY_THRESHOLD: f32 = 0.1;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Arm {
    Left,
    Right,
}

impl Arm {
    pub const BOTH: [Arm; 2] = [Arm::Left, Arm::Right];

    /// Wrist, elbow and shoulder, in that order.
    pub fn joints(self) -> [Joint; 3] {
        match self {
            Arm::Left => constants::LEFT_ARM,
            Arm::Right => constants::RIGHT_ARM,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PoseClassification {
    pub left: bool,
    pub right: bool,
}

impl PoseClassification {
    #[inline]
    pub fn is_flexed(self) -> bool {
        self.left || self.right
    }

    pub fn arm(self, arm: Arm) -> bool {
        match arm {
            Arm::Left => self.left,
            Arm::Right => self.right,
        }
    }
}

fn confident(observation: &KeypointObservation, joint: Joint) -> Option<&Keypoint> {
    observation
        .get(joint)
        .filter(|keypoint| keypoint.confidence > CONFIDENCE_THRESHOLD)
}

/// Whether `arm` is flexed in `observation`.
pub fn is_arm_flexed(observation: &KeypointObservation, arm: Arm) -> bool {
    let [wrist, elbow, shoulder] = arm.joints();
    let (wrist, elbow, shoulder) = match (
        confident(observation, wrist),
        confident(observation, elbow),
        confident(observation, shoulder),
    ) {
        (Some(wrist), Some(elbow), Some(shoulder)) => (wrist, elbow, shoulder),
        _ => {
            trace!(?arm, "arm keypoints missing or below confidence threshold");
            return false;
        }
    };

    // y grows upward, so a raised elbow has the larger y
    let elbow_raised = elbow.location.y() >= shoulder.location.y();
    let wrist_near_shoulder = wrist
        .location
        .is_near(shoulder.location, PROXIMITY_THRESHOLD);

    trace!(
        ?arm,
        elbow_raised = elbow_raised,
        wrist_near_shoulder = wrist_near_shoulder,
        "evaluated arm"
    );
    elbow_raised && wrist_near_shoulder
}

pub fn classify(observation: &KeypointObservation) -> PoseClassification {
    PoseClassification {
        left: is_arm_flexed(observation, Arm::Left),
        right: is_arm_flexed(observation, Arm::Right),
    }
}

/// Whether either arm in `observation` is flexed.
pub fn is_bicep_flexed(observation: &KeypointObservation) -> bool {
    classify(observation).is_flexed()
}
