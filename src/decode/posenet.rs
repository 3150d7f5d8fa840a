use crate::{
    error::Error,
    point::Point,
    pose::{constants::NUM_POSENET_KEYPOINTS, Joint, Keypoint, KeypointObservation},
};
use num_traits::cast::FromPrimitive;
use serde::Deserialize;

const DEFAULT_MIN_SCORE: &str = "0.0";
const DEFAULT_MIN_POSE_SCORE: &str = "0.0";

/// PoseNet poses in pixel coordinates with a top-left origin, one frame per
/// line:
///
/// `{"poses": [{"score": 0.8, "keypoints": [[y, x, score], ...]}]}`
///
/// Keypoints are listed in PoseNet order and are normalized against the
/// frame dimensions, flipping the y axis.
#[derive(Debug, Clone, Copy, structopt::StructOpt)]
pub struct Decoder {
    /// Width of the frame the poses were detected in.
    #[structopt(short, long)]
    pub width: u16,
    /// Height of the frame the poses were detected in.
    #[structopt(short = "-H", long)]
    pub height: u16,
    /// Keypoints scoring below this are treated as undetected.
    #[structopt(short = "-k", long, default_value = DEFAULT_MIN_SCORE)]
    pub min_score: f32,
    /// Poses scoring below this are dropped.
    #[structopt(short = "-p", long, default_value = DEFAULT_MIN_POSE_SCORE)]
    pub min_pose_score: f32,
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(default)]
    poses: Vec<RawPose>,
}

#[derive(Debug, Deserialize)]
struct RawPose {
    score: f32,
    keypoints: Vec<[f32; 3]>,
}

impl Decoder {
    fn decode_pose(&self, pose: &RawPose) -> Result<KeypointObservation, Error> {
        if pose.keypoints.len() != NUM_POSENET_KEYPOINTS {
            return Err(Error::GetExpectedNumKeypoints(
                NUM_POSENET_KEYPOINTS,
                pose.keypoints.len(),
            ));
        }

        let mut builder = KeypointObservation::builder();
        for (point_i, &[y, x, score]) in pose.keypoints.iter().enumerate() {
            if score < self.min_score {
                continue;
            }
            let joint = Joint::from_usize(point_i).ok_or(Error::ConvertUSizeToJoint(point_i))?;
            let point = Point::from_image(x, y, self.width, self.height)?;
            // detections may land slightly outside the frame
            let keypoint = Keypoint::new(
                point.x().clamp(0.0, 1.0),
                point.y().clamp(0.0, 1.0),
                score.clamp(0.0, 1.0),
            )?;
            builder = builder.joint(joint, keypoint);
        }
        Ok(builder.build())
    }
}

impl crate::decode::Decoder for Decoder {
    fn decode(&self, line: &str) -> Result<Vec<KeypointObservation>, Error> {
        let frame: RawFrame = serde_json::from_str(line).map_err(Error::ParseJson)?;

        frame
            .poses
            .iter()
            .filter(|pose| pose.score >= self.min_pose_score)
            .map(|pose| self.decode_pose(pose))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Decoder;
    use crate::{decode::Decoder as _, error::Error, pose::Joint};
    use assert_approx_eq::assert_approx_eq;

    fn decoder() -> Decoder {
        Decoder {
            width: 640,
            height: 480,
            min_score: 0.0,
            min_pose_score: 0.0,
        }
    }

    fn pose_line(score: f32, keypoints: &[[f32; 3]]) -> String {
        let keypoints = keypoints
            .iter()
            .map(|[y, x, s]| format!("[{}, {}, {}]", y, x, s))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            r#"{{"poses": [{{"score": {}, "keypoints": [{}]}}]}}"#,
            score, keypoints
        )
    }

    #[test]
    fn normalizes_and_flips() {
        let mut keypoints = [[0.0, 0.0, 0.9]; 17];
        // left shoulder, PoseNet index 5
        keypoints[5] = [120.0, 160.0, 0.8];
        let bodies = decoder().decode(&pose_line(0.7, &keypoints)).unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].len(), 17);

        let shoulder = bodies[0].get(Joint::LeftShoulder).unwrap();
        assert_approx_eq!(shoulder.location.x(), 0.25);
        assert_approx_eq!(shoulder.location.y(), 0.75);
        assert_approx_eq!(shoulder.confidence, 0.8);

        let nose = bodies[0].get(Joint::Nose).unwrap();
        assert_approx_eq!(nose.location.y(), 1.0);
        assert!(!bodies[0].contains(Joint::Neck));
    }

    #[test]
    fn clamps_points_outside_the_frame() {
        let mut keypoints = [[0.0, 0.0, 0.9]; 17];
        keypoints[0] = [-10.0, 700.0, 0.9];
        let bodies = decoder().decode(&pose_line(0.7, &keypoints)).unwrap();
        let nose = bodies[0].get(Joint::Nose).unwrap();
        assert_approx_eq!(nose.location.x(), 1.0);
        assert_approx_eq!(nose.location.y(), 1.0);
    }

    #[test]
    fn low_scores_are_dropped() {
        let mut keypoints = [[240.0, 320.0, 0.9]; 17];
        keypoints[9] = [240.0, 320.0, 0.1];
        let decoder = Decoder {
            min_score: 0.2,
            min_pose_score: 0.5,
            ..decoder()
        };

        let bodies = decoder.decode(&pose_line(0.7, &keypoints)).unwrap();
        assert_eq!(bodies[0].len(), 16);
        assert!(!bodies[0].contains(Joint::LeftWrist));

        let bodies = decoder.decode(&pose_line(0.3, &keypoints)).unwrap();
        assert!(bodies.is_empty());
    }

    #[test]
    fn wrong_keypoint_count_is_an_error() {
        let keypoints = [[0.0, 0.0, 0.9]; 5];
        assert!(matches!(
            decoder().decode(&pose_line(0.7, &keypoints)),
            Err(Error::GetExpectedNumKeypoints(17, 5))
        ));
    }

    #[test]
    fn zero_sized_frame_is_an_error() {
        let decoder = Decoder {
            width: 0,
            ..decoder()
        };
        let keypoints = [[0.0, 0.0, 0.9]; 17];
        assert!(matches!(
            decoder.decode(&pose_line(0.7, &keypoints)),
            Err(Error::ZeroFrameDimensions(0, 480))
        ));
    }
}
