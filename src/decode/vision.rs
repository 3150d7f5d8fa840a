use crate::{
    error::Error,
    pose::{Joint, Keypoint, KeypointObservation},
};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Named joints in normalized coordinates with a bottom-left origin, one
/// frame per line:
///
/// `{"bodies": [{"left_wrist": {"x": 0.5, "y": 0.5, "confidence": 0.9}}]}`
#[derive(Debug, Clone, Copy, Default, structopt::StructOpt)]
pub struct Decoder {}

#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(default)]
    bodies: Vec<BTreeMap<String, RawKeypoint>>,
}

#[derive(Debug, Deserialize)]
struct RawKeypoint {
    x: f32,
    y: f32,
    confidence: f32,
}

impl crate::decode::Decoder for Decoder {
    fn decode(&self, line: &str) -> Result<Vec<KeypointObservation>, Error> {
        let frame: RawFrame = serde_json::from_str(line).map_err(Error::ParseJson)?;

        frame
            .bodies
            .into_iter()
            .map(|body| {
                body.into_iter()
                    .map(|(name, RawKeypoint { x, y, confidence })| {
                        let joint = name.parse::<Joint>()?;
                        Ok((joint, Keypoint::checked(joint, x, y, confidence)?))
                    })
                    .collect::<Result<KeypointObservation, Error>>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Decoder;
    use crate::{decode::Decoder as _, error::Error, pose::Joint};
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn decodes_bodies() {
        let line = r#"{"bodies": [
            {"left_wrist": {"x": 0.52, "y": 0.52, "confidence": 1.0},
             "left_elbow": {"x": 0.5, "y": 0.6, "confidence": 0.75}},
            {}
        ]}"#;
        let bodies = Decoder::default().decode(line).unwrap();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0].len(), 2);
        assert!(bodies[1].is_empty());

        let elbow = bodies[0].get(Joint::LeftElbow).unwrap();
        assert_approx_eq!(elbow.location.x(), 0.5);
        assert_approx_eq!(elbow.location.y(), 0.6);
        assert_approx_eq!(elbow.confidence, 0.75);
    }

    #[test]
    fn missing_bodies_is_empty() {
        assert!(Decoder::default().decode("{}").unwrap().is_empty());
    }

    #[test]
    fn unknown_joint_is_an_error() {
        let line = r#"{"bodies": [{"left_thumb": {"x": 0.1, "y": 0.1, "confidence": 0.9}}]}"#;
        assert!(matches!(
            Decoder::default().decode(line),
            Err(Error::UnknownJointName(_))
        ));
    }

    #[test]
    fn out_of_range_is_an_error() {
        let line = r#"{"bodies": [{"neck": {"x": 0.1, "y": 1.5, "confidence": 0.9}}]}"#;
        assert!(matches!(
            Decoder::default().decode(line),
            Err(Error::ValueOutOfRange {
                joint: Joint::Neck,
                name: "y",
                ..
            })
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            Decoder::default().decode("{\"bodies\": ["),
            Err(Error::ParseJson(_))
        ));
    }
}
