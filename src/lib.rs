//! Flexed-bicep detection from body pose keypoints.
//!
//! The detector itself lives elsewhere; this crate consumes its per-frame
//! keypoints, classifies each body and reports debounced detections.

pub mod classify;
pub mod cooldown;
pub mod decode;
pub mod engine;
pub mod error;
pub mod point;
pub mod pose;

pub use classify::{classify, is_bicep_flexed, Arm, PoseClassification};
pub use error::Error;
pub use pose::{Joint, Keypoint, KeypointObservation};
