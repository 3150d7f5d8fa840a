use crate::{error::Error, pose::KeypointObservation};

pub trait Decoder {
    /// Decode one line of detector output into the bodies it describes.
    fn decode(&self, line: &str) -> Result<Vec<KeypointObservation>, Error>;
}

mod posenet;
mod vision;

#[derive(Debug, Clone, Copy, structopt::StructOpt)]
pub enum Decode {
    /// Decode named joints in normalized, bottom-left origin coordinates
    Vision(vision::Decoder),
    /// Decode PoseNet keypoints in pixel coordinates
    Posenet(posenet::Decoder),
}

impl Default for Decode {
    fn default() -> Self {
        Self::Vision(vision::Decoder::default())
    }
}

impl Decoder for Decode {
    fn decode(&self, line: &str) -> Result<Vec<KeypointObservation>, Error> {
        if line.trim().is_empty() {
            return Ok(Vec::new());
        }
        match self {
            Self::Vision(d) => d.decode(line),
            Self::Posenet(d) => d.decode(line),
        }
    }
}

pub use posenet::Decoder as PosenetDecoder;
pub use vision::Decoder as VisionDecoder;
