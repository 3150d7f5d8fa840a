use crate::pose::Joint;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to construct NotNan from f32: {1}")]
    ConstructNotNan(#[source] ordered_float::FloatIsNan, f32),

    #[error("failed to convert usize value to joint: {0}")]
    ConvertUSizeToJoint(usize),

    #[error("unknown joint name: {0}")]
    UnknownJointName(String),

    #[error("{name} of {joint:?} is outside [0, 1]: {value}")]
    ValueOutOfRange {
        joint: Joint,
        name: &'static str,
        value: f32,
    },

    #[error("expected {0} posenet keypoints, got {1}")]
    GetExpectedNumKeypoints(usize, usize),

    #[error("frame dimensions must be non-zero, got {0}x{1}")]
    ZeroFrameDimensions(u16, u16),

    #[error("failed to parse observation json")]
    ParseJson(#[source] serde_json::Error),

    #[error("failed to decode observation line {1}")]
    DecodeLine(#[source] Box<Error>, usize),

    #[error("failed to read input line")]
    ReadLine(#[source] std::io::Error),

    #[error("queue size must be at least 1")]
    ZeroQueueSize,

    #[error("failed to send frame {0}: consumer disconnected")]
    SendFrame(usize),

    #[error("failed to send report for frame {0}: receiver disconnected")]
    SendReport(usize),

    #[error("a pipeline thread panicked")]
    ThreadPanicked,
}
