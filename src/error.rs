use thiserror::Error;

/// Errors raised by the detection stages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuadError {
    #[error("input image is empty")]
    EmptyImage,

    #[error("input image must have exactly one channel, got {0}")]
    ChannelCount(u8),

    #[error("{name} = {value} is outside the allowed range [{min}, {max}]")]
    ParameterOutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

pub type Result<T> = std::result::Result<T, QuadError>;
