pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;

pub use config::{FrameBounds, HoughParams};
pub use error::QuadError;
pub use models::{CornerSet, DrawableLine, LineSegment, Point2D};
pub use detection::{QuadDetection, QuadDetector, PreprocessOptions, build_standard_pipeline};
pub use pipeline::{
    Pipeline, FrameData, PipelineStep, PipelineContext, Port, PortValue,
};
