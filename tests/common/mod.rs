mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from quadcorners for tests
pub use quadcorners::{
    CornerSet, FrameBounds, FrameData, HoughParams, LineSegment, Pipeline, Point2D, Port,
    QuadDetector, QuadError,
};
