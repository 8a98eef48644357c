pub mod preprocessing;
pub mod hough;
pub mod lines;
pub mod corners;
pub mod mask;
pub mod steps;

use image::DynamicImage;
use log::debug;

use crate::config::{FrameBounds, HoughParams};
use crate::error::Result;
use crate::models::{CornerSet, DrawableLine, LineSegment};
use corners::CornerFinder;
use lines::LineExtractor;

/// Everything one frame produced. Later stages are `None` when they did not fire.
#[derive(Debug, Clone)]
pub struct QuadDetection {
    pub lines: Vec<LineSegment>,
    pub drawables: Vec<DrawableLine>,
    pub corners: Option<CornerSet>,
    pub masked: Option<DynamicImage>,
}

/// Line extraction, corner finding and masking as plain function composition
#[derive(Debug, Clone, Default)]
pub struct QuadDetector {
    pub hough: HoughParams,
    /// Corner bounds; `None` uses the frame's own size.
    pub bounds: Option<FrameBounds>,
}

impl QuadDetector {
    pub fn new(hough: HoughParams) -> Self {
        Self { hough, bounds: None }
    }

    pub fn with_bounds(mut self, bounds: FrameBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Run all three stages. `edges` feeds the line detector, `source` is masked.
    pub fn detect(&self, edges: &DynamicImage, source: &DynamicImage) -> Result<QuadDetection> {
        let extracted = LineExtractor::new(self.hough).extract(edges)?;

        let bounds = self
            .bounds
            .unwrap_or_else(|| FrameBounds::new(source.width(), source.height()));
        let corners = CornerFinder::new(bounds).find(&extracted.lines);

        let masked = corners.as_ref().and_then(|c| mask::apply_corner_mask(source, c.points()));
        debug!(
            "Detection: {} lines, corners found: {}",
            extracted.lines.len(),
            corners.is_some()
        );

        Ok(QuadDetection {
            lines: extracted.lines,
            drawables: extracted.drawables,
            corners,
            masked,
        })
    }
}

/// Standard preprocessing for camera frames ahead of line extraction
#[derive(Debug, Clone, Copy)]
pub struct PreprocessOptions {
    pub blur_sigma: f32,
    pub canny_low: f32,
    pub canny_high: f32,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            blur_sigma: 1.5,
            canny_low: 50.0,
            canny_high: 100.0,
        }
    }
}

/// Build the standard corner detection pipeline using the composable pipeline system
pub fn build_standard_pipeline(
    preprocess: PreprocessOptions,
    hough: HoughParams,
    bounds: Option<FrameBounds>,
    verbose: bool,
) -> crate::pipeline::Pipeline {
    use crate::pipeline::Pipeline;
    use crate::detection::steps::*;
    use std::sync::Arc;

    Pipeline::new()
        .with_verbose(verbose)
        .add_step(Arc::new(GrayscaleStep))
        .add_step(Arc::new(BlurStep { sigma: preprocess.blur_sigma }))
        .add_step(Arc::new(EdgeDetectionStep {
            low_threshold: preprocess.canny_low,
            high_threshold: preprocess.canny_high,
        }))
        .add_step(Arc::new(LineExtractionStep::new(hough)))
        .add_step(Arc::new(CornerFinderStep { bounds }))
        .add_step(Arc::new(CornerMaskStep))
}
