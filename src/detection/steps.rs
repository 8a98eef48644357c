use crate::pipeline::{FrameData, PipelineStep, PipelineContext, Port, PortValue};
use crate::config::{FrameBounds, HoughParams};
use crate::detection::corners::CornerFinder;
use crate::detection::lines::LineExtractor;
use crate::detection::{mask, preprocessing};
use anyhow::Result;
use image::DynamicImage;
use log::{debug, error, info};

/// Convert image to grayscale
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(&self, mut frame: FrameData, _context: &PipelineContext) -> Result<FrameData> {
        frame.image = DynamicImage::ImageLuma8(preprocessing::to_grayscale(&frame.image));
        Ok(frame)
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Apply Gaussian blur
pub struct BlurStep {
    pub sigma: f32,
}

impl PipelineStep for BlurStep {
    fn process(&self, mut frame: FrameData, _context: &PipelineContext) -> Result<FrameData> {
        let gray = frame.image.to_luma8();
        frame.image = DynamicImage::ImageLuma8(preprocessing::apply_blur(&gray, self.sigma));
        Ok(frame)
    }

    fn name(&self) -> &str {
        "Gaussian Blur"
    }
}

/// Detect edges using Canny
pub struct EdgeDetectionStep {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl PipelineStep for EdgeDetectionStep {
    fn process(&self, mut frame: FrameData, _context: &PipelineContext) -> Result<FrameData> {
        let gray = frame.image.to_luma8();
        let edges = preprocessing::detect_edges(&gray, self.low_threshold, self.high_threshold);
        frame.image = DynamicImage::ImageLuma8(edges);
        Ok(frame)
    }

    fn name(&self) -> &str {
        "Edge Detection"
    }
}

/// Detect straight edges on the working image and extend them across the frame.
///
/// Writes `Lines` and `LinesDrawable`. An empty or multi-channel working image is
/// logged and leaves the frame without either port.
#[derive(Default)]
pub struct LineExtractionStep {
    pub extractor: LineExtractor,
}

impl LineExtractionStep {
    pub fn new(params: HoughParams) -> Self {
        Self {
            extractor: LineExtractor::new(params),
        }
    }
}

impl PipelineStep for LineExtractionStep {
    fn process(&self, frame: FrameData, context: &PipelineContext) -> Result<FrameData> {
        let extracted = match self.extractor.extract(&frame.image) {
            Ok(extracted) => extracted,
            Err(e) => {
                error!("{}: {}", self.name(), e);
                return Ok(frame);
            }
        };

        if context.verbose {
            info!("Found {} lines", extracted.lines.len());
        }

        Ok(frame
            .with_port(Port::Lines, PortValue::Lines(extracted.lines))
            .with_port(Port::LinesDrawable, PortValue::Drawables(extracted.drawables)))
    }

    fn inputs(&self) -> &[Port] {
        &[Port::Image]
    }

    fn name(&self) -> &str {
        "Line Extraction"
    }
}

/// Intersect the extracted lines and keep the corners of a single quadrilateral.
///
/// `bounds` limits accepted corners; `None` uses the source frame's size.
#[derive(Default)]
pub struct CornerFinderStep {
    pub bounds: Option<FrameBounds>,
}

impl PipelineStep for CornerFinderStep {
    fn process(&self, frame: FrameData, context: &PipelineContext) -> Result<FrameData> {
        let bounds = self
            .bounds
            .unwrap_or_else(|| FrameBounds::new(frame.source.width(), frame.source.height()));
        let lines = frame.lines().unwrap_or_default();

        let Some(corners) = CornerFinder::new(bounds).find(lines) else {
            return Ok(frame);
        };

        if context.verbose {
            info!("Corners: {:?}", corners.points());
        }
        Ok(frame.with_port(Port::Corners, PortValue::Corners(corners)))
    }

    fn inputs(&self) -> &[Port] {
        &[Port::Lines]
    }

    fn name(&self) -> &str {
        "Corner Finder"
    }
}

/// Zero every pixel of the source frame outside the corner quadrilateral.
pub struct CornerMaskStep;

impl PipelineStep for CornerMaskStep {
    fn process(&self, frame: FrameData, _context: &PipelineContext) -> Result<FrameData> {
        let Some(corners) = frame.corners() else {
            return Ok(frame);
        };

        let source = frame.source.as_ref();
        let corner_mask = mask::corner_mask(source.width(), source.height(), corners);
        let masked = mask::apply_mask(source, &corner_mask);
        debug!("Masked {}x{} frame", masked.width(), masked.height());

        Ok(frame.with_port(Port::MaskedImage, PortValue::Image(masked)))
    }

    fn inputs(&self) -> &[Port] {
        &[Port::Image, Port::Corners]
    }

    fn name(&self) -> &str {
        "Corner Mask"
    }
}
