use image::{DynamicImage, GrayImage, Luma};
use log::debug;

use crate::config::HoughParams;
use crate::detection::hough;
use crate::error::{QuadError, Result};
use crate::models::{DrawableLine, LineSegment};

/// Output of the line extraction stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedLines {
    /// Extended lines in detector emission order.
    pub lines: Vec<LineSegment>,
    /// One drawable per entry of `lines`, same order.
    pub drawables: Vec<DrawableLine>,
}

/// Detects straight edges on a single-channel image and extends them across the frame.
#[derive(Debug, Clone, Default)]
pub struct LineExtractor {
    pub params: HoughParams,
}

impl LineExtractor {
    pub fn new(params: HoughParams) -> Self {
        Self { params }
    }

    pub fn extract(&self, img: &DynamicImage) -> Result<ExtractedLines> {
        self.params.validate()?;
        check_preconditions(img)?;

        let gray = edge_map(img);
        let (width, height) = gray.dimensions();
        let segments = hough::detect_segments(&gray, &self.params);
        debug!("Found {} lines", segments.len());

        let lines: Vec<LineSegment> = segments
            .iter()
            .map(|s| extend_segment(s, width, height))
            .collect();
        let drawables = lines.iter().map(DrawableLine::from).collect();

        Ok(ExtractedLines { lines, drawables })
    }
}

/// The extractor only accepts non-empty, single-channel images.
pub fn check_preconditions(img: &DynamicImage) -> Result<()> {
    if img.width() == 0 || img.height() == 0 {
        return Err(QuadError::EmptyImage);
    }
    let channels = img.color().channel_count();
    if channels != 1 {
        return Err(QuadError::ChannelCount(channels));
    }
    Ok(())
}

/// Binary 8-bit view of a single-channel image; any non-zero sample is an edge.
///
/// Going through the raw samples keeps faint 16-bit and float edges that an
/// 8-bit conversion would round down to zero.
pub fn edge_map(img: &DynamicImage) -> GrayImage {
    let on = |edge: bool| Luma([if edge { 255u8 } else { 0 }]);
    match img {
        DynamicImage::ImageLuma8(buf) => buf.clone(),
        DynamicImage::ImageLuma16(buf) => {
            GrayImage::from_fn(buf.width(), buf.height(), |x, y| on(buf.get_pixel(x, y)[0] != 0))
        }
        other => {
            let samples = other.to_luma32f();
            GrayImage::from_fn(samples.width(), samples.height(), |x, y| {
                on(samples.get_pixel(x, y)[0] != 0.0)
            })
        }
    }
}

/// Replace a finite segment by the line through its endpoints, spanning x in [0, width].
///
/// Vertical segments span y in [0, height] at their own x instead.
pub fn extend_segment(segment: &LineSegment, width: u32, height: u32) -> LineSegment {
    if segment.is_vertical() {
        return LineSegment::new(segment.x1, 0, segment.x1, height as i32);
    }

    let slope = (segment.y1 - segment.y2) as f64 / (segment.x1 - segment.x2) as f64;
    let y_at = |x: f64| (slope * (x - segment.x2 as f64) + segment.y2 as f64).round() as i32;

    LineSegment::new(0, y_at(0.0), width as i32, y_at(width as f64))
}
