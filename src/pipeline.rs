use image::DynamicImage;
use std::sync::Arc;
use std::collections::HashMap;
use anyhow::Result;
use log::{debug, error, info};

use crate::models::{CornerSet, DrawableLine, LineSegment};

/// Named data ports a step can read from or write to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    Image,
    Lines,
    LinesDrawable,
    Corners,
    MaskedImage,
}

/// Typed payload of a port
#[derive(Debug, Clone)]
pub enum PortValue {
    Lines(Vec<LineSegment>),
    Drawables(Vec<DrawableLine>),
    Corners(CornerSet),
    Image(DynamicImage),
}

/// Data that flows through the pipeline for a single frame
#[derive(Clone)]
pub struct FrameData {
    /// The working image (grayscale or edge map after preprocessing)
    pub image: DynamicImage,

    /// The frame as it entered the pipeline, shared and never modified
    pub source: Arc<DynamicImage>,

    /// Outputs written by the steps that ran so far
    pub ports: HashMap<Port, PortValue>,
}

impl FrameData {
    /// Create FrameData for a fresh input frame
    pub fn from_image(image: DynamicImage) -> Self {
        let source = Arc::new(image.clone());
        Self {
            image,
            source,
            ports: HashMap::new(),
        }
    }

    /// Whether a port has been populated for this frame.
    /// The working image is always available.
    pub fn has(&self, port: Port) -> bool {
        port == Port::Image || self.ports.contains_key(&port)
    }

    /// Write a port
    pub fn with_port(mut self, port: Port, value: PortValue) -> Self {
        self.ports.insert(port, value);
        self
    }

    /// Extended lines, if the line stage produced them
    pub fn lines(&self) -> Option<&[LineSegment]> {
        match self.ports.get(&Port::Lines) {
            Some(PortValue::Lines(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Drawable lines, if the line stage produced them
    pub fn lines_drawable(&self) -> Option<&[DrawableLine]> {
        match self.ports.get(&Port::LinesDrawable) {
            Some(PortValue::Drawables(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Ordered corners, if exactly four were found
    pub fn corners(&self) -> Option<&CornerSet> {
        match self.ports.get(&Port::Corners) {
            Some(PortValue::Corners(v)) => Some(v),
            _ => None,
        }
    }

    /// The masked source image, if the mask stage ran
    pub fn masked_image(&self) -> Option<&DynamicImage> {
        match self.ports.get(&Port::MaskedImage) {
            Some(PortValue::Image(v)) => Some(v),
            _ => None,
        }
    }
}

/// Context available to all pipeline steps
#[derive(Clone, Debug, Default)]
pub struct PipelineContext {
    pub verbose: bool,
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    /// Process a frame and return it with this step's outputs written.
    /// A step that has nothing to report returns the frame unchanged.
    fn process(&self, frame: FrameData, context: &PipelineContext) -> Result<FrameData>;

    /// Ports that must be populated before this step runs
    fn inputs(&self) -> &[Port] {
        &[Port::Image]
    }

    /// Human-readable name for this step (used in log output)
    fn name(&self) -> &str;
}

/// Composable pipeline builder
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext::default(),
        }
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.context.verbose = verbose;
        self
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Helper method to add a step from a Box (for convenience)
    pub fn add_step_boxed(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(Arc::from(step));
        self
    }

    /// Number of steps in the pipeline
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step on one frame
    pub fn run(&self, input: DynamicImage) -> Result<FrameData> {
        self.run_partial(input, self.steps.len())
    }

    /// Run only the first `num_steps` steps (useful for debugging)
    pub fn run_partial(&self, input: DynamicImage, num_steps: usize) -> Result<FrameData> {
        let mut frame = FrameData::from_image(input);

        // Preprocessing filters assert non-empty input, so nothing runs on an empty frame.
        if frame.image.width() == 0 || frame.image.height() == 0 {
            error!(
                "Input frame is empty ({}x{}), no step runs",
                frame.image.width(),
                frame.image.height()
            );
            return Ok(frame);
        }

        for (i, step) in self.steps.iter().take(num_steps).enumerate() {
            if let Some(missing) = step.inputs().iter().find(|port| !frame.has(**port)) {
                debug!("Skipping step {}: {} ({:?} not populated)", i + 1, step.name(), missing);
                continue;
            }

            if self.context.verbose {
                info!("Running step {}: {}", i + 1, step.name());
            }
            frame = step.process(frame, &self.context)?;
        }

        Ok(frame)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
