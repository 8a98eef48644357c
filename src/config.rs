use std::ops::RangeInclusive;

use crate::error::{QuadError, Result};

pub const THRESHOLD_RANGE: RangeInclusive<u32> = 1..=1000;
pub const MIN_LINE_LENGTH_RANGE: RangeInclusive<u32> = 0..=1000;
pub const MAX_LINE_GAP_RANGE: RangeInclusive<u32> = 0..=100;

/// Seed for the pixel visiting order of the probabilistic line detector.
pub const DEFAULT_SEED: u64 = u64::MAX;

/// Tuning of the probabilistic segment detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoughParams {
    /// Minimum accumulator votes for a line to be considered.
    pub threshold: u32,
    /// Segments shorter than this along both axes are dropped.
    pub min_line_length: u32,
    /// Largest run of missing pixels bridged while following a line.
    pub max_line_gap: u32,
    pub seed: u64,
}

impl HoughParams {
    /// Build a validated parameter set.
    pub fn new(threshold: u32, min_line_length: u32, max_line_gap: u32) -> Result<Self> {
        let params = Self {
            threshold,
            min_line_length,
            max_line_gap,
            seed: DEFAULT_SEED,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check("threshold", self.threshold, &THRESHOLD_RANGE)?;
        check("min_line_length", self.min_line_length, &MIN_LINE_LENGTH_RANGE)?;
        check("max_line_gap", self.max_line_gap, &MAX_LINE_GAP_RANGE)?;
        Ok(())
    }
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            threshold: 80,
            min_line_length: 30,
            max_line_gap: 10,
            seed: DEFAULT_SEED,
        }
    }
}

fn check(name: &'static str, value: u32, range: &RangeInclusive<u32>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(QuadError::ParameterOutOfRange {
            name,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Exclusive upper bounds for accepted corner coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBounds {
    pub width: u32,
    pub height: u32,
}

impl FrameBounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width as f32 && y < self.height as f32
    }
}

impl Default for FrameBounds {
    /// Resolution of the reference camera.
    fn default() -> Self {
        Self::new(1296, 1032)
    }
}

impl std::str::FromStr for FrameBounds {
    type Err = String;

    /// Parses `WIDTHxHEIGHT`, e.g. `1296x1032`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
        let width = w.trim().parse().map_err(|e| format!("invalid width '{}': {}", w, e))?;
        let height = h.trim().parse().map_err(|e| format!("invalid height '{}': {}", h, e))?;
        Ok(Self::new(width, height))
    }
}
