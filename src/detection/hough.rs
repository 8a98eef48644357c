//! Progressive probabilistic Hough transform for line segments.
//!
//! Edge pixels are visited in random order. Each visited pixel votes in a
//! (θ, ρ) accumulator; as soon as one bin reaches the vote threshold, the line
//! through that pixel is followed in both directions across gaps of at most
//! `max_line_gap` pixels. Accepted segments remove their pixels from further
//! consideration and withdraw the votes those pixels would cast.

use image::GrayImage;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::HoughParams;
use crate::models::LineSegment;

const ANGLE_STEPS: usize = 180;
const SHIFT: u32 = 16;

struct Accumulator {
    votes: Vec<i32>,
    num_rho: usize,
    /// cos θ, sin θ per angle step.
    trig: Vec<(f64, f64)>,
}

impl Accumulator {
    fn new(width: u32, height: u32) -> Self {
        let num_rho = ((width as usize + height as usize) * 2) + 1;
        let step = std::f64::consts::PI / ANGLE_STEPS as f64;
        let trig = (0..ANGLE_STEPS)
            .map(|n| {
                let theta = n as f64 * step;
                (theta.cos(), theta.sin())
            })
            .collect();

        Self {
            votes: vec![0; ANGLE_STEPS * num_rho],
            num_rho,
            trig,
        }
    }

    fn bin(&self, n: usize, x: i64, y: i64) -> usize {
        let (cos, sin) = self.trig[n];
        let r = (x as f64 * cos + y as f64 * sin).round() as i64 + (self.num_rho as i64 - 1) / 2;
        n * self.num_rho + r as usize
    }

    /// Vote for every line through (x, y); returns the best angle reaching `threshold`.
    fn vote(&mut self, x: i64, y: i64, threshold: i32) -> Option<usize> {
        let mut best = None;
        let mut max_val = threshold - 1;
        for n in 0..ANGLE_STEPS {
            let idx = self.bin(n, x, y);
            self.votes[idx] += 1;
            if self.votes[idx] > max_val {
                max_val = self.votes[idx];
                best = Some(n);
            }
        }
        best
    }

    fn withdraw(&mut self, x: i64, y: i64) {
        for n in 0..ANGLE_STEPS {
            let idx = self.bin(n, x, y);
            self.votes[idx] -= 1;
        }
    }
}

/// Fixed-point walker along a line direction.
#[derive(Clone, Copy)]
struct Walk {
    /// Whether x is the integer (major) axis.
    x_major: bool,
    x0: i64,
    y0: i64,
    dx: i64,
    dy: i64,
}

impl Walk {
    fn new(x: i64, y: i64, cos: f64, sin: f64) -> Self {
        let a = -sin;
        let b = cos;
        let half = 1i64 << (SHIFT - 1);
        let unit = (1i64 << SHIFT) as f64;

        if a.abs() > b.abs() {
            Self {
                x_major: true,
                x0: x,
                y0: (y << SHIFT) + half,
                dx: if a > 0.0 { 1 } else { -1 },
                dy: (b * unit / a.abs()).round() as i64,
            }
        } else {
            Self {
                x_major: false,
                x0: (x << SHIFT) + half,
                y0: y,
                dx: (a * unit / b.abs()).round() as i64,
                dy: if b > 0.0 { 1 } else { -1 },
            }
        }
    }

    /// Pixel positions along one direction (`forward` or its reverse), unbounded.
    fn pixels(self, forward: bool) -> impl Iterator<Item = (i64, i64)> {
        let (dx, dy) = if forward { (self.dx, self.dy) } else { (-self.dx, -self.dy) };
        let mut x = self.x0;
        let mut y = self.y0;
        std::iter::from_fn(move || {
            let pixel = if self.x_major {
                (x, y >> SHIFT)
            } else {
                (x >> SHIFT, y)
            };
            x += dx;
            y += dy;
            Some(pixel)
        })
    }
}

/// Detect line segments on a binary edge map (non-zero pixels are edges).
pub fn detect_segments(edges: &GrayImage, params: &HoughParams) -> Vec<LineSegment> {
    let (width, height) = edges.dimensions();
    let (w, h) = (width as i64, height as i64);
    let inside = |x: i64, y: i64| x >= 0 && y >= 0 && x < w && y < h;
    let index = |x: i64, y: i64| (y * w + x) as usize;

    let mut mask: Vec<bool> = edges.pixels().map(|p| p[0] != 0).collect();
    let mut remaining: Vec<(i64, i64)> = edges
        .enumerate_pixels()
        .filter(|(_, _, p)| p[0] != 0)
        .map(|(x, y, _)| (x as i64, y as i64))
        .collect();

    let mut accumulator = Accumulator::new(width, height);
    let mut rng = StdRng::seed_from_u64(params.seed);
    let threshold = params.threshold.min(i32::MAX as u32) as i32;
    let max_gap = params.max_line_gap as i64;
    let min_length = params.min_line_length as i64;
    let mut segments = Vec::new();

    while !remaining.is_empty() {
        let pick = rng.gen_range(0..remaining.len());
        let (x, y) = remaining.swap_remove(pick);

        // Already consumed by an earlier segment.
        if !mask[index(x, y)] {
            continue;
        }

        let Some(angle) = accumulator.vote(x, y, threshold) else {
            continue;
        };

        let (cos, sin) = accumulator.trig[angle];
        let walk = Walk::new(x, y, cos, sin);

        // Find both ends, tolerating short gaps.
        let mut ends = [(x, y); 2];
        for (k, end) in ends.iter_mut().enumerate() {
            let mut gap = 0;
            for (px, py) in walk.pixels(k == 0) {
                if !inside(px, py) {
                    break;
                }
                if mask[index(px, py)] {
                    gap = 0;
                    *end = (px, py);
                } else {
                    gap += 1;
                    if gap > max_gap {
                        break;
                    }
                }
            }
        }

        let accepted = (ends[1].0 - ends[0].0).abs() >= min_length
            || (ends[1].1 - ends[0].1).abs() >= min_length;

        // Consume the pixels between the ends.
        for (k, end) in ends.iter().enumerate() {
            for (px, py) in walk.pixels(k == 0) {
                if !inside(px, py) {
                    break;
                }
                let idx = index(px, py);
                if mask[idx] {
                    if accepted {
                        accumulator.withdraw(px, py);
                    }
                    mask[idx] = false;
                }
                if (px, py) == *end {
                    break;
                }
            }
        }

        if accepted {
            segments.push(LineSegment::new(
                ends[0].0 as i32,
                ends[0].1 as i32,
                ends[1].0 as i32,
                ends[1].1 as i32,
            ));
        }
    }

    debug!(
        "Hough: {} segments (threshold={}, min_length={}, max_gap={})",
        segments.len(),
        params.threshold,
        params.min_line_length,
        params.max_line_gap
    );

    segments
}
