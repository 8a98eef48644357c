use log::debug;

use crate::config::FrameBounds;
use crate::models::{CornerSet, LineSegment, Point2D};

/// Intersection of the infinite lines through `a` and `b`, or `None` if they are parallel.
pub fn intersect(a: &LineSegment, b: &LineSegment) -> Option<Point2D> {
    let (x1, y1, x2, y2) = (a.x1 as f64, a.y1 as f64, a.x2 as f64, a.y2 as f64);
    let (x3, y3, x4, y4) = (b.x1 as f64, b.y1 as f64, b.x2 as f64, b.y2 as f64);

    let d = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if d == 0.0 {
        return None;
    }

    let det_a = x1 * y2 - y1 * x2;
    let det_b = x3 * y4 - y3 * x4;
    let px = (det_a * (x3 - x4) - (x1 - x2) * det_b) / d;
    let py = (det_a * (y3 - y4) - (y1 - y2) * det_b) / d;

    Some(Point2D::new(px as f32, py as f32))
}

/// Orders points by squared distance from the origin. Stable for ties.
pub fn radial_sort(points: &mut [Point2D]) {
    points.sort_by(|a, b| a.squared_norm().total_cmp(&b.squared_norm()));
}

/// Turns a set of extended lines into the four corners of a quadrilateral.
#[derive(Debug, Clone, Copy, Default)]
pub struct CornerFinder {
    pub bounds: FrameBounds,
}

impl CornerFinder {
    pub fn new(bounds: FrameBounds) -> Self {
        Self { bounds }
    }

    /// Pairwise intersections that fall inside the frame, in pair order.
    pub fn candidates(&self, lines: &[LineSegment]) -> Vec<Point2D> {
        let mut points = Vec::new();
        for (i, a) in lines.iter().enumerate() {
            for b in &lines[i + 1..] {
                if let Some(p) = intersect(a, b) {
                    if self.bounds.contains(p.x, p.y) {
                        points.push(p);
                    }
                }
            }
        }
        points
    }

    /// Radially sorted corners, only when exactly four candidates survive.
    pub fn find(&self, lines: &[LineSegment]) -> Option<CornerSet> {
        let mut points = self.candidates(lines);
        if points.len() != 4 {
            debug!(
                "{} corner candidates from {} lines, need exactly 4",
                points.len(),
                lines.len()
            );
            return None;
        }

        radial_sort(&mut points);
        CornerSet::try_from(points).ok()
    }
}
