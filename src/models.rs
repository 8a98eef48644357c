use imageproc::point::Point;

/// Index order that turns radially sorted corners into a fillable winding.
pub const POLYGON_ORDER: [usize; 4] = [0, 1, 3, 2];

/// Directed segment in image coordinates, as emitted by the line detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl LineSegment {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn is_vertical(&self) -> bool {
        self.x1 == self.x2
    }

    pub fn start(&self) -> Point<i32> {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point<i32> {
        Point::new(self.x2, self.y2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared distance from the origin, the key used to order corners.
    pub fn squared_norm(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Nearest integer pixel position.
    pub fn to_pixel(&self) -> Point<i32> {
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }
}

/// The four corners of a detected quadrilateral, in radial order.
///
/// A `CornerSet` can only be built from exactly four points; anything else is
/// rejected as a whole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerSet([Point2D; 4]);

impl CornerSet {
    pub fn points(&self) -> &[Point2D; 4] {
        &self.0
    }

    /// Polygon vertices for filling, reordered by [`POLYGON_ORDER`].
    pub fn polygon(&self) -> [Point<i32>; 4] {
        POLYGON_ORDER.map(|i| self.0[i].to_pixel())
    }
}

impl TryFrom<Vec<Point2D>> for CornerSet {
    type Error = Vec<Point2D>;

    fn try_from(points: Vec<Point2D>) -> Result<Self, Self::Error> {
        <[Point2D; 4]>::try_from(points).map(CornerSet)
    }
}

impl TryFrom<&[Point2D]> for CornerSet {
    type Error = usize;

    fn try_from(points: &[Point2D]) -> Result<Self, Self::Error> {
        <[Point2D; 4]>::try_from(points)
            .map(CornerSet)
            .map_err(|_| points.len())
    }
}

/// Visualization counterpart of an extended [`LineSegment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawableLine {
    pub start: Point<i32>,
    pub end: Point<i32>,
}

impl From<&LineSegment> for DrawableLine {
    fn from(segment: &LineSegment) -> Self {
        Self {
            start: segment.start(),
            end: segment.end(),
        }
    }
}
