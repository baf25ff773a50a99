use serde::{Deserialize, Serialize};

/// Integer pixel coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned pixel extent. `width`/`height` count pixels, so a single
/// point has a 1x1 box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Smallest box covering every point; empty input gives a zero box.
    pub fn enclosing(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };

        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }

        Self::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Integer center, `origin + extent / 2`.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// A simplified contour: ordered vertices plus the pixel box around them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Point>,
    bounds: BoundingBox,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        let bounds = BoundingBox::enclosing(&points);
        Self { points, bounds }
    }

    /// Use a bounding box computed by the contour extractor.
    pub fn with_bounds(points: Vec<Point>, bounds: BoundingBox) -> Self {
        Self { points, bounds }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn num_vertices(&self) -> usize {
        self.points.len()
    }

    /// True when every turn goes the same way. Collinear vertices are
    /// tolerated, a polygon with no turn at all is not convex.
    pub fn is_convex(&self) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }

        let mut sign = 0i64;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let c = self.points[(i + 2) % n];

            let cross = (b.x - a.x) as i64 * (c.y - b.y) as i64 - (b.y - a.y) as i64 * (c.x - b.x) as i64;
            if cross == 0 {
                continue;
            }
            if sign == 0 {
                sign = cross.signum();
            } else if sign != cross.signum() {
                return false;
            }
        }

        sign != 0
    }

    pub fn is_convex_quad(&self) -> bool {
        self.num_vertices() == 4 && self.is_convex()
    }
}

/// Offset of a pixel coordinate from the image center, scaled so the image
/// edges land near -1 and 1. The center is truncated to a whole pixel first;
/// a resolution below 2 has no off-center pixels and always gives 0.
pub fn normalize_offset(coord: i32, resolution: u32) -> f32 {
    let half = resolution / 2;
    if half == 0 {
        return 0.0;
    }
    let center = half as f32;
    (coord as f32 - center) / center
}

/// Pinhole-model distance to a plane whose visible extent is `side_length`
/// for a camera with the given viewing angle in degrees.
pub fn fov_distance(side_length: f64, viewing_angle: f64) -> f64 {
    (side_length / 2.0) / (viewing_angle.to_radians() / 2.0).tan()
}
