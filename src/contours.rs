// Contour records handed from the vision backend to the filter.

use imageproc::geometry::approximate_polygon_dp;
use nalgebra::Vector2;
use serde::Serialize;

use crate::geometry::{BoundingBox, Point, Polygon};

/// One extracted border: the pixel box of the raw border and its
/// simplified polygon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contour {
    pub bounds: BoundingBox,
    pub polygon: Polygon,
}

impl Contour {
    pub fn new(bounds: BoundingBox, polygon: Polygon) -> Self {
        Self { bounds, polygon }
    }

    /// Contour whose raw border is the polygon itself.
    pub fn from_polygon(polygon: Polygon) -> Self {
        Self {
            bounds: polygon.bounds(),
            polygon,
        }
    }

    /// Simplify a closed pixel border with Douglas-Peucker at `epsilon`
    /// pixels. `epsilon` must be positive.
    pub fn from_border(border: &[imageproc::point::Point<i32>], epsilon: f64) -> Self {
        let raw: Vec<Point> = border.iter().map(|p| Point::new(p.x, p.y)).collect();
        let bounds = BoundingBox::enclosing(&raw);

        if raw.len() < 3 {
            return Self::new(bounds, Polygon::new(raw));
        }

        let simplified = approximate_polygon_dp(border, epsilon, false);
        let vertices: Vec<Point> = simplified.iter().map(|p| Point::new(p.x, p.y)).collect();
        Self::new(bounds, Polygon::new(close_ring(vertices, epsilon)))
    }

    pub fn len(&self) -> usize {
        self.polygon.num_vertices()
    }

    pub fn is_empty(&self) -> bool {
        self.polygon.num_vertices() == 0
    }
}

/// The border is simplified as an open curve, so its start and end pixels
/// always survive even when they sit on a straight edge. Drop them while
/// they lie within `epsilon` of the chord joining their ring neighbours.
fn close_ring(mut pts: Vec<Point>, epsilon: f64) -> Vec<Point> {
    while pts.len() > 3 {
        let n = pts.len();
        if !near_chord(pts[n - 1], pts[n - 2], pts[0], epsilon) {
            break;
        }
        pts.pop();
    }

    while pts.len() > 3 {
        let n = pts.len();
        if !near_chord(pts[0], pts[n - 1], pts[1], epsilon) {
            break;
        }
        pts.remove(0);
    }

    pts
}

fn near_chord(p: Point, a: Point, b: Point, epsilon: f64) -> bool {
    let ab = Vector2::new((b.x - a.x) as f64, (b.y - a.y) as f64);
    let ap = Vector2::new((p.x - a.x) as f64, (p.y - a.y) as f64);

    let len = ab.norm();
    let dist = if len < f64::EPSILON {
        ap.norm()
    } else {
        ab.perp(&ap).abs() / len
    };
    dist <= epsilon
}
