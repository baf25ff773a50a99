//! A detected rectangular target and the range/bearing estimates derived
//! from its four corners.

use nalgebra::Point2;
use serde::Serialize;

use crate::geometry::{fov_distance, normalize_offset, Point, Polygon};

/// Physical width of the reflective target.
pub const TARGET_WIDTH: f64 = 24.0;
/// Physical height of the reflective target.
pub const TARGET_HEIGHT: f64 = 18.0;

pub const TOP_LEFT: usize = 0;
pub const TOP_RIGHT: usize = 1;
pub const BOTTOM_RIGHT: usize = 2;
pub const BOTTOM_LEFT: usize = 3;

/// One accepted quadrilateral. Corner order is fixed at construction:
/// top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match<'a> {
    pub polygon: &'a Polygon,
    pub points: [Point; 4],
    pub center: Point,
    pub normalized_x: f32,
    pub normalized_y: f32,
    image_width: u32,
    image_height: u32,
}

impl<'a> Match<'a> {
    /// Returns `None` unless `polygon` is a convex quadrilateral whose
    /// vertices land in four distinct corner slots.
    pub fn new(polygon: &'a Polygon, image_width: u32, image_height: u32) -> Option<Self> {
        if !polygon.is_convex_quad() {
            return None;
        }

        let center = polygon.bounds().center();
        let points = assign_corners(polygon.points(), center)?;

        Some(Self {
            polygon,
            points,
            center,
            normalized_x: normalize_offset(center.x, image_width),
            normalized_y: normalize_offset(center.y, image_height),
            image_width,
            image_height,
        })
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    pub fn top_left(&self) -> Point {
        self.points[TOP_LEFT]
    }

    pub fn bottom_right(&self) -> Point {
        self.points[BOTTOM_RIGHT]
    }

    /// True when `other` strictly encloses this match's diagonal corners.
    pub fn is_nested_in(&self, other: &Match<'_>) -> bool {
        let (tl, br) = (self.top_left(), self.bottom_right());
        let (otl, obr) = (other.top_left(), other.bottom_right());
        otl.x < tl.x && otl.y < tl.y && obr.x > br.x && obr.y > br.y
    }

    /// Apparent height in pixels, measured along the left edge.
    pub fn pixel_height(&self) -> f64 {
        let top = to_point2(self.points[TOP_LEFT]);
        let bottom = to_point2(self.points[BOTTOM_LEFT]);
        nalgebra::distance(&top, &bottom)
    }

    /// Distance from the lens to the target center.
    ///
    /// # Arguments
    /// * `viewing_angle` - camera viewing angle in degrees
    /// * `target_height` - height of the target center above the ground
    /// * `camera_height` - height of the lens above the ground
    ///
    /// Finite for any viewing angle strictly between 0 and 180 degrees, the
    /// range [`TrackerConfig::validate`](crate::TrackerConfig::validate)
    /// enforces. Outside it the result is infinite or NaN.
    pub fn distance(&self, viewing_angle: f64, target_height: f64, camera_height: f64) -> f64 {
        let visible_height = TARGET_HEIGHT * self.image_height as f64 / self.pixel_height();
        let plane_distance = fov_distance(visible_height, viewing_angle);

        let rise = (target_height - camera_height).abs();
        (rise.powi(2) + plane_distance.powi(2)).sqrt()
    }

    /// Width-to-height ratio over the top-left/bottom-right corner pair.
    ///
    /// This is a rough placeholder for the viewing angle relative to the
    /// target, see [`Match::skew_degrees`] for the trigonometric estimate.
    pub fn angle_from_target(&self) -> f64 {
        let (tl, br) = (self.top_left(), self.bottom_right());
        let width = ((tl.x as f64).powi(2) + (br.x as f64).powi(2)).sqrt();
        let height = ((tl.y as f64).powi(2) + (br.y as f64).powi(2)).sqrt();
        width / height
    }

    /// Experimental: angle in degrees between the optical axis and the target
    /// normal, from the ranges to the left and right edges and the known
    /// target width. `None` when the three lengths do not form a triangle.
    pub fn skew_degrees(&self, viewing_angle: f64) -> Option<f64> {
        let left = (self.points[BOTTOM_LEFT].y - self.points[TOP_LEFT].y) as f64;
        let right = (self.points[BOTTOM_RIGHT].y - self.points[TOP_RIGHT].y) as f64;
        if left <= 0.0 || right <= 0.0 {
            return None;
        }

        let image_height = self.image_height as f64;
        let left = fov_distance(image_height / left * TARGET_HEIGHT, viewing_angle);
        let right = fov_distance(image_height / right * TARGET_HEIGHT, viewing_angle);

        let target_theta = law_of_cosines(left, right, TARGET_WIDTH)?;
        let side_theta = law_of_cosines(TARGET_WIDTH, left, right)?;
        Some(90.0 - target_theta / 2.0 - side_theta)
    }
}

fn to_point2(p: Point) -> Point2<f64> {
    Point2::new(p.x as f64, p.y as f64)
}

/// Angle opposite `c`, in degrees.
fn law_of_cosines(a: f64, b: f64, c: f64) -> Option<f64> {
    let cos = (a.powi(2) + b.powi(2) - c.powi(2)) / (2.0 * a * b);
    if !(-1.0..=1.0).contains(&cos) {
        return None;
    }
    Some(cos.acos().to_degrees())
}

fn corner_slot(p: Point, center: Point) -> usize {
    match (p.x < center.x, p.y < center.y) {
        (true, true) => TOP_LEFT,
        (false, true) => TOP_RIGHT,
        (false, false) => BOTTOM_RIGHT,
        (true, false) => BOTTOM_LEFT,
    }
}

/// Bucket vertices by quadrant around `center`. Later vertices overwrite
/// earlier ones in the same slot, so a skewed quad can leave a slot empty.
fn assign_corners(vertices: &[Point], center: Point) -> Option<[Point; 4]> {
    let mut slots: [Option<Point>; 4] = [None; 4];
    for &p in vertices {
        slots[corner_slot(p, center)] = Some(p);
    }

    Some([slots[0]?, slots[1]?, slots[2]?, slots[3]?])
}
