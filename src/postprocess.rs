//! Candidate filtering: turns one frame's contour list into accepted
//! target matches.

use crate::contours::Contour;
use crate::target::Match;

pub struct ContourFilter {
    pub min_area: u32,
}

impl ContourFilter {
    pub fn new(min_area: u32) -> Self {
        Self { min_area }
    }

    /// Accepted, de-duplicated matches in contour order. Shapes that fail a
    /// check are dropped silently.
    pub fn process<'a>(&self, contours: &'a [Contour], image_width: u32, image_height: u32) -> Vec<Match<'a>> {
        let mut matches = Vec::new();

        for (idx, contour) in contours.iter().enumerate() {
            if contour.bounds.area() < self.min_area as i64 {
                log::trace!("contour {} rejected: area {} < {}", idx, contour.bounds.area(), self.min_area);
                continue;
            }

            let polygon = &contour.polygon;
            if !polygon.is_convex_quad() {
                log::trace!(
                    "contour {} rejected: {} vertices, convex={}",
                    idx,
                    polygon.num_vertices(),
                    polygon.is_convex()
                );
                continue;
            }

            match Match::new(polygon, image_width, image_height) {
                Some(m) => matches.push(m),
                None => log::trace!("contour {} rejected: corner slots not filled", idx),
            }
        }

        let accepted = matches.len();
        let matches = remove_nested(matches);
        log::debug!(
            "{} contours -> {} quads -> {} matches",
            contours.len(),
            accepted,
            matches.len()
        );

        matches
    }
}

/// Drop every match strictly enclosed by another one, e.g. the inner edge of
/// a hollow target. Nesting is transitive, so checking against the full set
/// gives the same result as removing one at a time.
pub fn remove_nested(matches: Vec<Match<'_>>) -> Vec<Match<'_>> {
    let nested: Vec<bool> = matches
        .iter()
        .map(|m| matches.iter().any(|other| m.is_nested_in(other)))
        .collect();

    matches
        .into_iter()
        .zip(nested)
        .filter_map(|(m, is_nested)| (!is_nested).then_some(m))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Polygon};

    fn contour(pts: &[(i32, i32)]) -> Contour {
        Contour::from_polygon(Polygon::new(pts.iter().copied().map(Point::from).collect()))
    }

    fn square(x: i32, y: i32, side: i32) -> Contour {
        contour(&[(x, y), (x + side - 1, y), (x + side - 1, y + side - 1), (x, y + side - 1)])
    }

    #[test]
    fn area_threshold() {
        let contours = vec![square(0, 0, 50), square(200, 200, 120)];
        let matches = ContourFilter::new(10_000).process(&contours, 640, 480);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].top_left(), Point::new(200, 200));
    }

    #[test]
    fn rejects_non_convex_and_non_quads() {
        let contours = vec![
            contour(&[(0, 0), (200, 100), (0, 200), (80, 100)]),
            contour(&[(0, 0), (200, 0), (200, 200), (100, 250), (0, 200)]),
            contour(&[(0, 0), (200, 0), (100, 200)]),
        ];
        assert!(ContourFilter::new(100).process(&contours, 640, 480).is_empty());
    }

    #[test]
    fn inner_edge_of_hollow_target_is_removed() {
        let contours = vec![
            contour(&[(10, 10), (90, 10), (90, 90), (10, 90)]),
            contour(&[(0, 0), (100, 0), (100, 100), (0, 100)]),
        ];
        let matches = ContourFilter::new(100).process(&contours, 640, 480);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].top_left(), Point::new(0, 0));
        assert_eq!(matches[0].bottom_right(), Point::new(100, 100));
    }

    #[test]
    fn chains_of_nesting_keep_only_outermost() {
        let contours = vec![
            contour(&[(20, 20), (80, 20), (80, 80), (20, 80)]),
            contour(&[(10, 10), (90, 10), (90, 90), (10, 90)]),
            contour(&[(0, 0), (100, 0), (100, 100), (0, 100)]),
            contour(&[(300, 50), (400, 50), (400, 150), (300, 150)]),
        ];
        let matches = ContourFilter::new(100).process(&contours, 640, 480);

        let corners: Vec<Point> = matches.iter().map(|m| m.top_left()).collect();
        assert_eq!(corners, vec![Point::new(0, 0), Point::new(300, 50)]);
    }

    #[test]
    fn identical_quads_both_survive() {
        // strict containment only
        let contours = vec![square(0, 0, 120), square(0, 0, 120)];
        assert_eq!(ContourFilter::new(100).process(&contours, 640, 480).len(), 2);
    }

    #[test]
    fn idempotent() {
        let contours = vec![
            square(0, 0, 150),
            square(20, 20, 110),
            square(300, 200, 130),
            contour(&[(0, 0), (200, 100), (0, 200), (80, 100)]),
        ];
        let filter = ContourFilter::new(1000);
        let first = filter.process(&contours, 640, 480);
        let second = filter.process(&contours, 640, 480);
        assert_eq!(first, second);
    }
}
