use std::path::Path;
use std::time::Instant;

use image::RgbImage;

use crate::contours::Contour;
use crate::error::{Result, TrackerError};
use crate::image_impl::extract_contours;
use crate::postprocess::ContourFilter;
use crate::target::Match;
use crate::types::TrackerConfig;

/// Contours of one camera frame together with its resolution. Matches
/// borrow from the frame, so it lives until the next frame replaces it.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub contours: Vec<Contour>,
    pub elapse: f64,
}

impl Frame {
    /// Wrap contours produced by an external vision step.
    pub fn from_contours(width: u32, height: u32, contours: Vec<Contour>) -> Self {
        Self {
            width,
            height,
            contours,
            elapse: 0.0,
        }
    }

    pub fn from_rgb(image: &RgbImage, cfg: &TrackerConfig) -> Result<Self> {
        let start = Instant::now();
        let (width, height) = image.dimensions();
        let contours = extract_contours(image, cfg)?;
        let elapse = start.elapsed().as_secs_f64();

        log::debug!(
            "{}x{} frame: {} contours in {:.3} ms",
            width,
            height,
            contours.len(),
            elapse * 1000.0
        );

        Ok(Self {
            width,
            height,
            contours,
            elapse,
        })
    }

    /// Tightly packed RGB8 rows, as delivered by the camera decoder.
    pub fn from_rgb8(width: u32, height: u32, data: Vec<u8>, cfg: &TrackerConfig) -> Result<Self> {
        let image = RgbImage::from_raw(width, height, data).ok_or_else(|| {
            TrackerError::Image(format!("buffer too small for a {}x{} RGB8 image", width, height))
        })?;
        Self::from_rgb(&image, cfg)
    }

    pub fn open<P: AsRef<Path>>(path: P, cfg: &TrackerConfig) -> Result<Self> {
        let image = image::open(path)?.to_rgb8();
        Self::from_rgb(&image, cfg)
    }
}

/// Accepted targets for one frame.
///
/// `cfg` is not validated here. Distances derived from the matches are only
/// finite for a configuration that passes [`TrackerConfig::validate`], which
/// frames built from images already require.
pub fn process_frame<'a>(frame: &'a Frame, cfg: &TrackerConfig) -> Vec<Match<'a>> {
    ContourFilter::new(cfg.min_area).process(&frame.contours, frame.width, frame.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use image::Rgb;

    /// Bright hollow rectangle: outer corners (x0, y0)-(x1, y1) inclusive,
    /// walls `wall` pixels thick.
    fn hollow_target(x0: u32, y0: u32, x1: u32, y1: u32, wall: u32) -> RgbImage {
        RgbImage::from_fn(320, 240, |x, y| {
            let inside = (x0..=x1).contains(&x) && (y0..=y1).contains(&y);
            let in_hole = (x0 + wall..=x1 - wall).contains(&x) && (y0 + wall..=y1 - wall).contains(&y);
            if inside && !in_hole {
                Rgb([255, 255, 255])
            } else {
                Rgb([20, 20, 20])
            }
        })
    }

    fn test_config() -> TrackerConfig {
        TrackerConfig {
            min_area: 1000,
            polygon_accuracy: 4.0,
            ..TrackerConfig::default()
        }
    }

    #[test]
    fn hollow_target_yields_one_match() {
        let cfg = test_config();
        let frame = Frame::from_rgb(&hollow_target(40, 40, 200, 160, 12), &cfg).unwrap();
        // outer border and hole border
        assert_eq!(frame.contours.len(), 2);

        let matches = process_frame(&frame, &cfg);
        assert_eq!(matches.len(), 1);

        // one dilation pass grows the outer edge by a pixel
        let tl = matches[0].top_left();
        let br = matches[0].bottom_right();
        assert!((tl.x - 39).abs() <= 2 && (tl.y - 39).abs() <= 2, "{:?}", tl);
        assert!((br.x - 201).abs() <= 2 && (br.y - 161).abs() <= 2, "{:?}", br);
    }

    #[test]
    fn small_blobs_are_ignored() {
        let cfg = test_config();
        let frame = Frame::from_rgb(&hollow_target(10, 10, 30, 30, 4), &cfg).unwrap();
        assert!(process_frame(&frame, &cfg).is_empty());
    }

    #[test]
    fn repeated_processing_is_identical() {
        let cfg = test_config();
        let frame = Frame::from_rgb(&hollow_target(60, 50, 250, 200, 10), &cfg).unwrap();
        assert_eq!(process_frame(&frame, &cfg), process_frame(&frame, &cfg));
    }

    #[test]
    fn external_contours() {
        let quad = crate::geometry::Polygon::new(vec![
            Point::new(100, 100),
            Point::new(260, 100),
            Point::new(260, 220),
            Point::new(100, 220),
        ]);
        let frame = Frame::from_contours(640, 480, vec![Contour::from_polygon(quad)]);
        let matches = process_frame(&frame, &TrackerConfig::default());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].center, Point::new(180, 160));
    }

    #[test]
    fn raw_buffer_size_is_checked() {
        let err = Frame::from_rgb8(10, 10, vec![0; 20], &TrackerConfig::default()).unwrap_err();
        assert!(matches!(err, TrackerError::Image(_)));
    }
}
