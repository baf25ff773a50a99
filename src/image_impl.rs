//! Vision backend: segmentation and contour extraction, with a pure Rust
//! implementation (default) and an OpenCV one.

use image::{GrayImage, Luma, RgbImage};

use crate::contours::Contour;
use crate::error::Result;
use crate::types::TrackerConfig;

#[cfg(feature = "use-opencv")]
pub use opencv_impl::*;

#[cfg(not(feature = "use-opencv"))]
pub use rust_impl::*;

/// Lit where red, green and blue are all strictly above `threshold`.
pub fn threshold_rgb(image: &RgbImage, threshold: u8) -> GrayImage {
    let (width, height) = image.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        if r > threshold && g > threshold && b > threshold {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Threshold, clean up and trace one frame. Fails on a configuration that
/// does not pass [`TrackerConfig::validate`].
pub fn extract_contours(image: &RgbImage, cfg: &TrackerConfig) -> Result<Vec<Contour>> {
    cfg.validate()?;
    let mask = threshold_rgb(image, cfg.threshold);
    trace_contours(mask, cfg)
}

// Pure Rust implementation
#[cfg(not(feature = "use-opencv"))]
mod rust_impl {
    use image::GrayImage;
    use imageproc::distance_transform::Norm;
    use imageproc::morphology::{dilate, erode};

    use crate::contours::Contour;
    use crate::error::{Result, TrackerError};
    use crate::types::TrackerConfig;

    /// Erode then dilate with a 3x3 square element, once per iteration.
    pub fn morphology(mask: GrayImage, erosions: u8, dilations: u8) -> GrayImage {
        // n passes of a 3x3 square equal one pass at chessboard radius n
        let mut mask = mask;
        if erosions > 0 {
            mask = erode(&mask, Norm::LInf, erosions);
        }
        if dilations > 0 {
            mask = dilate(&mask, Norm::LInf, dilations);
        }
        mask
    }

    fn passes(count: u32, name: &str) -> Result<u8> {
        u8::try_from(count).map_err(|_| TrackerError::Config(format!("too many {name}: {count}")))
    }

    /// Every border in the mask, outer and hole alike.
    pub fn trace_contours(mask: GrayImage, cfg: &TrackerConfig) -> Result<Vec<Contour>> {
        let erosions = passes(cfg.erosions, "erosions")?;
        let dilations = passes(cfg.dilations, "dilations")?;
        let mask = morphology(mask, erosions, dilations);
        let borders = imageproc::contours::find_contours::<i32>(&mask);

        Ok(borders
            .iter()
            .map(|border| Contour::from_border(&border.points, cfg.polygon_accuracy))
            .collect())
    }
}

// OpenCV implementation
#[cfg(feature = "use-opencv")]
mod opencv_impl {
    use image::GrayImage;
    use opencv::{core, imgproc, prelude::*};

    use crate::contours::Contour;
    use crate::error::Result;
    use crate::geometry::{BoundingBox, Point, Polygon};
    use crate::types::TrackerConfig;

    fn to_mat(mask: &GrayImage) -> Result<core::Mat> {
        let (width, height) = mask.dimensions();
        let mut mat = core::Mat::new_rows_cols_with_default(
            height as i32,
            width as i32,
            core::CV_8UC1,
            core::Scalar::all(0.0),
        )?;
        for (x, y, pixel) in mask.enumerate_pixels() {
            *mat.at_2d_mut::<u8>(y as i32, x as i32)? = pixel[0];
        }
        Ok(mat)
    }

    fn to_bounds(rect: core::Rect) -> BoundingBox {
        BoundingBox::new(rect.x, rect.y, rect.width, rect.height)
    }

    pub fn trace_contours(mask: GrayImage, cfg: &TrackerConfig) -> Result<Vec<Contour>> {
        let mut mat = to_mat(&mask)?;
        let kernel = core::Mat::default();
        let border_value = imgproc::morphology_default_border_value()?;

        if cfg.erosions > 0 {
            let mut eroded = core::Mat::default();
            imgproc::erode(
                &mat,
                &mut eroded,
                &kernel,
                core::Point::new(-1, -1),
                cfg.erosions as i32,
                core::BORDER_CONSTANT,
                border_value,
            )?;
            mat = eroded;
        }

        if cfg.dilations > 0 {
            let mut dilated = core::Mat::default();
            imgproc::dilate(
                &mat,
                &mut dilated,
                &kernel,
                core::Point::new(-1, -1),
                cfg.dilations as i32,
                core::BORDER_CONSTANT,
                border_value,
            )?;
            mat = dilated;
        }

        let mut borders = core::Vector::<core::Vector<core::Point>>::new();
        imgproc::find_contours(
            &mat,
            &mut borders,
            imgproc::RETR_LIST,
            imgproc::CHAIN_APPROX_SIMPLE,
            core::Point::new(0, 0),
        )?;

        let mut contours = Vec::with_capacity(borders.len());
        for border in borders.iter() {
            let bounds = to_bounds(imgproc::bounding_rect(&border)?);

            let mut approx = core::Vector::<core::Point>::new();
            imgproc::approx_poly_dp(&border, &mut approx, cfg.polygon_accuracy, true)?;
            let vertices: Vec<Point> = approx.iter().map(|p| Point::new(p.x, p.y)).collect();
            let polygon_bounds = to_bounds(imgproc::bounding_rect(&approx)?);

            contours.push(Contour::new(bounds, Polygon::with_bounds(vertices, polygon_bounds)));
        }

        Ok(contours)
    }
}
