//! # recttrack - retro-reflective rectangle tracking
//!
//! Finds rectangular retro-reflective targets in camera frames and estimates
//! where they are relative to the camera.
//!
//! ## Pipeline
//!
//! - **Segmentation**: a pixel is lit when all of its RGB channels exceed
//!   the threshold; the mask is then eroded and dilated
//! - **Contours**: every border of the mask, simplified to a polygon
//! - **Filtering**: convex quadrilaterals above a minimum area, with targets
//!   nested inside another target removed
//! - **Geometry**: corner ordering, normalized offsets, range and a
//!   dimension-ratio bearing metric
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use recttrack::{process_frame, Frame, TargetReport, TrackerConfig};
//!
//! let config = TrackerConfig::default();
//! let frame = Frame::open("frame.jpg", &config)?;
//! let matches = process_frame(&frame, &config);
//!
//! for m in &matches {
//!     let range = m.distance(config.viewing_angle, config.target_height, config.camera_height);
//!     println!("({:.2}, {:.2}) at {:.1}", m.normalized_x, m.normalized_y, range);
//! }
//!
//! let report = TargetReport::from_matches(&matches, &config);
//! # Ok::<(), recttrack::TrackerError>(())
//! ```

mod contours;
mod error;
mod geometry;
mod image_impl;
mod postprocess;
mod report;
mod target;
mod tracker;
mod types;

// FFI module for C bindings
#[cfg(feature = "ffi")]
pub mod ffi;

pub use crate::contours::Contour;
pub use crate::error::{Result, TrackerError};
pub use crate::geometry::{fov_distance, normalize_offset, BoundingBox, Point, Polygon};
pub use crate::image_impl::{extract_contours, threshold_rgb};
pub use crate::postprocess::{remove_nested, ContourFilter};
pub use crate::report::TargetReport;
pub use crate::target::{Match, TARGET_HEIGHT, TARGET_WIDTH};
pub use crate::tracker::{process_frame, Frame};
pub use crate::types::{
    CameraModel, TrackerConfig, AXIS_206_VIEWING_ANGLE, AXIS_M1011_VIEWING_ANGLE, MAX_MORPHOLOGY_PASSES,
};

/// Filter one frame's contours into accepted matches.
pub fn filter_matches(contours: &[Contour], min_area: u32, image_width: u32, image_height: u32) -> Vec<Match<'_>> {
    ContourFilter::new(min_area).process(contours, image_width, image_height)
}
