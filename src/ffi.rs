// FFI bindings for C/C++/Java (JNI shims)
use std::os::raw::{c_char, c_double, c_float, c_int};
use std::slice;

use crate::{process_frame, Frame, Match, TargetReport, TrackerConfig};

/// C-compatible tracker configuration
#[repr(C)]
#[derive(Clone, Copy)]
pub struct CTrackerConfig {
    pub threshold: u8,
    pub min_area: u32,
    pub dilations: u32,
    pub erosions: u32,
    pub polygon_accuracy: c_double,
    pub viewing_angle: c_double,
    pub target_height: c_double,
    pub camera_height: c_double,
    pub target_speed: c_double,
}

impl From<TrackerConfig> for CTrackerConfig {
    fn from(cfg: TrackerConfig) -> Self {
        Self {
            threshold: cfg.threshold,
            min_area: cfg.min_area,
            dilations: cfg.dilations,
            erosions: cfg.erosions,
            polygon_accuracy: cfg.polygon_accuracy,
            viewing_angle: cfg.viewing_angle,
            target_height: cfg.target_height,
            camera_height: cfg.camera_height,
            target_speed: cfg.target_speed,
        }
    }
}

impl From<&CTrackerConfig> for TrackerConfig {
    fn from(cfg: &CTrackerConfig) -> Self {
        Self {
            threshold: cfg.threshold,
            min_area: cfg.min_area,
            dilations: cfg.dilations,
            erosions: cfg.erosions,
            polygon_accuracy: cfg.polygon_accuracy,
            viewing_angle: cfg.viewing_angle,
            target_height: cfg.target_height,
            camera_height: cfg.camera_height,
            target_speed: cfg.target_speed,
        }
    }
}

/// C-compatible match; corners are top-left, top-right, bottom-right,
/// bottom-left.
#[repr(C)]
pub struct CMatch {
    pub corner_x: [c_int; 4],
    pub corner_y: [c_int; 4],
    pub center_x: c_int,
    pub center_y: c_int,
    pub normalized_x: c_float,
    pub normalized_y: c_float,
    pub distance: c_double,
    pub angle: c_double,
}

/// C-compatible target report
#[repr(C)]
pub struct CTargetReport {
    pub targets_found: bool,
    pub target_x: c_double,
    pub target_distance: c_double,
    pub target_speed: c_double,
}

/// Default configuration
#[no_mangle]
pub extern "C" fn rtrk_config_default() -> CTrackerConfig {
    TrackerConfig::default().into()
}

/// Track targets in a packed RGB8 frame
///
/// # Safety
/// - config must point to a valid CTrackerConfig
/// - data must point to width * height * 3 readable bytes
/// - matches_out will be allocated and must be freed with rtrk_free_matches
/// - report_out may be null; otherwise it receives the frame's target report
#[no_mangle]
pub unsafe extern "C" fn rtrk_process_rgb(
    config: *const CTrackerConfig,
    width: u32,
    height: u32,
    data: *const u8,
    data_len: usize,
    matches_out: *mut *mut CMatch,
    count_out: *mut usize,
    report_out: *mut CTargetReport,
) -> c_int {
    if config.is_null() || data.is_null() || matches_out.is_null() || count_out.is_null() {
        return -1;
    }

    let cfg = TrackerConfig::from(&*config);
    if cfg.validate().is_err() {
        return -2;
    }

    let pixels = slice::from_raw_parts(data, data_len).to_vec();
    let frame = match Frame::from_rgb8(width, height, pixels, &cfg) {
        Ok(f) => f,
        Err(_) => return -3,
    };

    let matches = process_frame(&frame, &cfg);

    if !report_out.is_null() {
        let report = TargetReport::from_matches(&matches, &cfg);
        *report_out = CTargetReport {
            targets_found: report.targets_found,
            target_x: report.target_x,
            target_distance: report.target_distance,
            target_speed: report.target_speed,
        };
    }

    let c_matches = matches_to_c(&matches, &cfg).into_boxed_slice();
    *count_out = c_matches.len();
    *matches_out = Box::into_raw(c_matches) as *mut CMatch;

    0
}

/// Free matches returned from rtrk_process_rgb
///
/// # Safety
/// - matches must be a pointer returned from rtrk_process_rgb
/// - count must match the count returned with it
#[no_mangle]
pub unsafe extern "C" fn rtrk_free_matches(matches: *mut CMatch, count: usize) {
    if matches.is_null() {
        return;
    }

    drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(matches, count)));
}

/// Get library version
#[no_mangle]
pub extern "C" fn rtrk_version() -> *const c_char {
    static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
    VERSION.as_ptr() as *const c_char
}

fn matches_to_c(matches: &[Match<'_>], cfg: &TrackerConfig) -> Vec<CMatch> {
    matches
        .iter()
        .map(|m| CMatch {
            corner_x: m.points.map(|p| p.x),
            corner_y: m.points.map(|p| p.y),
            center_x: m.center.x,
            center_y: m.center.y,
            normalized_x: m.normalized_x,
            normalized_y: m.normalized_y,
            distance: m.distance(cfg.viewing_angle, cfg.target_height, cfg.camera_height),
            angle: m.angle_from_target(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_through_c_abi() {
        let mut cfg = rtrk_config_default();
        cfg.min_area = 1000;

        let (width, height) = (160u32, 120u32);
        let mut data = vec![0u8; (width * height * 3) as usize];
        for y in 20..100u32 {
            for x in 30..130u32 {
                let idx = ((y * width + x) * 3) as usize;
                data[idx..idx + 3].copy_from_slice(&[255, 255, 255]);
            }
        }

        let mut out: *mut CMatch = std::ptr::null_mut();
        let mut count = 0usize;
        let mut report = CTargetReport {
            targets_found: false,
            target_x: 0.0,
            target_distance: 0.0,
            target_speed: 0.0,
        };

        let rc = unsafe {
            rtrk_process_rgb(&cfg, width, height, data.as_ptr(), data.len(), &mut out, &mut count, &mut report)
        };
        assert_eq!(rc, 0);
        assert_eq!(count, 1);
        assert!(report.targets_found);
        assert_eq!(report.target_speed, 0.5);

        let first = unsafe { &*out };
        assert!(first.corner_x[0] < first.corner_x[2]);
        assert!(first.corner_y[0] < first.corner_y[2]);

        unsafe { rtrk_free_matches(out, count) };
    }

    #[test]
    fn rejects_short_buffers() {
        let cfg = rtrk_config_default();
        let data = vec![0u8; 10];
        let mut out: *mut CMatch = std::ptr::null_mut();
        let mut count = 0usize;
        let rc = unsafe {
            rtrk_process_rgb(&cfg, 64, 64, data.as_ptr(), data.len(), &mut out, &mut count, std::ptr::null_mut())
        };
        assert_eq!(rc, -3);
    }
}
