use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// Horizontal viewing angle of the Axis M1011, in degrees.
pub const AXIS_M1011_VIEWING_ANGLE: f64 = 43.5;
/// Horizontal viewing angle of the Axis 206, in degrees.
pub const AXIS_206_VIEWING_ANGLE: f64 = 47.0;

/// Upper bound on erosion and dilation passes, the largest structuring
/// radius the pure Rust backend accepts.
pub const MAX_MORPHOLOGY_PASSES: u32 = u8::MAX as u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraModel {
    M1011,
    Axis206,
}

impl CameraModel {
    pub fn viewing_angle(self) -> f64 {
        match self {
            CameraModel::M1011 => AXIS_M1011_VIEWING_ANGLE,
            CameraModel::Axis206 => AXIS_206_VIEWING_ANGLE,
        }
    }
}

/// Per-frame tracking parameters. The host owns persistence; this value is
/// passed in unchanged for every frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Per-channel brightness threshold; a pixel is lit when all three
    /// channels are strictly above it.
    pub threshold: u8,
    /// Minimum contour bounding-box area in pixels.
    pub min_area: u32,
    pub dilations: u32,
    pub erosions: u32,
    /// Douglas-Peucker epsilon in pixels.
    pub polygon_accuracy: f64,
    /// Camera viewing angle in degrees.
    pub viewing_angle: f64,
    /// Height of the target center above the ground.
    pub target_height: f64,
    /// Height of the camera lens above the ground.
    pub camera_height: f64,
    /// Passed through to the target report unchanged.
    pub target_speed: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            threshold: 250,
            min_area: 10_000,
            dilations: 1,
            erosions: 0,
            polygon_accuracy: 10.0,
            viewing_angle: AXIS_M1011_VIEWING_ANGLE,
            target_height: 89.0,
            camera_height: 36.0,
            target_speed: 0.5,
        }
    }
}

impl TrackerConfig {
    pub fn for_camera(camera: CameraModel) -> Self {
        Self {
            viewing_angle: camera.viewing_angle(),
            ..Self::default()
        }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: TrackerConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.viewing_angle > 0.0 && self.viewing_angle < 180.0) {
            return Err(TrackerError::Config(format!(
                "viewing_angle must be in (0, 180) degrees, got {}",
                self.viewing_angle
            )));
        }
        if !(self.polygon_accuracy > 0.0) {
            return Err(TrackerError::Config(format!(
                "polygon_accuracy must be positive, got {}",
                self.polygon_accuracy
            )));
        }
        if self.erosions > MAX_MORPHOLOGY_PASSES || self.dilations > MAX_MORPHOLOGY_PASSES {
            return Err(TrackerError::Config(format!(
                "erosions and dilations must be at most {}, got {} and {}",
                MAX_MORPHOLOGY_PASSES, self.erosions, self.dilations
            )));
        }
        if !self.target_height.is_finite() || !self.camera_height.is_finite() {
            return Err(TrackerError::Config(
                "target_height and camera_height must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
