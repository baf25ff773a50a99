use serde::{Deserialize, Serialize};

use crate::target::Match;
use crate::types::TrackerConfig;

/// Values published to the robot for each frame. Field names follow the
/// network-table keys the robot code reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetReport {
    pub targets_found: bool,
    pub target_x: f64,
    pub target_distance: f64,
    pub target_speed: f64,
}

impl TargetReport {
    /// Built from the first match only; with no match the offset and
    /// distance are reported as zero.
    pub fn from_matches(matches: &[Match<'_>], cfg: &TrackerConfig) -> Self {
        match matches.first() {
            Some(m) => Self {
                targets_found: true,
                target_x: m.normalized_x as f64,
                target_distance: m.distance(cfg.viewing_angle, cfg.target_height, cfg.camera_height),
                target_speed: cfg.target_speed,
            },
            None => Self {
                targets_found: false,
                target_x: 0.0,
                target_distance: 0.0,
                target_speed: cfg.target_speed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Polygon};

    #[test]
    fn no_targets() {
        let cfg = TrackerConfig::default();
        let report = TargetReport::from_matches(&[], &cfg);
        assert_eq!(
            report,
            TargetReport {
                targets_found: false,
                target_x: 0.0,
                target_distance: 0.0,
                target_speed: 0.5,
            }
        );
    }

    #[test]
    fn first_match_is_published() {
        let cfg = TrackerConfig::default();
        let left = Polygon::new(vec![Point::new(0, 100), Point::new(160, 100), Point::new(160, 220), Point::new(0, 220)]);
        let right = Polygon::new(vec![Point::new(400, 100), Point::new(560, 100), Point::new(560, 220), Point::new(400, 220)]);
        let matches = vec![
            Match::new(&left, 640, 480).unwrap(),
            Match::new(&right, 640, 480).unwrap(),
        ];

        let report = TargetReport::from_matches(&matches, &cfg);
        assert!(report.targets_found);
        assert_eq!(report.target_x, matches[0].normalized_x as f64);
        assert_eq!(report.target_distance, matches[0].distance(43.5, 89.0, 36.0));
        assert_eq!(report.target_speed, 0.5);
    }

    #[test]
    fn distance_is_finite_across_valid_angles() {
        let p = Polygon::new(vec![Point::new(0, 100), Point::new(160, 100), Point::new(160, 220), Point::new(0, 220)]);
        let matches = vec![Match::new(&p, 640, 480).unwrap()];

        for viewing_angle in [0.01, 43.5, 47.0, 179.99] {
            let cfg = TrackerConfig {
                viewing_angle,
                ..TrackerConfig::default()
            };
            assert!(cfg.validate().is_ok());
            let report = TargetReport::from_matches(&matches, &cfg);
            assert!(report.target_distance.is_finite(), "angle {viewing_angle}");
        }

        let cfg = TrackerConfig {
            viewing_angle: 0.0,
            ..TrackerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn serializes_with_table_keys() {
        let report = TargetReport::from_matches(&[], &TrackerConfig::default());
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["targetsFound"], false);
        assert!(json.get("targetDistance").is_some());
        assert!(json.get("targetSpeed").is_some());
    }
}
