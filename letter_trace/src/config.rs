use serde_derive::{Deserialize, Serialize};

// Reference paths are the ground truth, so they get the denser sampling
pub const REFERENCE_SAMPLES: usize = 160;
pub const STROKE_SAMPLES: usize = 90;
// Hit radius as a fraction of the shorter canvas side
pub const THRESHOLD_RATIO: f32 = 0.05;
pub const PENALTY_WEIGHT: f32 = 35.0;
pub const SMOOTHING_SEGMENTS: usize = 8;
pub const SMOOTHING_TENSION: f32 = 0.5;
// Pointer samples closer than this (canvas px) to the previous one are dropped
pub const MIN_POINT_DISTANCE: f32 = 0.5;

/// Tunable constants of the capture and scoring pipeline.
///
/// Every field is optional when deserializing, so a host can override just
/// the ones it cares about.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct EvalConfig {
    pub reference_samples: usize,
    pub stroke_samples: usize,
    pub threshold_ratio: f32,
    pub penalty_weight: f32,
    pub smoothing_segments: usize,
    pub smoothing_tension: f32,
    pub min_point_distance: f32,
    pub smooth_before_scoring: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            reference_samples: REFERENCE_SAMPLES,
            stroke_samples: STROKE_SAMPLES,
            threshold_ratio: THRESHOLD_RATIO,
            penalty_weight: PENALTY_WEIGHT,
            smoothing_segments: SMOOTHING_SEGMENTS,
            smoothing_tension: SMOOTHING_TENSION,
            min_point_distance: MIN_POINT_DISTANCE,
            smooth_before_scoring: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override() {
        let config: EvalConfig = serde_json::from_str("{\"penalty_weight\":20,\"stroke_samples\":64}").unwrap();
        assert_eq!(config.penalty_weight, 20.0);
        assert_eq!(config.stroke_samples, 64);
        assert_eq!(config.reference_samples, REFERENCE_SAMPLES);
        assert!(config.smooth_before_scoring);
    }

    #[test]
    fn test_empty_is_default() {
        let config: EvalConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EvalConfig::default());
    }
}
