use super::config::EvalConfig;
use super::entities::*;
use super::geometry::{distance, resample, smooth};
use super::Point;

// Brute-force nearest neighbour. Ties go to the first point found.
fn nearest_distance(pt: &Point, candidates: &[Point]) -> f32 {
    let mut best = f32::INFINITY;
    for candidate in candidates {
        let d = distance(pt, candidate);
        if d < best {
            best = d;
        }
    }
    best
}

fn midpoint(a: &Point, b: &Point) -> Point {
    Point::new((a.x + b.x) / 2f32, (a.y + b.y) / 2f32)
}

/// Compares one freehand stroke against one reference path.
///
/// Both sides are resampled by arc length (the reference more densely than
/// the stroke). Coverage is the fraction of reference samples that have a
/// stroke sample within `threshold`; deviation is the mean distance from each
/// stroke sample to its nearest reference sample. If either side has fewer
/// than two points the result is the unscored sentinel.
pub fn evaluate(stroke: &[Point], reference: &[Point], threshold: f32, config: &EvalConfig) -> StrokeEvaluation {
    if stroke.len() < 2 || reference.len() < 2 {
        return StrokeEvaluation::unscored();
    }

    let smoothed;
    let stroke = if config.smooth_before_scoring {
        smoothed = smooth(stroke, config.smoothing_segments, config.smoothing_tension);
        &smoothed[..]
    } else {
        stroke
    };
    let ref_samples = resample(reference, config.reference_samples);
    let stroke_samples = resample(stroke, config.stroke_samples);
    if ref_samples.is_empty() || stroke_samples.is_empty() {
        return StrokeEvaluation::unscored();
    }

    // Coverage: how much of the reference got traced over
    let mut covered = 0;
    for ref_pt in &ref_samples {
        if nearest_distance(ref_pt, &stroke_samples) <= threshold {
            covered += 1;
        }
    }
    let coverage = covered as f32 / ref_samples.len() as f32;

    // Deviation: how far the stroke strays from the reference
    let mut deviation_sum = 0f32;
    for pt in &stroke_samples {
        deviation_sum += nearest_distance(pt, &ref_samples);
    }
    let average_deviation = deviation_sum / stroke_samples.len() as f32;

    // Per-segment hit/miss, only used to colour the ink
    let mut segments: Vec<Segment> = Vec::with_capacity(stroke_samples.len().saturating_sub(1));
    for i in 1..stroke_samples.len() {
        let from = stroke_samples[i - 1];
        let to = stroke_samples[i];
        let hit = nearest_distance(&midpoint(&from, &to), &ref_samples) <= threshold;
        segments.push(Segment {
            from: from,
            to: to,
            hit: hit,
        });
    }

    StrokeEvaluation {
        coverage: coverage,
        average_deviation: average_deviation,
        segments: segments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(from: (f32, f32), to: (f32, f32), count: usize) -> Vec<Point> {
        let mut res = Vec::with_capacity(count);
        for i in 0..count {
            let t = i as f32 / (count - 1) as f32;
            res.push(Point::new(from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t));
        }
        res
    }

    // A hand-drawn, slightly wobbly downstroke next to its reference
    static WOBBLY_STROKE: &str = "[{\"x\":101,\"y\":20},{\"x\":103,\"y\":41},{\"x\":99,\"y\":63},{\"x\":102,\"y\":88},{\"x\":98,\"y\":110},{\"x\":101,\"y\":135},{\"x\":104,\"y\":158},{\"x\":100,\"y\":181}]";
    static WOBBLY_REFERENCE: &str = "[{\"x\":100,\"y\":20},{\"x\":100,\"y\":180}]";

    #[test]
    fn test_degenerate_inputs() {
        let config = EvalConfig::default();
        let reference = line((0.0, 0.0), (100.0, 0.0), 2);
        for stroke in [vec![], vec![Point::new(5.0, 0.0)]] {
            let res = evaluate(&stroke, &reference, 5.0, &config);
            assert_eq!(res.coverage, 0.0);
            assert_eq!(res.average_deviation, f32::INFINITY);
            assert!(res.segments.is_empty());
            assert!(!res.is_scored());
        }
        let stroke = line((0.0, 0.0), (100.0, 0.0), 10);
        let res = evaluate(&stroke, &[Point::new(0.0, 0.0)], 5.0, &config);
        assert_eq!(res, StrokeEvaluation::unscored());
    }

    #[test]
    fn test_exact_trace() {
        let config = EvalConfig::default();
        let reference = line((0.0, 0.0), (100.0, 0.0), 160);
        let stroke = line((0.0, 0.0), (100.0, 0.0), 90);
        let res = evaluate(&stroke, &reference, 5.0, &config);
        assert_eq!(res.coverage, 1.0);
        // Only the gap between the two sample grids remains
        assert!(res.average_deviation < 0.35, "deviation {}", res.average_deviation);
        assert_eq!(res.segments.len(), config.stroke_samples - 1);
        assert!(res.segments.iter().all(|s| s.hit));
    }

    #[test]
    fn test_far_stroke() {
        let config = EvalConfig::default();
        let reference = line((0.0, 0.0), (100.0, 0.0), 160);
        let stroke = line((0.0, 50.0), (100.0, 50.0), 90);
        let res = evaluate(&stroke, &reference, 5.0, &config);
        assert_eq!(res.coverage, 0.0);
        assert!((res.average_deviation - 50.0).abs() < 1e-2);
        assert!(res.segments.iter().all(|s| !s.hit));
    }

    #[test]
    fn test_half_trace() {
        let mut config = EvalConfig::default();
        config.smooth_before_scoring = false;
        let reference = line((0.0, 0.0), (100.0, 0.0), 2);
        let stroke = line((0.0, 0.0), (50.0, 0.0), 2);
        let res = evaluate(&stroke, &reference, 1.0, &config);
        // Reference samples up to x = 51 are within reach
        assert!(res.coverage > 0.49 && res.coverage < 0.53, "coverage {}", res.coverage);
        assert!(res.average_deviation < 0.5);
    }

    #[test]
    fn test_scale_invariance() {
        let config = EvalConfig::default();
        let stroke: Vec<Point> = serde_json::from_str(WOBBLY_STROKE).unwrap();
        let reference: Vec<Point> = serde_json::from_str(WOBBLY_REFERENCE).unwrap();
        let base = evaluate(&stroke, &reference, 2.5, &config);
        assert!(base.coverage > 0.0 && base.coverage < 1.0);

        let k = 4.0;
        let scale = |pts: &Vec<Point>| -> Vec<Point> { pts.iter().map(|p| Point::new(p.x * k, p.y * k)).collect() };
        let scaled = evaluate(&scale(&stroke), &scale(&reference), 2.5 * k, &config);
        assert_eq!(scaled.coverage, base.coverage);
        assert!((scaled.average_deviation - base.average_deviation * k).abs() < 1e-2);
    }

    #[test]
    fn test_idempotent() {
        let config = EvalConfig::default();
        let stroke: Vec<Point> = serde_json::from_str(WOBBLY_STROKE).unwrap();
        let reference: Vec<Point> = serde_json::from_str(WOBBLY_REFERENCE).unwrap();
        let first = evaluate(&stroke, &reference, 3.0, &config);
        let second = evaluate(&stroke, &reference, 3.0, &config);
        assert_eq!(first, second);
    }
}
