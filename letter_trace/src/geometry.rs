use serde_derive::Serialize;

use super::catmull_rom::CatmullRomSegment;
use super::Point;

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

// Gets distance between two points
pub fn distance(a: &Point, b: &Point) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

// None for an empty slice
pub fn bounding_box(points: &[Point]) -> Option<BoundingBox> {
    if points.is_empty() {
        return None;
    }
    let mut res = BoundingBox {
        top: f32::MAX,
        bottom: f32::MIN,
        left: f32::MAX,
        right: f32::MIN,
    };
    for pt in points {
        res.left = f32::min(res.left, pt.x);
        res.right = f32::max(res.right, pt.x);
        res.top = f32::min(res.top, pt.y);
        res.bottom = f32::max(res.bottom, pt.y);
    }
    Some(res)
}

fn lerp_pressure(a: &Point, b: &Point, t: f32) -> Option<f32> {
    match (a.pressure, b.pressure) {
        (Some(pa), Some(pb)) => Some(pa + (pb - pa) * t),
        (pa, pb) => pa.or(pb),
    }
}

fn lerp(a: &Point, b: &Point, t: f32) -> Point {
    Point {
        x: a.x + (b.x - a.x) * t,
        y: a.y + (b.y - a.y) * t,
        pressure: lerp_pressure(a, b, t),
    }
}

/// Converts a polyline into `sample_count` points spaced evenly by arc
/// length. The first and last output points are the input's endpoints.
///
/// An empty input gives an empty output. If the path has no length (all
/// points coincide) the input is returned as is.
pub fn resample(points: &[Point], sample_count: usize) -> Vec<Point> {
    if points.is_empty() || sample_count == 0 {
        return Vec::new();
    }
    // Running arc length at each input point
    let mut cumulative: Vec<f32> = Vec::with_capacity(points.len());
    cumulative.push(0f32);
    for i in 1..points.len() {
        let prev = cumulative[i - 1];
        cumulative.push(prev + distance(&points[i - 1], &points[i]));
    }
    let total = cumulative[points.len() - 1];
    if total <= 0f32 || total.is_nan() {
        return points.to_vec();
    }
    if sample_count == 1 {
        return vec![points[0]];
    }

    let last = points.len() - 1;
    let mut res: Vec<Point> = Vec::with_capacity(sample_count);
    // Index of the input segment's end point; only ever moves forward
    let mut j = 1;
    for i in 0..sample_count {
        if i == sample_count - 1 {
            res.push(points[last]);
            break;
        }
        let target = total * (i as f32) / ((sample_count - 1) as f32);
        while j < last && cumulative[j] < target {
            j += 1;
        }
        let seg_len = cumulative[j] - cumulative[j - 1];
        let t = if seg_len > 0f32 {
            ((target - cumulative[j - 1]) / seg_len).clamp(0f32, 1f32)
        } else {
            0f32
        };
        res.push(lerp(&points[j - 1], &points[j], t));
    }
    res
}

/// Runs a uniform cardinal spline (classic Catmull-Rom at tension 0.5, not
/// the centripetal parameterization) through every input point, producing
/// `segments` output points per input span. The first and last points are
/// duplicated as phantom control points so the curve starts and ends on the
/// stroke's real endpoints.
///
/// Inputs of two points or fewer come back unchanged.
pub fn smooth(points: &[Point], segments: usize, tension: f32) -> Vec<Point> {
    if points.len() <= 2 || segments <= 1 {
        return points.to_vec();
    }
    let count = points.len();
    let mut res: Vec<Point> = Vec::with_capacity((count - 1) * segments + 1);
    res.push(points[0]);
    for i in 0..count - 1 {
        let p0 = if i == 0 { points[0] } else { points[i - 1] };
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = if i + 2 < count { points[i + 2] } else { points[count - 1] };
        let curve = CatmullRomSegment::new(p0, p1, p2, p3, tension);
        for step in 1..segments {
            let t = step as f32 / segments as f32;
            let mut pt = curve.point_at(t);
            pt.pressure = lerp_pressure(&p1, &p2, t);
            res.push(pt);
        }
        // Land exactly on the input point rather than on t = 1.0 of the cubic
        res.push(p2);
    }
    res
}
