//! Chart geometry
//!
//! Pure point math shared by the renderers: even x spacing, value ranges,
//! and bezier smoothing for the consistency area.

/// Points per bezier segment, endpoints included
pub const CURVE_STEPS: usize = 12;

/// Padding above and below the weight range, in kg
pub const WEIGHT_PADDING: f64 = 2.0;

/// Index-spaced points: sample `i` sits at x = i
pub fn indexed_points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect()
}

/// Upper bound of the x axis for `len` evenly spaced samples.
/// A single sample still gets a unit-wide axis.
pub fn x_extent(len: usize) -> f64 {
    len.saturating_sub(1).max(1) as f64
}

/// y range for a weight chart: `[min - 2, max + 2]`
pub fn weight_y_range(weights: &[f64]) -> Option<(f64, f64)> {
    if weights.is_empty() {
        return None;
    }
    let min = weights.iter().copied().fold(f64::INFINITY, f64::min);
    let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min - WEIGHT_PADDING, max + WEIGHT_PADDING))
}

/// Map `value` from `[lo, hi]` onto `[out_lo, out_hi]`
pub fn scale_linear(value: f64, (lo, hi): (f64, f64), (out_lo, out_hi): (f64, f64)) -> f64 {
    if hi == lo {
        return (out_lo + out_hi) / 2.0;
    }
    out_lo + (value - lo) / (hi - lo) * (out_hi - out_lo)
}

fn cubic(p0: f64, c1: f64, c2: f64, p1: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * c1 + 3.0 * u * t * t * c2 + t * t * t * p1
}

/// Smooth a polyline with cubic bezier segments. Both control points of a
/// segment sit at the horizontal midpoint, at the heights of its two ends,
/// so the curve never overshoots the sample values.
pub fn smooth_path(points: &[(f64, f64)], steps: usize) -> Vec<(f64, f64)> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    let steps = steps.max(1);

    let mut path = vec![first];
    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        let mid = x0 + (x1 - x0) / 2.0;
        for s in 1..=steps {
            let t = s as f64 / steps as f64;
            path.push((cubic(x0, mid, mid, x1, t), cubic(y0, y0, y1, y1, t)));
        }
    }
    path
}

/// Close a path down to `baseline` so it can be filled
pub fn area_polygon(path: &[(f64, f64)], baseline: f64) -> Vec<(f64, f64)> {
    let (Some(&(first_x, _)), Some(&(last_x, _))) = (path.first(), path.last()) else {
        return Vec::new();
    };
    let mut polygon = Vec::with_capacity(path.len() + 2);
    polygon.push((first_x, baseline));
    polygon.extend_from_slice(path);
    polygon.push((last_x, baseline));
    polygon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_range_is_padded() {
        assert_eq!(weight_y_range(&[80.0, 78.5, 81.0]), Some((76.5, 83.0)));
        assert_eq!(weight_y_range(&[]), None);
    }

    #[test]
    fn test_x_extent() {
        assert_eq!(x_extent(31), 30.0);
        assert_eq!(x_extent(1), 1.0);
        assert_eq!(x_extent(0), 1.0);
    }

    #[test]
    fn test_scale_linear() {
        assert_eq!(scale_linear(0.5, (0.0, 1.0), (300.0, 100.0)), 200.0);
        assert_eq!(scale_linear(4.0, (4.0, 4.0), (0.0, 10.0)), 5.0);
    }

    #[test]
    fn test_smooth_path_passes_through_samples() {
        let points = indexed_points(&[0.0, 1.0, 0.25]);
        let path = smooth_path(&points, 4);
        assert_eq!(path.len(), 1 + 2 * 4);
        assert_eq!(path[0], (0.0, 0.0));
        assert!((path[4].0 - 1.0).abs() < 1e-12 && (path[4].1 - 1.0).abs() < 1e-12);
        assert!((path[8].0 - 2.0).abs() < 1e-12 && (path[8].1 - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_smooth_path_stays_within_sample_range() {
        let path = smooth_path(&indexed_points(&[0.0, 1.0, 0.0, 1.0]), CURVE_STEPS);
        assert!(path.iter().all(|&(_, y)| (0.0..=1.0).contains(&y)));
        assert!(path.windows(2).all(|w| w[1].0 >= w[0].0));
    }

    #[test]
    fn test_area_polygon_closes_on_baseline() {
        let polygon = area_polygon(&[(0.0, 0.5), (1.0, 0.75)], 0.0);
        assert_eq!(polygon, vec![(0.0, 0.0), (0.0, 0.5), (1.0, 0.75), (1.0, 0.0)]);
        assert!(area_polygon(&[], 0.0).is_empty());
    }
}
