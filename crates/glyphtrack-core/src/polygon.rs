//! Metrics over a closed polygon given by its vertices (usually the 4
//! corners of a detected glyph).
//!
//! Vertices are taken cyclically: the last one connects back to the first.

use nalgebra::Point2;

#[inline]
fn cross_terms(
    points: &[Point2<i32>],
) -> impl Iterator<Item = (Point2<f64>, Point2<f64>, f64)> + '_ {
    let n = points.len();
    (0..n).map(move |i| {
        let a = points[i].cast::<f64>();
        let b = points[(i + 1) % n].cast::<f64>();
        (a, b, a.x * b.y - b.x * a.y)
    })
}

/// Shoelace area keeping the winding sign (positive for counter-clockwise
/// vertices in a `y`-up frame).
pub fn signed_area(points: &[Point2<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    0.5 * cross_terms(points).map(|(_, _, c)| c).sum::<f64>()
}

/// Polygon area, always non-negative regardless of winding.
pub fn area(points: &[Point2<i32>]) -> f64 {
    signed_area(points).abs()
}

/// Circumference of the circle whose area equals the polygon area.
///
/// This is *not* the sum of edge lengths; it is the size measure the
/// downstream consumers were built around.
pub fn perimeter(points: &[Point2<i32>]) -> f64 {
    ((4.0 / std::f64::consts::PI) * area(points)).sqrt() * std::f64::consts::PI
}

/// Area-weighted polygon centroid.
///
/// The accumulated moments are divided by `6 * area` (unsigned); if that
/// yields a negative `x` the polygon was wound the other way and both
/// coordinates are negated. This only recovers the true centroid for
/// polygons in the positive quadrant, which is where image points live.
///
/// Returns `None` for polygons with fewer than 3 vertices or zero area.
pub fn centroid(points: &[Point2<i32>]) -> Option<Point2<f64>> {
    let a = area(points);
    if points.len() < 3 || a <= f64::EPSILON {
        return None;
    }

    let (mut x, mut y) = (0.0, 0.0);
    for (p, q, c) in cross_terms(points) {
        x += (p.x + q.x) * c;
        y += (p.y + q.y) * c;
    }
    x /= 6.0 * a;
    y /= 6.0 * a;

    if x < 0.0 {
        x = -x;
        y = -y;
    }
    Some(Point2::new(x, y))
}

/// Arithmetic mean of the vertices.
pub fn center_of_gravity(points: &[Point2<i32>]) -> Option<Point2<f64>> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x as f64, sy + p.y as f64));
    Some(Point2::new(sx / n, sy / n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_square() -> [Point2<i32>; 4] {
        [
            Point2::new(0, 0),
            Point2::new(1, 0),
            Point2::new(1, 1),
            Point2::new(0, 1),
        ]
    }

    #[test]
    fn unit_square_area_and_centroid() {
        let sq = unit_square();
        assert_abs_diff_eq!(area(&sq), 1.0);
        let c = centroid(&sq).expect("non-degenerate");
        assert_abs_diff_eq!(c.x, 0.5);
        assert_abs_diff_eq!(c.y, 0.5);
    }

    #[test]
    fn area_ignores_winding() {
        let quad = [
            Point2::new(120, 80),
            Point2::new(260, 95),
            Point2::new(240, 230),
            Point2::new(110, 210),
        ];
        let mut reversed = quad;
        reversed.reverse();

        assert!(area(&quad) > 0.0);
        assert_abs_diff_eq!(area(&quad), area(&reversed));
        assert_abs_diff_eq!(signed_area(&quad), -signed_area(&reversed));
    }

    #[test]
    fn centroid_of_reversed_quad_matches() {
        let quad = [
            Point2::new(100, 100),
            Point2::new(200, 100),
            Point2::new(200, 160),
            Point2::new(100, 160),
        ];
        let mut reversed = quad;
        reversed.reverse();

        let a = centroid(&quad).unwrap();
        let b = centroid(&reversed).unwrap();
        assert_abs_diff_eq!(a.x, 150.0, epsilon = 1e-9);
        assert_abs_diff_eq!(a.y, 130.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.x, a.x, epsilon = 1e-9);
        assert_abs_diff_eq!(b.y, a.y, epsilon = 1e-9);
    }

    #[test]
    fn perimeter_is_equal_area_circumference() {
        let quad = [
            Point2::new(0, 0),
            Point2::new(10, 0),
            Point2::new(10, 10),
            Point2::new(0, 10),
        ];
        // area 100 -> radius sqrt(100 / pi) -> circumference 2 * sqrt(100 * pi)
        let expected = 2.0 * (100.0 * std::f64::consts::PI).sqrt();
        assert_abs_diff_eq!(perimeter(&quad), expected, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_polygons() {
        let line = [Point2::new(0, 0), Point2::new(5, 5), Point2::new(10, 10)];
        assert_eq!(area(&line), 0.0);
        assert!(centroid(&line).is_none());
        assert!(centroid(&line[..2]).is_none());
        assert!(center_of_gravity(&[]).is_none());
    }

    #[test]
    fn center_of_gravity_is_vertex_mean() {
        let c = center_of_gravity(&unit_square()).unwrap();
        assert_eq!(c, Point2::new(0.5, 0.5));
    }
}
