use std::f64::consts::TAU;

use crate::model::Point;

/// Wraps an angle into [0, 2π).
#[inline]
pub fn normalize_angle(a: f64) -> f64 {
    let r = a.rem_euclid(TAU);
    // rem_euclid can return TAU itself for tiny negative inputs
    if r >= TAU {
        0.0
    } else {
        r
    }
}

/// Polar angle of `p` around `center`, in [0, 2π).
#[inline]
pub fn angle_around(center: Point, p: Point) -> f64 {
    normalize_angle((p.y - center.y).atan2(p.x - center.x))
}

/// Counter-clockwise sweep from `from` to `to`, in [0, 2π).
#[inline]
pub fn ccw_sweep(from: f64, to: f64) -> f64 {
    normalize_angle(to - from)
}

#[inline]
pub fn point_on_circle(center: Point, radius: f64, angle: f64) -> Point {
    Point {
        x: center.x + radius * angle.cos(),
        y: center.y + radius * angle.sin(),
    }
}

/// Signed area contributed by an arc from `start` to `end` on a circle of
/// `radius` with signed sweep `delta` (positive = counter-clockwise): the
/// shoelace term of its chord plus the circular segment between chord and arc.
/// The chord term is taken about `origin`; summing a closed loop about any
/// single origin gives its area, and an origin near the loop keeps the
/// cancellation small far from (0, 0).
#[inline]
pub fn arc_signed_area(origin: Point, start: Point, end: Point, radius: f64, delta: f64) -> f64 {
    let (sx, sy) = (start.x - origin.x, start.y - origin.y);
    let (ex, ey) = (end.x - origin.x, end.y - origin.y);
    let chord = 0.5 * (sx * ey - ex * sy);
    let segment = 0.5 * radius * radius * (delta - delta.sin());
    chord + segment
}
