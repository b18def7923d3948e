// Circle-circle classification using rounded comparisons.
// The relation is decided on center distance vs. radius sum/difference first;
// coordinates are only computed for the cases that produce points.

use super::tolerance::{approx_eq, approx_gt, approx_lt, round_to_precision};
use crate::model::{Circle, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tangency {
    /// One circle inside the other, touching at one point.
    Inner,
    /// Circles side by side, touching at one point.
    Outer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CircleRelation {
    Disjoint,
    /// Same center and radius within precision; no topology between them.
    Coincident,
    /// The first circle strictly contains the second.
    Contains,
    /// The first circle is strictly inside the second.
    Inside,
    Tangent { point: Point, kind: Tangency },
    /// Two transversal crossings.
    Lens(Point, Point),
}

#[inline]
fn rounded(p: Point) -> Point {
    Point {
        x: round_to_precision(p.x),
        y: round_to_precision(p.y),
    }
}

pub fn intersect_circles(a: &Circle, b: &Circle) -> CircleRelation {
    let (ax, ay, ra) = (a.center.x, a.center.y, a.radius);
    let (bx, by, rb) = (b.center.x, b.center.y, b.radius);
    let dx = bx - ax;
    let dy = by - ay;
    let d = dx.hypot(dy);
    let sum = ra + rb;
    let diff = (ra - rb).abs();

    if approx_eq(d, 0.0) && approx_eq(ra, rb) {
        return CircleRelation::Coincident;
    }
    if approx_gt(d, sum) {
        return CircleRelation::Disjoint;
    }
    if approx_eq(d, sum) {
        let ux = dx / d;
        let uy = dy / d;
        let point = rounded(Point {
            x: ax + ux * ra,
            y: ay + uy * ra,
        });
        return CircleRelation::Tangent {
            point,
            kind: Tangency::Outer,
        };
    }
    if approx_lt(d, diff) {
        return if ra > rb {
            CircleRelation::Contains
        } else {
            CircleRelation::Inside
        };
    }
    if approx_eq(d, diff) {
        // d > 0 here: a zero distance with equal radii was caught above and a
        // zero distance with different radii is strictly nested.
        let (big, r_big, small) = if ra >= rb {
            (a.center, ra, b.center)
        } else {
            (b.center, rb, a.center)
        };
        let ux = (small.x - big.x) / d;
        let uy = (small.y - big.y) / d;
        let point = rounded(Point {
            x: big.x + ux * r_big,
            y: big.y + uy * r_big,
        });
        return CircleRelation::Tangent {
            point,
            kind: Tangency::Inner,
        };
    }

    // Genuine crossing: foot of the common chord at distance `along` from a's
    // center, half-chord length `h`.
    let along = (d * d + ra * ra - rb * rb) / (2.0 * d);
    let h = (ra * ra - along * along).max(0.0).sqrt();
    let ux = dx / d;
    let uy = dy / d;
    let mx = ax + along * ux;
    let my = ay + along * uy;
    let p1 = rounded(Point {
        x: mx - h * uy,
        y: my + h * ux,
    });
    let p2 = rounded(Point {
        x: mx + h * uy,
        y: my - h * ux,
    });
    CircleRelation::Lens(p1, p2)
}
