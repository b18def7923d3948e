use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! handle {
    ($name:ident) => {
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

handle!(CircleId);
handle!(NodeId);
handle!(EdgeId);
handle!(CycleId);

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Caller-facing circle geometry. The optional label is carried through to
/// error reports and never affects topology.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Circle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Circle {
            center: Point { x, y },
            radius,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.center.x.is_finite()
            && self.center.y.is_finite()
            && self.radius.is_finite()
            && self.radius > 0.0
    }
}

/// Traversal direction of an edge. Forward follows the circle
/// counter-clockwise (node1 -> node2) and keeps the circle's interior on the
/// left; backward runs node2 -> node1 with the exterior on the left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    #[inline]
    pub fn flip(self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("forward"),
            Direction::Backward => f.write_str("backward"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegionKind {
    /// Interior of a circle that touches no other circle.
    Circle,
    Region,
    InnerContour,
    OuterContour,
}

impl RegionKind {
    pub fn is_contour(self) -> bool {
        matches!(self, RegionKind::InnerContour | RegionKind::OuterContour)
    }
}

/// One circular arc of a region boundary, oriented along the boundary walk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub circle: CircleId,
    pub center: Point,
    pub radius: f64,
    pub start: Point,
    pub end: Point,
    pub start_angle: f64,
    pub end_angle: f64,
    pub clockwise: bool,
}

impl Arc {
    /// Signed sweep from `start_angle` to `end_angle`; negative when clockwise.
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// Stable identity of a published region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegionKey {
    Cycle(CycleId),
    Circle {
        circle: CircleId,
        revision: u32,
        contour: bool,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub key: RegionKey,
    pub kind: RegionKind,
    pub arcs: Vec<Arc>,
    pub area: f64,
}

impl Region {
    pub fn is_contour(&self) -> bool {
        self.kind.is_contour()
    }

    pub fn circles(&self) -> Vec<CircleId> {
        let mut ids: Vec<CircleId> = self.arcs.iter().map(|a| a.circle).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Keys that appeared or disappeared in the most recent recomputation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionDiff {
    pub added: Vec<RegionKey>,
    pub removed: Vec<RegionKey>,
}

impl RegionDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
