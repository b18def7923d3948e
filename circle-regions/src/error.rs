//! Failures raised while extracting regions.
//!
//! Every error carries the circles implicated in the failure plus a snapshot
//! of the whole circle set, so a caller can serialize it and replay the input.

use serde::Serialize;
use thiserror::Error;

use crate::model::{Circle, CircleId, Direction, EdgeId, NodeId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegionErrorKind {
    /// Two circles meet tangentially at a node with parities that cannot be reconciled.
    #[error("malformed tangency at {node} between {a} and {b}")]
    MalformedTangency { node: NodeId, a: CircleId, b: CircleId },
    /// A face walk tried to claim an edge side already owned by another cycle.
    #[error("{direction} side of {edge} already belongs to a face")]
    DuplicateFaceSlot { edge: EdgeId, direction: Direction },
    /// Circles exist but no unbounded boundary was produced.
    #[error("no outer contour found")]
    MissingOuterContour,
    /// Two departures from a node are indistinguishable by angle and curvature.
    #[error("unsupported traversal at {node}")]
    UnsupportedTraversal { node: NodeId },
    /// A face walk could not find the edge continuing its boundary.
    #[error("missing next edge at {node}")]
    MissingNextEdge { node: NodeId },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleSnapshot {
    pub id: CircleId,
    #[serde(flatten)]
    pub circle: Circle,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct RegionError {
    pub kind: RegionErrorKind,
    pub implicated: Vec<CircleId>,
    pub circles: Vec<CircleSnapshot>,
}

#[derive(Serialize)]
struct Report<'a> {
    error: String,
    implicated: &'a [CircleId],
    circles: &'a [CircleSnapshot],
}

impl RegionError {
    pub fn new(kind: RegionErrorKind) -> Self {
        RegionError {
            kind,
            implicated: Vec::new(),
            circles: Vec::new(),
        }
    }

    pub fn implicating(mut self, ids: impl IntoIterator<Item = CircleId>) -> Self {
        for id in ids {
            if !self.implicated.contains(&id) {
                self.implicated.push(id);
            }
        }
        self
    }

    pub(crate) fn with_snapshot(mut self, circles: Vec<CircleSnapshot>) -> Self {
        self.circles = circles;
        self
    }

    pub fn kind(&self) -> &RegionErrorKind {
        &self.kind
    }

    /// The snapshotted circles, in id order, ready to replay through
    /// `check_circles`.
    pub fn circle_set(&self) -> Vec<Circle> {
        self.circles.iter().map(|s| s.circle.clone()).collect()
    }

    /// Message, implicated ids and the full circle set as a JSON document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Report {
            error: self.kind.to_string(),
            implicated: &self.implicated,
            circles: &self.circles,
        })
    }
}

impl From<RegionErrorKind> for RegionError {
    fn from(kind: RegionErrorKind) -> Self {
        RegionError::new(kind)
    }
}
