use crate::model::{CircleId, CycleId, Direction, EdgeId, NodeId, Region};

/// Face bookkeeping for one side of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceSlot {
    /// Not traced yet.
    Unset,
    /// Traced; the walk closed without producing a cycle.
    Empty,
    Cycle(CycleId),
}

impl FaceSlot {
    pub fn cycle(self) -> Option<CycleId> {
        match self {
            FaceSlot::Cycle(c) => Some(c),
            _ => None,
        }
    }
}

/// An arc of one circle between two consecutive nodes, counter-clockwise
/// from `node1` to `node2`.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
    pub(crate) circle: CircleId,
    // position in the owning circle's edge list
    pub(crate) ordinal: usize,
    pub(crate) node1: NodeId,
    pub(crate) node2: NodeId,
    pub(crate) start_angle: f64,
    pub(crate) sweep: f64,
    // face left of the forward walk (inside the circle)
    pub(crate) inner: FaceSlot,
    // face left of the backward walk (outside the circle)
    pub(crate) outer: FaceSlot,
}

impl GraphEdge {
    pub fn circle(&self) -> CircleId {
        self.circle
    }

    pub fn nodes(&self) -> (NodeId, NodeId) {
        (self.node1, self.node2)
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn sweep(&self) -> f64 {
        self.sweep
    }

    pub fn slot(&self, dir: Direction) -> FaceSlot {
        match dir {
            Direction::Forward => self.inner,
            Direction::Backward => self.outer,
        }
    }

    pub(crate) fn slot_mut(&mut self, dir: Direction) -> &mut FaceSlot {
        match dir {
            Direction::Forward => &mut self.inner,
            Direction::Backward => &mut self.outer,
        }
    }

    /// Node the walk leaves from.
    pub fn departure(&self, dir: Direction) -> NodeId {
        match dir {
            Direction::Forward => self.node1,
            Direction::Backward => self.node2,
        }
    }

    /// Node the walk arrives at.
    pub fn arrival(&self, dir: Direction) -> NodeId {
        match dir {
            Direction::Forward => self.node2,
            Direction::Backward => self.node1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HalfEdge {
    pub edge: EdgeId,
    pub dir: Direction,
}

impl HalfEdge {
    pub fn new(edge: EdgeId, dir: Direction) -> Self {
        HalfEdge { edge, dir }
    }

    pub fn twin(self) -> HalfEdge {
        HalfEdge {
            edge: self.edge,
            dir: self.dir.flip(),
        }
    }
}

/// A closed face walk. The classified region is filled in once per cycle and
/// reused until one of its edges is invalidated.
#[derive(Clone, Debug)]
pub struct Cycle {
    pub(crate) steps: Vec<HalfEdge>,
    pub(crate) region: Option<Region>,
}

impl Cycle {
    pub fn steps(&self) -> &[HalfEdge] {
        &self.steps
    }

    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }
}
