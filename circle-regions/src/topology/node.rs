// Intersection nodes and the tangency groups they own.
//
// Every circle through a node belongs to exactly one group. A circle that only
// crosses other circles here sits alone in a `Chaos` group; circles touching
// tangentially share a group whose parities record whether their
// counter-clockwise tangents agree (same parity) or oppose (different parity).

use serde::{Deserialize, Serialize};

use crate::model::{CircleId, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Parity {
    Yin,
    Yang,
    /// Orientation not fixed: the circle only crosses at this node.
    Chaos,
}

impl Parity {
    pub fn opposite(self) -> Parity {
        match self {
            Parity::Yin => Parity::Yang,
            Parity::Yang => Parity::Yin,
            Parity::Chaos => Parity::Chaos,
        }
    }
}

/// How a circle pair meets at a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairKind {
    Lens,
    InnerTangent,
    OuterTangent,
}

/// Parity data for a pair contradicts what the node already holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TangencyConflict {
    pub a: CircleId,
    pub b: CircleId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TangencyGroup {
    pub(crate) members: Vec<(CircleId, Parity)>,
}

impl TangencyGroup {
    fn singleton(c: CircleId) -> Self {
        TangencyGroup {
            members: vec![(c, Parity::Chaos)],
        }
    }

    pub fn members(&self) -> &[(CircleId, Parity)] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_tangency(&self) -> bool {
        self.members.len() > 1
    }

    pub fn parity_of(&self, c: CircleId) -> Option<Parity> {
        self.members.iter().find(|(m, _)| *m == c).map(|(_, p)| *p)
    }

    /// Fixes the orientation of `c` so a partner can be related to it. An
    /// unset singleton becomes the `Yin` reference.
    fn anchor(&mut self, c: CircleId, partner: CircleId) -> Result<Parity, TangencyConflict> {
        let single = self.members.len() == 1;
        let slot = self
            .members
            .iter_mut()
            .find(|(m, _)| *m == c)
            .ok_or(TangencyConflict { a: c, b: partner })?;
        match slot.1 {
            Parity::Chaos if single => {
                slot.1 = Parity::Yin;
                Ok(Parity::Yin)
            }
            Parity::Chaos => Err(TangencyConflict { a: c, b: partner }),
            p => Ok(p),
        }
    }
}

#[inline]
fn related(p: Parity, same: bool) -> Parity {
    if same {
        p
    } else {
        p.opposite()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub(crate) point: Point,
    pub(crate) groups: Vec<TangencyGroup>,
}

impl GraphNode {
    pub(crate) fn new(point: Point) -> Self {
        GraphNode {
            point,
            groups: Vec::new(),
        }
    }

    pub fn point(&self) -> Point {
        self.point
    }

    pub fn groups(&self) -> &[TangencyGroup] {
        &self.groups
    }

    pub fn circles(&self) -> impl Iterator<Item = CircleId> + '_ {
        self.groups
            .iter()
            .flat_map(|g| g.members.iter().map(|(c, _)| *c))
    }

    pub fn circle_count(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }

    pub fn contains(&self, c: CircleId) -> bool {
        self.group_index(c).is_some()
    }

    /// A node needs at least two circles to be a real intersection.
    pub fn is_valid(&self) -> bool {
        self.circle_count() >= 2
    }

    pub fn has_tangency(&self) -> bool {
        self.groups.iter().any(|g| g.is_tangency())
    }

    pub fn parity_of(&self, c: CircleId) -> Option<Parity> {
        self.group_index(c)
            .and_then(|g| self.groups[g].parity_of(c))
    }

    fn group_index(&self, c: CircleId) -> Option<usize> {
        self.groups
            .iter()
            .position(|g| g.members.iter().any(|(m, _)| *m == c))
    }

    /// Registers that circles `a` and `b` meet here. Returns true when group
    /// membership or parity changed, i.e. the rotation around this node moved.
    pub(crate) fn add_circle_pair(
        &mut self,
        a: CircleId,
        b: CircleId,
        kind: PairKind,
    ) -> Result<bool, TangencyConflict> {
        match kind {
            PairKind::Lens => {
                let mut changed = false;
                for c in [a, b] {
                    if self.group_index(c).is_none() {
                        self.groups.push(TangencyGroup::singleton(c));
                        changed = true;
                    }
                }
                Ok(changed)
            }
            PairKind::InnerTangent => self.join_tangent(a, b, true),
            PairKind::OuterTangent => self.join_tangent(a, b, false),
        }
    }

    // `same`: the pair's counter-clockwise tangents agree (internal tangency).
    fn join_tangent(&mut self, a: CircleId, b: CircleId, same: bool) -> Result<bool, TangencyConflict> {
        match (self.group_index(a), self.group_index(b)) {
            (None, None) => {
                self.groups.push(TangencyGroup {
                    members: vec![(a, Parity::Yin), (b, related(Parity::Yin, same))],
                });
                Ok(true)
            }
            (Some(ga), None) => {
                let pa = self.groups[ga].anchor(a, b)?;
                self.groups[ga].members.push((b, related(pa, same)));
                Ok(true)
            }
            (None, Some(gb)) => {
                let pb = self.groups[gb].anchor(b, a)?;
                self.groups[gb].members.push((a, related(pb, same)));
                Ok(true)
            }
            (Some(ga), Some(gb)) if ga == gb => {
                let group = &self.groups[ga];
                match (group.parity_of(a), group.parity_of(b)) {
                    (Some(pa), Some(pb)) if pa != Parity::Chaos && pb != Parity::Chaos => {
                        if (pa == pb) == same {
                            Ok(false)
                        } else {
                            Err(TangencyConflict { a, b })
                        }
                    }
                    _ => Err(TangencyConflict { a, b }),
                }
            }
            (Some(ga), Some(gb)) => {
                let pa = self.groups[ga].anchor(a, b)?;
                let pb = self.groups[gb].anchor(b, a)?;
                let flip = (pa == pb) != same;
                let moved = self.groups.remove(gb);
                let target = if gb < ga { ga - 1 } else { ga };
                for (c, p) in moved.members {
                    let p = if flip { p.opposite() } else { p };
                    self.groups[target].members.push((c, p));
                }
                Ok(true)
            }
        }
    }

    /// Removes `c` from this node. A group left with a single circle loses its
    /// orientation again.
    pub(crate) fn remove_circle(&mut self, c: CircleId) -> bool {
        let Some(g) = self.group_index(c) else {
            return false;
        };
        self.groups[g].members.retain(|(m, _)| *m != c);
        if self.groups[g].members.is_empty() {
            self.groups.remove(g);
        } else if self.groups[g].members.len() == 1 {
            self.groups[g].members[0].1 = Parity::Chaos;
        }
        true
    }
}
