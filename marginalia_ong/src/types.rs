// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the graph: node identifiers, quadrants, and query results.

use kurbo::Point;

/// Identifier for an indexed point in a [`Graph`](crate::Graph).
///
/// A `NodeId` pairs an arena slot index with the generation the slot carried
/// when the point was inserted. The handle is `Copy`, cheap to store in a
/// caller's own annotation tables, and keeps identifying the same point for
/// as long as that point is in the graph.
///
/// Removing the point invalidates every `NodeId` that referred to it. The
/// slot may later be handed to a new point, but only under a higher
/// generation, so a stale id held by the caller can never be mistaken for
/// the slot's new occupant. [`Graph::is_alive`](crate::Graph::is_alive)
/// reports whether an id is still current; feeding a stale id to a mutation
/// is a safe no-op.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// One of the four quadrants partitioning the plane around a point.
///
/// Classification is total except for the point itself: every other point
/// falls in exactly one quadrant. The on-axis tie-break is fixed so that the
/// partition never depends on traversal order:
///
/// - equal x, above → [`Quadrant::NorthEast`]; below → [`Quadrant::SouthWest`];
/// - equal y, right → [`Quadrant::NorthEast`]; left → [`Quadrant::SouthWest`].
///
/// Names assume a y-up plane; a y-down caller sees vertically flipped labels
/// and identical behavior.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Quadrant {
    /// dx ≥ 0, dy ≥ 0 (including the positive x and y axes).
    NorthEast,
    /// dx > 0, dy < 0.
    SouthEast,
    /// dx ≤ 0, dy ≤ 0 (including the negative x and y axes).
    SouthWest,
    /// dx < 0, dy > 0.
    NorthWest,
}

impl Quadrant {
    /// All four quadrants, in slot order.
    pub const ALL: [Self; 4] = [
        Self::NorthEast,
        Self::SouthEast,
        Self::SouthWest,
        Self::NorthWest,
    ];

    /// Classifies `p` relative to `origin`, or `None` iff the points coincide.
    #[must_use]
    pub fn of(origin: Point, p: Point) -> Option<Self> {
        let dx = p.x - origin.x;
        let dy = p.y - origin.y;
        if dx == 0.0 && dy == 0.0 {
            None
        } else if dx >= 0.0 && dy >= 0.0 {
            Some(Self::NorthEast)
        } else if dx > 0.0 {
            Some(Self::SouthEast)
        } else if dy <= 0.0 {
            Some(Self::SouthWest)
        } else {
            Some(Self::NorthWest)
        }
    }

    /// The quadrant diagonally across the origin.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::NorthEast => Self::SouthWest,
            Self::SouthEast => Self::NorthWest,
            Self::SouthWest => Self::NorthEast,
            Self::NorthWest => Self::SouthEast,
        }
    }

    /// Fixed slot index: NE=0, SE=1, SW=2, NW=3.
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::NorthEast => 0,
            Self::SouthEast => 1,
            Self::SouthWest => 2,
            Self::NorthWest => 3,
        }
    }

    /// Mirror across the east-west axis (swaps north and south).
    pub(crate) const fn mirror_ns(self) -> Self {
        match self {
            Self::NorthEast => Self::SouthEast,
            Self::SouthEast => Self::NorthEast,
            Self::SouthWest => Self::NorthWest,
            Self::NorthWest => Self::SouthWest,
        }
    }

    /// Mirror across the north-south axis (swaps east and west).
    pub(crate) const fn mirror_ew(self) -> Self {
        match self {
            Self::NorthEast => Self::NorthWest,
            Self::SouthEast => Self::SouthWest,
            Self::SouthWest => Self::SouthEast,
            Self::NorthWest => Self::NorthEast,
        }
    }
}

/// Result of a nearest-node query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit {
    /// The node found.
    pub node: NodeId,
    /// The node's coordinate.
    pub point: Point,
    /// Squared Euclidean distance from the query coordinate to [`Hit::point`].
    ///
    /// Squared distances are used throughout; compare against a squared
    /// selection radius.
    pub dist_sq: f64,
}

/// The locally nearest node in each quadrant around an arbitrary coordinate.
///
/// Produced by [`Graph::neighborhood`](crate::Graph::neighborhood); also the
/// first phase of insertion. A quadrant slot is empty when no node lies in
/// that quadrant of the query coordinate.
#[derive(Clone, Debug)]
pub struct Neighborhood {
    pub(crate) point: Point,
    pub(crate) occupied: Option<NodeId>,
    pub(crate) slots: [Option<Hit>; 4],
}

impl Neighborhood {
    pub(crate) const fn empty(point: Point) -> Self {
        Self {
            point,
            occupied: None,
            slots: [None; 4],
        }
    }

    /// The query coordinate this neighborhood was resolved around.
    #[must_use]
    pub fn point(&self) -> Point {
        self.point
    }

    /// The node sitting exactly on the query coordinate, if any.
    ///
    /// When this is `Some`, the quadrant slots hold only whatever the walk
    /// saw before stopping; an insert at this coordinate would merge into
    /// the resident node instead of reading them.
    #[must_use]
    pub fn occupied(&self) -> Option<NodeId> {
        self.occupied
    }

    /// The nearest node in `quadrant`, or `None` if that quadrant is empty.
    #[must_use]
    pub fn neighbor(&self, quadrant: Quadrant) -> Option<Hit> {
        self.slots[quadrant.index()]
    }

    /// The populated quadrant slots, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Quadrant, Hit)> + '_ {
        Quadrant::ALL
            .into_iter()
            .filter_map(|q| self.slots[q.index()].map(|hit| (q, hit)))
    }

    /// The nearest of the four directional neighbors (or the resident node,
    /// at distance zero, when the coordinate is occupied).
    #[must_use]
    pub fn nearest(&self) -> Option<Hit> {
        if let Some(node) = self.occupied {
            return Some(Hit {
                node,
                point: self.point,
                dist_sq: 0.0,
            });
        }
        let mut best: Option<Hit> = None;
        for hit in self.slots.into_iter().flatten() {
            if best.is_none_or(|b| hit.dist_sq < b.dist_sq) {
                best = Some(hit);
            }
        }
        best
    }

    /// Records `hit` as the best candidate for `quadrant` if it is closer
    /// than the current one. Existing candidates win exact ties.
    pub(crate) fn offer(&mut self, quadrant: Quadrant, hit: Hit) {
        let slot = &mut self.slots[quadrant.index()];
        if slot.is_none_or(|cur| hit.dist_sq < cur.dist_sq) {
            *slot = Some(hit);
        }
    }

    /// Whether a region whose distance to the query is at least `bound` can
    /// be skipped: true only once every quadrant already holds a candidate
    /// strictly closer than `bound`.
    pub(crate) fn prunes(&self, bound: f64) -> bool {
        self.slots
            .iter()
            .all(|slot| slot.is_some_and(|hit| bound * bound > hit.dist_sq))
    }
}
