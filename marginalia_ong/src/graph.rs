// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The graph container: arena storage, mutation, and query entry points.

use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;

use crate::node::Node;
use crate::types::{Hit, Neighborhood, NodeId, Quadrant};

/// One arena slot. The generation grows on every reuse so stale [`NodeId`]s
/// never alias a live node.
#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// An orthant neighborhood graph over 2D points.
///
/// Each indexed point links to the locally nearest point in each of the four
/// quadrants around it. The container orchestrates insertion, removal,
/// relocation, and the two query entry points; all topology-aware work (the
/// branch-and-bound walks) lives in the search routines.
///
/// The graph keeps a *cursor*: the most recently touched node, used to seed
/// the next search near the previous one. Consecutive pointer events and
/// consecutive edits tend to be spatially close, so this keeps walks short.
/// The cursor has no correctness role; any seed yields the same answers.
///
/// Node coordinates are `f64` and assumed finite. No two live nodes ever
/// share a coordinate: inserting at an occupied coordinate returns the
/// resident node.
#[derive(Clone)]
pub struct Graph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
    cursor: Option<NodeId>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("total_slots", &self.slots.len())
            .field("live", &self.len)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            cursor: None,
        }
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the graph holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `id` still refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.slots
            .get(id.idx())
            .is_some_and(|slot| slot.generation == id.1 && slot.node.is_some())
    }

    /// The coordinate of `id`, or `None` if it is stale.
    #[must_use]
    pub fn point(&self, id: NodeId) -> Option<Point> {
        self.get(id).map(|node| node.point)
    }

    /// The node `id` links to in `quadrant`: the nearest live node in that
    /// quadrant of `id`, or `None` if the quadrant is empty (or `id` stale).
    #[must_use]
    pub fn neighbor(&self, id: NodeId, quadrant: Quadrant) -> Option<NodeId> {
        self.get(id).and_then(|node| node.link(quadrant))
    }

    /// All live nodes with their coordinates, in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Point)> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.node.as_ref().map(|node| (self.id_at(idx), node.point))
        })
    }

    /// Removes every node.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
        self.cursor = None;
    }

    /// Inserts a point and returns its id.
    ///
    /// If a node already sits exactly on `point`, that resident node is
    /// returned and the graph is unchanged: duplicate coordinates never
    /// coexist. Otherwise every node whose quadrant now prefers the new
    /// point is retargeted, so local optimality holds for the whole graph
    /// when this returns.
    pub fn insert(&mut self, point: Point) -> NodeId {
        let hood = self.resolve_neighborhood(self.seed(), point);
        if let Some(resident) = hood.occupied() {
            self.cursor = Some(resident);
            return resident;
        }
        let id = self.alloc(Node::new(point));
        for quadrant in Quadrant::ALL {
            let link = hood.neighbor(quadrant).map(|hit| hit.node);
            self.node_mut(id).set_link(quadrant, link);
        }
        let inverse = self.inverse_neighbors(id);
        for (other, quadrant) in inverse {
            self.node_mut(other).set_link(quadrant, Some(id));
        }
        self.cursor = Some(id);
        id
    }

    /// Removes a node. Returns `false` (leaving the graph unchanged) if `id`
    /// is stale.
    ///
    /// Every node that linked to the removed one is repaired to its next
    /// nearest candidate in that quadrant, so no reference to the removed
    /// node survives and local optimality holds when this returns.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let referrers = self.referrers(id);
        // Replacements are computed before anything is unlinked, so the
        // repair walks can still travel through the doomed node's links.
        let repairs: SmallVec<[(NodeId, Quadrant, Option<NodeId>); 8]> = referrers
            .iter()
            .map(|&(other, quadrant)| {
                let anchor = self.node(other).point;
                let hood = self.resolve_neighborhood_excluding(Some(other), anchor, &[other, id]);
                (other, quadrant, hood.neighbor(quadrant).map(|hit| hit.node))
            })
            .collect();
        self.release(id);
        for &(other, quadrant, replacement) in &repairs {
            self.node_mut(other).set_link(quadrant, replacement);
        }
        self.cursor = referrers.first().map(|&(other, _)| other);
        true
    }

    /// Relocates a node to `point`, returning the node's new id.
    ///
    /// Returns `None` if `id` is stale. A coincident target is a no-op
    /// returning the same id. Otherwise this is remove-then-insert, with the
    /// reinsert search seeded from the node's pre-removal link toward the
    /// target so the walk stays near the old location. If `point` is already
    /// occupied the move merges into the resident node.
    pub fn move_to(&mut self, id: NodeId, point: Point) -> Option<NodeId> {
        let node = self.get(id)?;
        let Some(toward) = Quadrant::of(node.point, point) else {
            return Some(id);
        };
        let hint = node
            .link(toward)
            .or_else(|| Quadrant::ALL.into_iter().find_map(|q| node.link(q)));
        self.remove(id);
        if hint.is_some() {
            self.cursor = hint;
        }
        Some(self.insert(point))
    }

    /// The live node nearest to `target`, or `None` on an empty graph.
    ///
    /// Seeds the walk from the cursor and moves the cursor to the result.
    pub fn nearest(&mut self, target: Point) -> Option<Hit> {
        let seed = self.seed()?;
        let hit = self.search_nearest(seed, target);
        self.cursor = Some(hit.node);
        Some(hit)
    }

    /// The nearest node in each quadrant around `target`, without inserting
    /// anything.
    #[must_use]
    pub fn neighborhood(&self, target: Point) -> Neighborhood {
        self.resolve_neighborhood(self.seed(), target)
    }

    /// A live node to start the next search from: the cursor when it is
    /// still live, otherwise the lowest-slot live node.
    pub(crate) fn seed(&self) -> Option<NodeId> {
        self.cursor
            .filter(|&id| self.is_alive(id))
            .or_else(|| self.iter().next().map(|(id, _)| id))
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        debug_assert!(self.is_alive(id), "stale node id");
        self.slots[id.idx()].node.as_ref().expect("live node id")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        debug_assert!(self.is_alive(id), "stale node id");
        self.slots[id.idx()].node.as_mut().expect("live node id")
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.node.as_ref())
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "alloc caps the slot count at u32::MAX"
    )]
    fn id_at(&self, idx: usize) -> NodeId {
        NodeId::new(idx as u32, self.slots[idx].generation)
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.len += 1;
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation += 1;
            slot.node = Some(node);
            NodeId::new(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.slots.len()).expect("graph slot count exceeds u32");
            self.slots.push(Slot {
                generation: 1,
                node: Some(node),
            });
            NodeId::new(idx, 1)
        }
    }

    fn release(&mut self, id: NodeId) {
        self.slots[id.idx()].node = None;
        self.free.push(id.0);
        self.len -= 1;
    }
}
