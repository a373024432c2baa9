// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Branch-and-bound walks over the neighbor links.
//!
//! Both searches start from an arbitrary seed node and recurse along quadrant
//! links, keeping a visited set. The visited set guarantees termination even
//! on adversarial inputs: every recursive step either marks a new node or
//! returns immediately. Pruning compares squared lower bounds against the
//! squared distance of the best candidate so far; square roots never appear.
//!
//! Bounds used (all relative to the current node, with the query offset
//! `(dx, dy)`):
//!
//! - A point in the quadrant *opposite* the query direction is at least as
//!   far from the query as the current node itself, because the two offset
//!   vectors share component signs. The nearest search therefore never
//!   descends away from the query, and marks that link as visited outright.
//! - A point in a *side* quadrant is at least as far from the query as the
//!   offset along the axis the side shares with the query direction: `|dy|`
//!   for the east/west mirror, `|dx|` for the north/south mirror.
//!
//! The reverse sweep (which nodes should link, or currently link, to a given
//! node) walks outward from that node's own links and prunes with per-quadrant
//! dead zones instead of distance bounds; see [`DeadZones`].

use hashbrown::HashSet;
use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::graph::Graph;
use crate::node::Node;
use crate::types::{Hit, Neighborhood, NodeId, Quadrant};
use crate::util::abs;

/// Per-quadrant pruning state for the reverse sweep around an origin node.
///
/// Each anchor is the offset of a node already confirmed in that quadrant of
/// the origin. A node lying beyond an anchor, no nearer to the origin along
/// either axis, sees that anchor inside the quadrant it keeps the origin in,
/// strictly closer to it than the origin is. Its link in that quadrant can
/// therefore never involve the origin, and the sweep drops it without
/// recursing into its links.
struct DeadZones {
    anchors: [SmallVec<[Vec2; 4]>; 4],
}

impl DeadZones {
    fn new() -> Self {
        Self {
            anchors: [
                SmallVec::new(),
                SmallVec::new(),
                SmallVec::new(),
                SmallVec::new(),
            ],
        }
    }

    /// Whether a node at `offset` from the origin, lying in `cone` of the
    /// origin, falls inside an established dead zone.
    ///
    /// The comparisons mirror the on-axis tie-breaks: the NE and SW cones
    /// include their axes, so an anchor sharing an axis with the node still
    /// covers it; the open SE and NW cones need strict separation.
    fn covers(&self, cone: Quadrant, offset: Vec2) -> bool {
        self.anchors[cone.index()].iter().any(|a| match cone {
            Quadrant::NorthEast => a.x <= offset.x && a.y <= offset.y,
            Quadrant::SouthEast => a.x < offset.x && a.y > offset.y,
            Quadrant::SouthWest => a.x >= offset.x && a.y >= offset.y,
            Quadrant::NorthWest => a.x > offset.x && a.y < offset.y,
        })
    }

    fn confirm(&mut self, cone: Quadrant, offset: Vec2) {
        self.anchors[cone.index()].push(offset);
    }
}

impl Graph {
    /// Walks the links from `seed` and returns the live node nearest to
    /// `target`. `seed` must be live.
    pub(crate) fn search_nearest(&self, seed: NodeId, target: Point) -> Hit {
        let mut visited = HashSet::new();
        let mut best = None;
        self.nearest_step(seed, target, &mut visited, &mut best);
        best.expect("a live seed always yields a candidate")
    }

    fn nearest_step(
        &self,
        id: NodeId,
        target: Point,
        visited: &mut HashSet<NodeId>,
        best: &mut Option<Hit>,
    ) {
        if !visited.insert(id) {
            return;
        }
        let node = self.node(id);
        let Some(toward) = Quadrant::of(node.point, target) else {
            // Exactly on the target: nothing can be closer.
            *best = Some(Hit {
                node: id,
                point: node.point,
                dist_sq: 0.0,
            });
            return;
        };
        let dist_sq = node.dist_sq(target);
        if best.is_none_or(|b| dist_sq < b.dist_sq) {
            *best = Some(Hit {
                node: id,
                point: node.point,
                dist_sq,
            });
        }
        // The link on the far side of this node can never beat this node.
        if let Some(away) = node.link(toward.opposite()) {
            visited.insert(away);
        }
        // Follow the link toward the target first.
        if let Some(ahead) = node.link(toward) {
            let between = Quadrant::of(self.node(ahead).point, target) == Some(toward);
            self.nearest_step(ahead, target, visited, best);
            if between {
                // `ahead` sits between this node and the target; the subtree
                // just searched dominates both side quadrants.
                return;
            }
        }
        let dx = abs(target.x - node.point.x);
        let dy = abs(target.y - node.point.y);
        // Nearer side first: the mirror that keeps the dominant axis.
        let sides = if dx >= dy {
            [(toward.mirror_ns(), dy), (toward.mirror_ew(), dx)]
        } else {
            [(toward.mirror_ew(), dx), (toward.mirror_ns(), dy)]
        };
        for (side, bound) in sides {
            if best.is_some_and(|b| bound * bound > b.dist_sq) {
                continue;
            }
            if let Some(next) = node.link(side) {
                self.nearest_step(next, target, visited, best);
            }
        }
    }

    /// Resolves the nearest node per quadrant around `target`, walking from
    /// `seed` (or returning an empty neighborhood when the graph is empty).
    ///
    /// When a node occupies `target` exactly, the walk stops and reports it
    /// as `occupied`; insertion merges into that node instead of creating a
    /// duplicate.
    pub(crate) fn resolve_neighborhood(&self, seed: Option<NodeId>, target: Point) -> Neighborhood {
        self.resolve_neighborhood_excluding(seed, target, &[])
    }

    /// As [`Self::resolve_neighborhood`], but nodes in `exclude` are walked
    /// through without being offered as candidates. Removal repair resolves
    /// the neighborhood around a referrer's own coordinate with the referrer
    /// and the doomed node masked out.
    pub(crate) fn resolve_neighborhood_excluding(
        &self,
        seed: Option<NodeId>,
        target: Point,
        exclude: &[NodeId],
    ) -> Neighborhood {
        let mut hood = Neighborhood::empty(target);
        if let Some(seed) = seed {
            let mut visited = HashSet::new();
            self.neighborhood_step(seed, target, exclude, &mut visited, &mut hood);
        }
        hood
    }

    /// Returns `true` once the target coordinate was found occupied.
    fn neighborhood_step(
        &self,
        id: NodeId,
        target: Point,
        exclude: &[NodeId],
        visited: &mut HashSet<NodeId>,
        hood: &mut Neighborhood,
    ) -> bool {
        if !visited.insert(id) {
            return false;
        }
        let node = self.node(id);
        let masked = exclude.contains(&id);
        // Which quadrant of the target this node occupies.
        let Some(slot) = Quadrant::of(target, node.point) else {
            if masked {
                // A masked node sitting on the target itself; explore every
                // direction from it, unbounded.
                for direction in Quadrant::ALL {
                    if let Some(next) = node.link(direction)
                        && self.neighborhood_step(next, target, exclude, visited, hood)
                    {
                        return true;
                    }
                }
                return false;
            }
            hood.occupied = Some(id);
            return true;
        };
        if !masked {
            hood.offer(
                slot,
                Hit {
                    node: id,
                    point: node.point,
                    dist_sq: node.dist_sq(target),
                },
            );
        }
        // Distinct coordinates classify both ways.
        let toward = Quadrant::of(node.point, target).expect("distinct points have a quadrant");
        let dx = abs(target.x - node.point.x);
        let dy = abs(target.y - node.point.y);
        // All four directions, nearest lower bound first. Unlike the nearest
        // search, the opposite direction must be considered: a node far
        // behind this one may still be the only candidate for its quadrant.
        // Its bound is the Chebyshev distance, which here is max(dx, dy).
        let order = if dx >= dy {
            [
                (toward, 0.0),
                (toward.mirror_ns(), dy),
                (toward.mirror_ew(), dx),
                (toward.opposite(), dx),
            ]
        } else {
            [
                (toward, 0.0),
                (toward.mirror_ew(), dx),
                (toward.mirror_ns(), dy),
                (toward.opposite(), dy),
            ]
        };
        for (direction, bound) in order {
            if hood.prunes(bound) {
                continue;
            }
            if let Some(next) = node.link(direction)
                && self.neighborhood_step(next, target, exclude, visited, hood)
            {
                return true;
            }
        }
        false
    }

    /// Every node whose link should be retargeted to the freshly linked
    /// `id`: `id` is strictly nearer than the node's current candidate in
    /// the quadrant containing it. Existing links win exact ties.
    pub(crate) fn inverse_neighbors(&self, id: NodeId) -> SmallVec<[(NodeId, Quadrant); 8]> {
        self.reverse_sweep(id, |node, quadrant, dist_sq| {
            node.link(quadrant)
                .is_none_or(|cur| dist_sq < self.node(cur).dist_sq(node.point))
        })
    }

    /// Every node currently linking to `id`, with the quadrant of the link.
    /// By local optimality a node can reference `id` only in the one
    /// quadrant that contains it.
    pub(crate) fn referrers(&self, id: NodeId) -> SmallVec<[(NodeId, Quadrant); 8]> {
        self.reverse_sweep(id, |node, quadrant, _| node.link(quadrant) == Some(id))
    }

    /// Walks outward from `id`'s four links, calling `test` on every node
    /// that no dead zone covers, with the quadrant of that node containing
    /// `id` and the squared distance between the two. Collects the nodes the
    /// test accepts.
    fn reverse_sweep<F>(&self, id: NodeId, test: F) -> SmallVec<[(NodeId, Quadrant); 8]>
    where
        F: Fn(&Node, Quadrant, f64) -> bool,
    {
        let origin = self.node(id).point;
        let mut visited = HashSet::new();
        visited.insert(id);
        let mut zones = DeadZones::new();
        let mut out = SmallVec::new();
        let mut stack: SmallVec<[NodeId; 16]> = Quadrant::ALL
            .into_iter()
            .filter_map(|q| self.node(id).link(q))
            .collect();
        while let Some(next) = stack.pop() {
            if !visited.insert(next) {
                continue;
            }
            let node = self.node(next);
            let cone = Quadrant::of(origin, node.point).expect("distinct points have a quadrant");
            let offset = node.point - origin;
            if zones.covers(cone, offset) {
                continue;
            }
            zones.confirm(cone, offset);
            if test(node, cone.opposite(), node.dist_sq(origin)) {
                out.push((next, cone.opposite()));
            }
            for direction in Quadrant::ALL {
                if let Some(link) = node.link(direction)
                    && !visited.contains(&link)
                {
                    stack.push(link);
                }
            }
        }
        out
    }
}
