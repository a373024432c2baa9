// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single indexed point and its four directed neighbor links.

use kurbo::Point;

use crate::types::{NodeId, Quadrant};

/// One point of the graph: an immutable coordinate plus one mutable link per
/// quadrant to the locally nearest node in that quadrant (empty when the
/// quadrant holds no node at all).
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) point: Point,
    links: [Option<NodeId>; 4],
}

impl Node {
    pub(crate) const fn new(point: Point) -> Self {
        Self {
            point,
            links: [None; 4],
        }
    }

    pub(crate) fn link(&self, quadrant: Quadrant) -> Option<NodeId> {
        self.links[quadrant.index()]
    }

    pub(crate) fn set_link(&mut self, quadrant: Quadrant, to: Option<NodeId>) {
        self.links[quadrant.index()] = to;
    }

    /// Squared Euclidean distance from this node to `p`.
    pub(crate) fn dist_sq(&self, p: Point) -> f64 {
        (self.point - p).hypot2()
    }
}
