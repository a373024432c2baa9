// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marginalia ONG: an incremental nearest-neighbor index over dynamic 2D point sets.
//!
//! An *orthant neighborhood graph* (ONG) is a directed graph over points in the
//! plane where every point keeps, for each of the four quadrants around it, a
//! link to the locally nearest point in that quadrant. The structure answers
//! "which point is nearest to this coordinate?" by a short branch-and-bound
//! walk along those links, and supports live insertion, removal, and
//! relocation of points without ever rebuilding.
//!
//! ## Where this fits
//!
//! Marginalia overlays symbolic annotations (note positions, performance
//! markers) onto scanned score pages. The overlay model owns one [`Graph`] per
//! page and maps [`NodeId`]s to its own annotation objects; the interactive
//! panel converts pointer coordinates (after inverse-transforming into image
//! space) into [`Graph::nearest`] calls and compares the returned squared
//! distance against a squared selection radius. This crate is only the
//! spatial core: it stores coordinates and node identity, never the
//! annotations themselves.
//!
//! ## API overview
//!
//! - [`Graph`]: the container; arena storage plus a locality cursor that
//!   seeds each search near the previous one.
//! - [`NodeId`]: generational handle of an indexed point.
//! - [`Quadrant`]: the four plane regions around a point, with the fixed
//!   on-axis tie-break (east and north count as [`Quadrant::NorthEast`],
//!   west and south as [`Quadrant::SouthWest`]).
//! - [`Hit`]: a query result carrying the node, its coordinate, and the
//!   squared distance.
//! - [`Neighborhood`]: the nearest node per quadrant around an arbitrary
//!   coordinate, for "nearest in every direction" UI hints.
//!
//! Key operations:
//! - [`Graph::insert`] → [`NodeId`] (returns the resident node on an
//!   exact-coordinate collision; duplicates never coexist).
//! - [`Graph::remove`] / [`Graph::move_to`] (stale ids are safe no-ops).
//! - [`Graph::nearest`] and [`Graph::neighborhood`].
//!
//! ## Quick start
//!
//! ```
//! use kurbo::Point;
//! use marginalia_ong::Graph;
//!
//! let mut graph = Graph::new();
//! let lento = graph.insert(Point::new(41.0, 18.5));
//! let _segno = graph.insert(Point::new(310.0, 22.0));
//!
//! let hit = graph.nearest(Point::new(43.0, 17.0)).unwrap();
//! assert_eq!(hit.node, lento);
//! assert!(hit.dist_sq <= 25.0); // within a 5px selection radius
//! ```
//!
//! ## Semantics and limits
//!
//! - After every public operation, each live node's quadrant links point to
//!   the nearest node in that quadrant (or are empty when the quadrant is).
//! - All distances are squared Euclidean; callers square their thresholds.
//! - Coordinates are `f64` and assumed finite (no NaNs).
//! - Single-threaded by design: mutation takes `&mut self` and callers are
//!   expected to serialize access, typically on the UI event thread.
//! - Quadrant names assume a y-up plane. For y-down device coordinates the
//!   labels flip vertically; results are unaffected.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod graph;
mod node;
mod search;
mod types;
mod util;

pub use graph::Graph;
pub use types::{Hit, Neighborhood, NodeId, Quadrant};
