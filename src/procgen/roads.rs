//! Road network for the town grid.
//!
//! Uses petgraph for the underlying graph structure. Intersections are
//! nodes; each block-length stretch of road between two intersections is
//! an edge.

use bevy::prelude::*;
use petgraph::graph::{NodeIndex, UnGraph};
use smallvec::{smallvec, SmallVec};

/// A node in the road network.
#[derive(Clone, Debug)]
pub struct RoadNode {
    pub position: Vec2,
    pub node_type: RoadNodeType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoadNodeType {
    /// Four-way crossing inside the town.
    Intersection,
    /// Crossing on the town border (fewer than four roads meet).
    Border,
}

/// Direction a road segment runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoadAxis {
    /// Runs along X (constant Z).
    EastWest,
    /// Runs along Z (constant X).
    NorthSouth,
}

/// An edge in the road network (one block-length road segment).
#[derive(Clone, Debug)]
pub struct RoadEdge {
    /// Centreline points from one intersection centre to the other.
    pub points: SmallVec<[Vec2; 8]>,
    pub axis: RoadAxis,
    /// Length in world units.
    pub length: f32,
}

impl RoadEdge {
    pub fn new(points: SmallVec<[Vec2; 8]>, axis: RoadAxis) -> Self {
        let length = Self::calculate_length(&points);
        Self {
            points,
            axis,
            length,
        }
    }

    fn calculate_length(points: &[Vec2]) -> f32 {
        points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// Centreline with `inset` trimmed off both ends.
    pub fn trimmed(&self, inset: f32) -> Option<(Vec2, Vec2)> {
        let (&start, &end) = (self.points.first()?, self.points.last()?);
        let dir = (end - start).normalize_or_zero();
        if self.length <= inset * 2.0 || dir == Vec2::ZERO {
            return None;
        }
        Some((start + dir * inset, end - dir * inset))
    }
}

/// The road network graph.
#[derive(Default)]
pub struct RoadGraph {
    pub graph: UnGraph<RoadNode, RoadEdge>,
}

impl RoadGraph {
    /// Build a rectangular grid from road centreline coordinates.
    ///
    /// `xs` are the X positions of north-south roads, `zs` the Z positions of
    /// east-west roads.
    pub fn from_grid(xs: &[f32], zs: &[f32]) -> Self {
        let mut roads = RoadGraph::default();
        let mut indices: Vec<Vec<NodeIndex>> = Vec::with_capacity(zs.len());

        for (row, &z) in zs.iter().enumerate() {
            let mut row_nodes = Vec::with_capacity(xs.len());
            for (col, &x) in xs.iter().enumerate() {
                let on_border =
                    row == 0 || col == 0 || row + 1 == zs.len() || col + 1 == xs.len();
                let node_type = if on_border {
                    RoadNodeType::Border
                } else {
                    RoadNodeType::Intersection
                };
                row_nodes.push(roads.add_node(Vec2::new(x, z), node_type));
            }
            indices.push(row_nodes);
        }

        for row in 0..zs.len() {
            for col in 0..xs.len() {
                let here = indices[row][col];
                if col + 1 < xs.len() {
                    roads.add_edge(here, indices[row][col + 1], RoadAxis::EastWest);
                }
                if row + 1 < zs.len() {
                    roads.add_edge(here, indices[row + 1][col], RoadAxis::NorthSouth);
                }
            }
        }

        roads
    }

    /// Add a node to the graph.
    pub fn add_node(&mut self, position: Vec2, node_type: RoadNodeType) -> NodeIndex {
        self.graph.add_node(RoadNode { position, node_type })
    }

    /// Add a straight edge between two nodes.
    pub fn add_edge(&mut self, a: NodeIndex, b: NodeIndex, axis: RoadAxis) {
        let points = smallvec![self.graph[a].position, self.graph[b].position];
        self.graph.add_edge(a, b, RoadEdge::new(points, axis));
    }

    /// Get all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &RoadNode)> {
        self.graph.node_indices().map(|i| (i, &self.graph[i]))
    }

    /// Get all edges.
    pub fn edges(&self) -> impl Iterator<Item = &RoadEdge> {
        self.graph.edge_weights()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Get the degree (number of connected edges) of a node.
    pub fn node_degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges(idx).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_expected_counts() {
        let roads = RoadGraph::from_grid(&[0.0, 10.0, 20.0], &[0.0, 10.0]);
        assert_eq!(roads.node_count(), 6);
        // 2 rows * 2 east-west + 3 columns * 1 north-south
        assert_eq!(roads.edge_count(), 7);
    }

    #[test]
    fn inner_nodes_are_four_way_intersections() {
        let line = [0.0, 10.0, 20.0];
        let roads = RoadGraph::from_grid(&line, &line);
        for (idx, node) in roads.nodes() {
            match node.node_type {
                RoadNodeType::Intersection => assert_eq!(roads.node_degree(idx), 4),
                RoadNodeType::Border => assert!(roads.node_degree(idx) < 4),
            }
        }
    }

    #[test]
    fn trimmed_edge_stays_clear_of_ends() {
        let edge = RoadEdge::new(
            smallvec![Vec2::new(0.0, 0.0), Vec2::new(20.0, 0.0)],
            RoadAxis::EastWest,
        );
        let (start, end) = edge.trimmed(4.0).unwrap();
        assert_eq!(start, Vec2::new(4.0, 0.0));
        assert_eq!(end, Vec2::new(16.0, 0.0));
        assert!(edge.trimmed(10.0).is_none());
    }
}
