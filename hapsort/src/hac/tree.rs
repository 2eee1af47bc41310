// HAPSORT - Haplotype sorting for variant tracks
// Copyright (C) 2024  Osma S. Rautila
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::{Direction, Graph};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::structs::{HaploId, HaplotypeSummary, SiteWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Branch {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterNode<T> {
    pub item: T,
    /// Distance between the two children when they were merged, None for leaves
    pub child_distance: Option<f64>,
}

impl<T> ClusterNode<T> {
    pub fn leaf(item: T) -> Self {
        Self {
            item,
            child_distance: None,
        }
    }

    pub fn internal(item: T, child_distance: f64) -> Self {
        Self {
            item,
            child_distance: Some(child_distance),
        }
    }

    /// Both children look exactly the same to the distance function
    pub fn is_identical(&self) -> bool {
        self.child_distance == Some(0.0)
    }
}

/// Binary cluster tree. The graph owns every node, edges point from a parent to its two children.
#[derive(Debug, Clone)]
pub struct ClusterTree<T> {
    graph: Graph<ClusterNode<T>, Branch>,
    root: NodeIndex,
}

impl<T> ClusterTree<T> {
    pub(super) fn new(graph: Graph<ClusterNode<T>, Branch>, root: NodeIndex) -> Self {
        Self { graph, root }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn node(&self, node_idx: NodeIndex) -> &ClusterNode<T> {
        &self.graph[node_idx]
    }

    pub fn item(&self, node_idx: NodeIndex) -> &T {
        &self.graph[node_idx].item
    }

    pub fn nnodes(&self) -> usize {
        self.graph.node_count()
    }

    pub fn nleaves(&self) -> usize {
        self.leaves().count()
    }

    pub fn is_leaf(&self, node_idx: NodeIndex) -> bool {
        self.graph
            .neighbors_directed(node_idx, Direction::Outgoing)
            .next()
            .is_none()
    }

    /// (left, right) children of an internal node
    pub fn children(&self, node_idx: NodeIndex) -> Option<(NodeIndex, NodeIndex)> {
        let (mut left, mut right) = (None, None);

        for edge in self.graph.edges_directed(node_idx, Direction::Outgoing) {
            match edge.weight() {
                Branch::Left => left = Some(edge.target()),
                Branch::Right => right = Some(edge.target()),
            }
        }

        left.zip(right)
    }

    pub fn leaves(&self) -> impl Iterator<Item = &T> + '_ {
        self.graph
            .node_indices()
            .filter(move |node_idx| self.is_leaf(*node_idx))
            .map(move |node_idx| &self.graph[node_idx].item)
    }

    /// Internal nodes in the order they were merged
    pub fn internal_nodes(&self) -> impl Iterator<Item = (NodeIndex, &ClusterNode<T>)> + '_ {
        self.graph
            .node_indices()
            .filter(move |node_idx| !self.is_leaf(*node_idx))
            .map(move |node_idx| (node_idx, &self.graph[node_idx]))
    }
}

/// Nested view of a haplotype cluster tree for dendrogram drawing, children are in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dendrogram {
    pub leaf_count: u32,
    pub distance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub haplo_id: Option<HaploId>,
    pub label: String,
    pub identical: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Dendrogram>,
}

impl Dendrogram {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl ClusterTree<HaplotypeSummary> {
    /// sites is the window the tree was clustered over, used for the node labels
    pub fn dendrogram(&self, sites: &SiteWindow) -> Dendrogram {
        self.dendrogram_node(self.root, sites)
    }

    fn dendrogram_node(&self, node_idx: NodeIndex, sites: &SiteWindow) -> Dendrogram {
        let node = self.node(node_idx);

        let children = match self.draw_children(node_idx) {
            Some((first, second)) => vec![
                self.dendrogram_node(first, sites),
                self.dendrogram_node(second, sites),
            ],
            None => vec![],
        };

        Dendrogram {
            leaf_count: node.item.leaf_count,
            distance: node.child_distance.unwrap_or(0.0),
            haplo_id: self.is_leaf(node_idx).then_some(node.item.haplo_id),
            label: node.item.consensus(sites),
            identical: node.is_identical(),
            children,
        }
    }
}
