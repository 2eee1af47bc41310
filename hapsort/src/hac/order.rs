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

use crate::structs::{HaploId, HaplotypeSummary};

use super::tree::ClusterTree;

impl ClusterTree<HaplotypeSummary> {
    /// Children of an internal node in draw order: the heavier subtree first, the left one on ties
    pub fn draw_children(&self, node_idx: NodeIndex) -> Option<(NodeIndex, NodeIndex)> {
        let (left, right) = self.children(node_idx)?;

        match self.item(right).leaf_count > self.item(left).leaf_count {
            true => Some((right, left)),
            false => Some((left, right)),
        }
    }

    /// Haplotype ids of the leaves in draw order
    pub fn haplotype_order(&self) -> Vec<HaploId> {
        let mut order = Vec::with_capacity(self.nleaves());
        self.collect_leaves(self.root(), &mut order);
        order
    }

    fn collect_leaves(&self, node_idx: NodeIndex, order: &mut Vec<HaploId>) {
        match self.draw_children(node_idx) {
            Some((first, second)) => {
                self.collect_leaves(first, order);
                self.collect_leaves(second, order);
            }
            None => order.push(self.item(node_idx).haplo_id),
        }
    }
}
