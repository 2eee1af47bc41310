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

use std::cmp::Ordering;

use itertools::Itertools;
use petgraph::graph::NodeIndex;
use petgraph::Graph;

use super::tree::{Branch, ClusterNode, ClusterTree};

pub trait DistanceFn<T> {
    fn distance(&self, a: &T, b: &T) -> f64;
}

pub trait MergeFn<T> {
    fn merge(&self, a: &T, b: &T) -> T;
}

/// Only used to order merges of equally distant pairs, never affects the distances
pub trait TieBreakFn<T> {
    type Key: Ord;

    /// Computed once for every cluster entering the active set
    fn key(&self, item: &T) -> Self::Key;
}

/// Nearest-pair agglomerative clustering.
///
/// Every iteration scans all pairs of the active clusters, so clustering N items costs O(N^3)
/// distance evaluations. Callers bound N (see `ClusterArgs::max_variants_per_side`) to keep
/// requests interactive.
///
/// Returns None for an empty input and a single leaf tree for one item.
pub fn cluster<T, D, M, C>(
    items: Vec<T>,
    distance: &D,
    merge: &M,
    tie_break: &C,
) -> Option<ClusterTree<T>>
where
    D: DistanceFn<T>,
    M: MergeFn<T>,
    C: TieBreakFn<T>,
{
    let nitems = items.len();
    let mut graph: Graph<ClusterNode<T>, Branch> =
        Graph::with_capacity((2 * nitems).saturating_sub(1), (2 * nitems).saturating_sub(2));

    let mut active: Vec<(NodeIndex, C::Key)> = items
        .into_iter()
        .map(|item| {
            let key = tie_break.key(&item);
            (graph.add_node(ClusterNode::leaf(item)), key)
        })
        .collect();

    while let Some((i, j, child_distance)) = closest_pair(&graph, &active, distance) {
        // i < j, so removing j first keeps i valid
        let (right, _) = active.remove(j);
        let (left, _) = active.remove(i);

        let item = merge.merge(&graph[left].item, &graph[right].item);
        let key = tie_break.key(&item);
        let parent = graph.add_node(ClusterNode::internal(item, child_distance));
        graph.add_edge(parent, left, Branch::Left);
        graph.add_edge(parent, right, Branch::Right);

        active.push((parent, key));
    }

    active.pop().map(|(root, _)| ClusterTree::new(graph, root))
}

// Positions (i < j) in the active set of the closest pair, None if less than two clusters remain
fn closest_pair<T, K, D>(
    graph: &Graph<ClusterNode<T>, Branch>,
    active: &[(NodeIndex, K)],
    distance: &D,
) -> Option<(usize, usize, f64)>
where
    K: Ord,
    D: DistanceFn<T>,
{
    let mut best: Option<(usize, usize, f64)> = None;

    for (i, j) in (0..active.len()).tuple_combinations() {
        let dist = distance.distance(&graph[active[i].0].item, &graph[active[j].0].item);

        let is_better = match best {
            None => true,
            Some((bi, bj, best_dist)) => match dist.total_cmp(&best_dist) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => {
                    let pair = (&active[i].1, &active[j].1);
                    let other = (&active[bi].1, &active[bj].1);
                    compare_pairs(pair, other) == Ordering::Less
                }
            },
        };

        if is_better {
            best = Some((i, j, dist));
        }
    }

    best
}

// Both pairs are put in key order before comparing the smaller members, then the larger ones
fn compare_pairs<K: Ord>(pair: (&K, &K), other: (&K, &K)) -> Ordering {
    let (a1, a2) = minmax(pair);
    let (b1, b2) = minmax(other);

    a1.cmp(b1).then_with(|| a2.cmp(b2))
}

fn minmax<'a, K: Ord>((x, y): (&'a K, &'a K)) -> (&'a K, &'a K) {
    match x.cmp(y) {
        Ordering::Greater => (y, x),
        _ => (x, y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    // Points on a line, merged into their centroid
    struct Line;

    #[derive(Debug, Clone, PartialEq)]
    struct Point {
        x: f64,
        n: usize,
        label: &'static str,
    }

    fn point(x: f64, label: &'static str) -> Point {
        Point { x, n: 1, label }
    }

    impl DistanceFn<Point> for Line {
        fn distance(&self, a: &Point, b: &Point) -> f64 {
            (a.x - b.x).abs()
        }
    }

    impl MergeFn<Point> for Line {
        fn merge(&self, a: &Point, b: &Point) -> Point {
            let n = a.n + b.n;
            Point {
                x: (a.x * a.n as f64 + b.x * b.n as f64) / n as f64,
                n,
                label: a.label,
            }
        }
    }

    impl TieBreakFn<Point> for Line {
        type Key = &'static str;

        fn key(&self, item: &Point) -> &'static str {
            item.label
        }
    }

    // Counts how many tie-break keys are computed
    struct CountingKeys(Cell<usize>);

    impl TieBreakFn<Point> for CountingKeys {
        type Key = &'static str;

        fn key(&self, item: &Point) -> &'static str {
            self.0.set(self.0.get() + 1);
            item.label
        }
    }

    fn merge_distances<T>(tree: &ClusterTree<T>) -> Vec<f64> {
        tree.internal_nodes()
            .filter_map(|(_, node)| node.child_distance)
            .collect()
    }

    #[test]
    fn test_empty_and_single_item() {
        let tree = cluster(Vec::<Point>::new(), &Line, &Line, &Line);
        assert!(tree.is_none());

        let tree = cluster(vec![point(1.0, "a")], &Line, &Line, &Line).unwrap();
        assert_eq!(tree.nnodes(), 1);
        assert_eq!(tree.nleaves(), 1);
        assert!(tree.is_leaf(tree.root()));
        assert_eq!(tree.children(tree.root()), None);
    }

    #[test]
    fn test_nearest_pairs_are_merged_first() {
        let items = vec![
            point(0.0, "a"),
            point(10.0, "b"),
            point(1.0, "c"),
            point(12.0, "d"),
        ];
        let tree = cluster(items, &Line, &Line, &Line).unwrap();

        assert_eq!(tree.nnodes(), 7);
        assert_eq!(tree.nleaves(), 4);
        assert_eq!(merge_distances(&tree), vec![1.0, 2.0, 10.5]);

        let (left, right) = tree.children(tree.root()).unwrap();
        assert_eq!(tree.item(left).x, 0.5);
        assert_eq!(tree.item(right).x, 11.0);
    }

    #[test]
    fn test_ties_follow_the_tie_break() {
        // (y, z) and (a, b) are both 1.0 apart, (a, b) sorts first
        let items = vec![
            point(20.0, "y"),
            point(21.0, "z"),
            point(0.0, "a"),
            point(1.0, "b"),
        ];
        let tree = cluster(items, &Line, &Line, &Line).unwrap();

        let (_, first_merge) = tree.internal_nodes().next().unwrap();
        assert_eq!(first_merge.item.label, "a");
        assert_eq!(first_merge.item.x, 0.5);
    }

    #[test]
    fn test_left_child_is_earlier_in_active_set() {
        let tree = cluster(vec![point(3.0, "b"), point(2.0, "a")], &Line, &Line, &Line).unwrap();

        let (left, right) = tree.children(tree.root()).unwrap();
        assert_eq!(tree.item(left).label, "b");
        assert_eq!(tree.item(right).label, "a");
        assert_eq!(tree.node(tree.root()).child_distance, Some(1.0));
    }

    #[test]
    fn test_keys_are_computed_once_per_cluster() {
        // every pair is equally distant, so every scan goes through the tie-break
        let items = vec![
            point(0.0, "d"),
            point(0.0, "c"),
            point(0.0, "b"),
            point(0.0, "a"),
            point(0.0, "e"),
        ];
        let keys = CountingKeys(Cell::new(0));
        let tree = cluster(items, &Line, &Line, &keys).unwrap();

        assert_eq!(tree.nnodes(), 9);
        assert_eq!(keys.0.get(), 9);
    }
}
