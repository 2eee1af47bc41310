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

use std::time::Instant;

use itertools::Itertools;
use rayon::prelude::*;

use crate::args::ClusterArgs;
use crate::error::Result;
use crate::structs::{GenotypeWindow, HaploId, HaplotypeSummary, SiteWindow};

pub mod distance;
pub mod engine;
pub mod order;
pub mod summarize;
pub mod tree;
pub mod trio;

pub use distance::CenterWeightedAlpha;
pub use engine::{cluster, DistanceFn, MergeFn, TieBreakFn};
pub use summarize::summarize_haplotypes;
pub use tree::{Branch, ClusterNode, ClusterTree, Dendrogram};
pub use trio::{
    match_trio, DistanceMatrixCell, HaplotypeLabel, SampleHaplotypeAssignment, TrioMatch,
};

/// Result of one clustering request
#[derive(Debug, Clone)]
pub struct HaplotypeClustering {
    /// None when the window has no samples
    pub tree: Option<ClusterTree<HaplotypeSummary>>,
    pub order: Vec<HaploId>,
    pub sites: SiteWindow,
}

impl HaplotypeClustering {
    pub fn dendrogram(&self) -> Option<Dendrogram> {
        self.tree
            .as_ref()
            .map(|tree| tree.dendrogram(&self.sites))
    }
}

/// Cluster every haplotype of the window over the given sites.
///
/// The engine is O(N^3) in the number of haplotypes, use [ClusterArgs::cluster_sites] or a
/// similarly capped site window for interactive requests.
pub fn cluster_haplotypes(
    window: &GenotypeWindow,
    sites: &SiteWindow,
    alpha: f64,
) -> Result<HaplotypeClustering> {
    let now = Instant::now();

    let samples = (0..window.nsamples()).collect_vec();
    let leaves = summarize_haplotypes(window, sites, &samples)?;
    let metric = CenterWeightedAlpha::new(sites.relative_center(), sites.len(), alpha)?;

    let nleaves = leaves.len();
    tracing::debug!(
        "Clustering {nleaves} haplotypes over sites {:?} centered at {} with alpha {alpha}",
        sites.range(),
        sites.center()
    );

    let tree = cluster(leaves, &metric, &metric, &metric);
    let order = tree
        .as_ref()
        .map(|tree| tree.haplotype_order())
        .unwrap_or_default();

    tracing::info!("Clustered {nleaves} haplotypes in {:.2?}.", now.elapsed());

    Ok(HaplotypeClustering {
        tree,
        order,
        sites: *sites,
    })
}

/// Independent clustering requests over the same genotypes, results are in request order
pub fn cluster_many(
    window: &GenotypeWindow,
    site_windows: &[SiteWindow],
    alpha: f64,
) -> Vec<Result<HaplotypeClustering>> {
    site_windows
        .par_iter()
        .map(|sites| cluster_haplotypes(window, sites, alpha))
        .collect()
}

/// Clustered haplotype order, or the file order if the request cannot be clustered
pub fn draw_order_or_file_order(window: &GenotypeWindow, args: &ClusterArgs) -> Vec<HaploId> {
    let clustering = args
        .cluster_sites(window)
        .and_then(|sites| cluster_haplotypes(window, &sites, args.alpha));

    match clustering {
        Ok(clustering) => clustering.order,
        Err(e) => {
            tracing::warn!("Haplotypes are drawn in file order, clustering failed: {e}");
            window.file_order()
        }
    }
}

/// Trio match over every site of the window with the configured alpha, center and layout
pub fn trio_order(
    window: &GenotypeWindow,
    args: &ClusterArgs,
    child: &str,
    parents: &[&str],
) -> Result<TrioMatch> {
    let sites = args.trio_sites(window)?;
    match_trio(window, &sites, args.alpha, child, parents, args.layout)
}
