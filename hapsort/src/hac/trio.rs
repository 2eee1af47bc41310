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

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::args::FamilyLayout;
use crate::error::{Error, Result};
use crate::structs::{GenotypeWindow, HaploId, HaplotypeSummary, SiteWindow};

use super::distance::CenterWeightedAlpha;
use super::engine::DistanceFn;
use super::summarize::summarize_haplotypes;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrixCell {
    pub child_hap: HaploId,
    pub parent_hap: HaploId,
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HaplotypeLabel {
    Transmitted,
    Untransmitted,
    Child,
}

impl std::fmt::Display for HaplotypeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Self::Transmitted => write!(f, "transmitted"),
            Self::Untransmitted => write!(f, "untransmitted"),
            Self::Child => write!(f, "child"),
        }
    }
}

/// Parent haplotype a child haplotype was most likely inherited from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleHaplotypeAssignment {
    pub child_hap: HaploId,
    pub matched: Option<DistanceMatrixCell>,
}

impl SampleHaplotypeAssignment {
    pub fn parent_hap(&self) -> Option<HaploId> {
        self.matched.map(|cell| cell.parent_hap)
    }

    pub fn distance(&self) -> Option<f64> {
        self.matched.map(|cell| cell.distance)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrioMatch {
    /// Draw order of all trio haplotypes
    pub order: Vec<HaploId>,
    /// Label of every haplotype in draw order
    pub labels: IndexMap<HaploId, HaplotypeLabel>,
    /// One assignment per child haplotype
    pub assignments: Vec<SampleHaplotypeAssignment>,
}

// Candidates of a single child haplotype, ranked[parent][rank]
type Ranked = Vec<Vec<DistanceMatrixCell>>;

/// Match the child haplotypes to the haplotypes of one or two parents.
///
/// Each child haplotype is assigned to the closest haplotype of a different parent. When both
/// child haplotypes nominate the same parent, the second one moves to the other parent, and if
/// swapping the two nominations gives a strictly lower total distance the swap is used instead.
/// With a single parent only the closer child haplotype gets assigned. A haploid child is
/// matched to its closest parent haplotype without any conflict resolution.
pub fn match_trio(
    window: &GenotypeWindow,
    sites: &SiteWindow,
    alpha: f64,
    child: &str,
    parents: &[&str],
    layout: FamilyLayout,
) -> Result<TrioMatch> {
    if parents.is_empty() || parents.len() > 2 {
        return Err(Error::PedigreeShape {
            nparents: parents.len(),
        });
    }

    if let Some(sample) = std::iter::once(&child).chain(parents).duplicates().next() {
        return Err(Error::DuplicateTrioMember {
            sample: sample.to_string(),
        });
    }

    let child_idx = window.sample_idx(child)?;
    let parent_idxs = parents
        .iter()
        .map(|parent| window.sample_idx(parent))
        .collect::<Result<Vec<usize>>>()?;

    tracing::debug!(
        "Matching the haplotypes of {child} to {parents:?} over sites {:?}",
        sites.range()
    );

    let metric = CenterWeightedAlpha::new(sites.relative_center(), sites.len(), alpha)?;
    let child_haps = summarize_haplotypes(window, sites, &[child_idx])?;
    let parent_haps = parent_idxs
        .iter()
        .map(|parent_idx| summarize_haplotypes(window, sites, &[*parent_idx]))
        .collect::<Result<Vec<_>>>()?;

    let ranked: Vec<Ranked> = child_haps
        .iter()
        .map(|child_hap| {
            parent_haps
                .iter()
                .map(|haps| rank_candidates(&metric, child_hap, haps))
                .collect()
        })
        .collect();

    let matches = match (ranked.as_slice(), parent_haps.len()) {
        ([only], _) => vec![Some(only[nominate(only)][0])],
        ([first, second], 1) => one_parent(first, second),
        ([first, second], _) => two_parents(first, second),
        _ => vec![None; ranked.len()],
    };

    let assignments = child_haps
        .iter()
        .zip(matches)
        .map(|(child_hap, matched)| SampleHaplotypeAssignment {
            child_hap: child_hap.haplo_id,
            matched,
        })
        .collect_vec();

    let order = family_order(&assignments, &parent_haps, layout);
    let labels = order
        .iter()
        .map(|haplo_id| {
            let label = match haplo_id.sample() == child_idx {
                true => HaplotypeLabel::Child,
                false if assignments.iter().any(|a| a.parent_hap() == Some(*haplo_id)) => {
                    HaplotypeLabel::Transmitted
                }
                false => HaplotypeLabel::Untransmitted,
            };
            (*haplo_id, label)
        })
        .collect();

    Ok(TrioMatch {
        order,
        labels,
        assignments,
    })
}

// Sorted by distance, ties by parent haplotype id
fn rank_candidates(
    metric: &CenterWeightedAlpha,
    child_hap: &HaplotypeSummary,
    parent_haps: &[HaplotypeSummary],
) -> Vec<DistanceMatrixCell> {
    parent_haps
        .iter()
        .map(|parent_hap| DistanceMatrixCell {
            child_hap: child_hap.haplo_id,
            parent_hap: parent_hap.haplo_id,
            distance: metric.distance(child_hap, parent_hap),
        })
        .sorted_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.parent_hap.cmp(&b.parent_hap))
        })
        .collect()
}

// Parent with the closest top candidate, the first parent on ties
fn nominate(ranked: &Ranked) -> usize {
    (0..ranked.len())
        .min_by(|a, b| ranked[*a][0].distance.total_cmp(&ranked[*b][0].distance))
        .unwrap_or(0)
}

fn one_parent(first: &Ranked, second: &Ranked) -> Vec<Option<DistanceMatrixCell>> {
    let (a, b) = (first[0][0], second[0][0]);

    match b.distance < a.distance {
        true => vec![None, Some(b)],
        false => vec![Some(a), None],
    }
}

fn two_parents(first: &Ranked, second: &Ranked) -> Vec<Option<DistanceMatrixCell>> {
    let p0 = nominate(first);
    let mut p1 = nominate(second);

    if p1 == p0 {
        tracing::trace!("Both child haplotypes nominate parent {p0}, moving the second one");
        p1 = 1 - p0;
    }

    let naive = [first[p0][0], second[p1][0]];
    let swapped = [first[p1][0], second[p0][0]];
    let total = |cells: &[DistanceMatrixCell; 2]| cells.iter().map(|c| c.distance).sum::<f64>();

    let cells = match total(&swapped) < total(&naive) {
        true => {
            tracing::debug!(
                "Rolling back the nominations, swapped total {} < {}",
                total(&swapped),
                total(&naive)
            );
            swapped
        }
        false => naive,
    };

    cells.into_iter().map(Some).collect()
}

fn family_order(
    assignments: &[SampleHaplotypeAssignment],
    parent_haps: &[Vec<HaplotypeSummary>],
    layout: FamilyLayout,
) -> Vec<HaploId> {
    let is_transmitted = |id: &HaploId| assignments.iter().any(|a| a.parent_hap() == Some(*id));

    // (transmitted, untransmitted) per parent
    let parent_lines = parent_haps
        .iter()
        .map(|haps| {
            haps.iter()
                .map(|hap| hap.haplo_id)
                .partition::<Vec<HaploId>, _>(is_transmitted)
        })
        .collect_vec();

    let from_parent = |parent: &[HaplotypeSummary]| {
        assignments
            .iter()
            .filter(|a| {
                a.parent_hap()
                    .is_some_and(|id| parent.iter().any(|hap| hap.haplo_id == id))
            })
            .map(|a| a.child_hap)
            .collect_vec()
    };

    let mut child_lines = parent_haps
        .iter()
        .flat_map(|haps| from_parent(haps.as_slice()))
        .collect_vec();
    child_lines.extend(
        assignments
            .iter()
            .filter(|a| a.matched.is_none())
            .map(|a| a.child_hap),
    );

    let mut order = Vec::with_capacity(child_lines.len() + 2 * parent_lines.len());

    match layout {
        FamilyLayout::ChildCentered => {
            for (parent_ix, (transmitted, untransmitted)) in parent_lines.iter().enumerate() {
                match parent_ix {
                    0 => {
                        order.extend(untransmitted);
                        order.extend(transmitted);
                        order.extend(&child_lines);
                    }
                    _ => {
                        order.extend(transmitted);
                        order.extend(untransmitted);
                    }
                }
            }
        }
        FamilyLayout::ChildFirst => {
            order.extend(&child_lines);
            for (transmitted, untransmitted) in &parent_lines {
                order.extend(transmitted);
                order.extend(untransmitted);
            }
        }
    }

    order
}
