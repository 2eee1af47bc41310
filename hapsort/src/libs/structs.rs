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

use std::ops::Range;

use ndarray::{s, Array1, Array2, ArrayView1, Zip};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ploidy {
    Haploid,
    #[default]
    Diploid,
}

impl std::ops::Deref for Ploidy {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        match self {
            Ploidy::Haploid => &1,
            Ploidy::Diploid => &2,
        }
    }
}

/// A single genotype call. Negative allele indexes are missing alleles.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenotypeCall {
    pub allele_a: i32,
    pub allele_b: i32,
    pub phased: bool,
    pub haploid: bool,
}

impl GenotypeCall {
    pub fn phased(allele_a: i32, allele_b: i32) -> Self {
        Self {
            allele_a,
            allele_b,
            phased: true,
            haploid: false,
        }
    }

    pub fn unphased(allele_a: i32, allele_b: i32) -> Self {
        Self {
            allele_a,
            allele_b,
            phased: false,
            haploid: false,
        }
    }

    pub fn haploid(allele: i32) -> Self {
        Self {
            allele_a: allele,
            allele_b: -1,
            phased: false,
            haploid: true,
        }
    }

    pub fn missing() -> Self {
        Self::unphased(-1, -1)
    }

    /// True if each allele can be attributed to a haplotype copy
    pub fn is_resolved(&self) -> bool {
        self.phased || self.haploid || self.allele_a == self.allele_b
    }
}

/// Genotype calls of a window of variant sites, rows are sites and columns samples.
#[derive(Debug, Clone)]
pub struct GenotypeWindow {
    samples: Vec<String>,
    calls: Array2<GenotypeCall>,
}

impl GenotypeWindow {
    pub fn new(samples: Vec<String>, sites: Vec<Vec<GenotypeCall>>) -> Result<Self> {
        let nsamples = samples.len();

        if let Some((site, row)) = sites
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != nsamples)
        {
            return Err(Error::SiteShape {
                site,
                found: row.len(),
                expected: nsamples,
            });
        }

        let nsites = sites.len();
        let calls = Array2::from_shape_vec((nsites, nsamples), sites.into_iter().flatten().collect())?;

        Ok(Self { samples, calls })
    }

    pub fn nsites(&self) -> usize {
        self.calls.nrows()
    }

    pub fn nsamples(&self) -> usize {
        self.samples.len()
    }

    pub fn sample_calls(&self, sample: usize, sites: &SiteWindow) -> ArrayView1<'_, GenotypeCall> {
        self.calls.slice(s![sites.start..sites.end, sample])
    }

    pub fn sample_idx(&self, sample: &str) -> Result<usize> {
        self.samples
            .iter()
            .position(|s| s == sample)
            .ok_or_else(|| Error::SampleNotFound {
                sample: sample.to_string(),
            })
    }

    /// A sample is haploid only if every call inside the sites is flagged haploid
    pub fn ploidy(&self, sample: usize, sites: &SiteWindow) -> Ploidy {
        let calls = self.sample_calls(sample, sites);

        match !calls.is_empty() && calls.iter().all(|call| call.haploid) {
            true => Ploidy::Haploid,
            false => Ploidy::Diploid,
        }
    }

    /// Unclustered order of the haplotypes, sample by sample
    pub fn file_order(&self) -> Vec<HaploId> {
        let all_sites = SiteWindow {
            start: 0,
            end: self.nsites(),
            center: 0,
            nsites: self.nsites(),
        };

        (0..self.nsamples())
            .flat_map(|sample| {
                let ploidy = self.ploidy(sample, &all_sites);
                (0..*ploidy).map(move |hap| HaploId::new(sample, hap))
            })
            .collect()
    }
}

/// Haplotype identifier, sample index * 2 + haplotype (0 or 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HaploId(usize);

impl HaploId {
    pub fn new(sample: usize, hap: usize) -> Self {
        debug_assert!(hap < 2, "Only diploid genotypes are supported");
        Self(sample * 2 + hap)
    }

    pub fn sample(&self) -> usize {
        self.0 / 2
    }

    pub fn hap(&self) -> usize {
        self.0 % 2
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Half-open range of variant sites [start, end) anchored at an absolute center site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteWindow {
    start: usize,
    end: usize,
    center: usize,
    nsites: usize,
}

impl SiteWindow {
    pub fn new(start: usize, end: usize, center: usize, nsites: usize) -> Result<Self> {
        if start > end || end > nsites {
            return Err(Error::SiteRange { start, end, nsites });
        }

        // An empty window can only be anchored at its own start
        let is_empty_anchor = start == end && center == start;

        if !(start..end).contains(&center) && !is_empty_anchor {
            return Err(Error::CenterOutOfRange { center, start, end });
        }

        Ok(Self {
            start,
            end,
            center,
            nsites,
        })
    }

    /// At most max_per_side sites to both sides of the center
    pub fn around(center: usize, nsites: usize, max_per_side: usize) -> Result<Self> {
        let start = center.saturating_sub(max_per_side);
        let end = nsites.min(center.saturating_add(max_per_side).saturating_add(1));

        Self::new(start, end, center, nsites)
    }

    pub fn full(nsites: usize, center: usize) -> Result<Self> {
        Self::new(0, nsites, center, nsites)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn center(&self) -> usize {
        self.center
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn relative_center(&self) -> usize {
        self.center - self.start
    }

    /// Sites before the window were left out
    pub fn is_clipped_start(&self) -> bool {
        self.start > 0
    }

    /// Sites after the window were left out
    pub fn is_clipped_end(&self) -> bool {
        self.end < self.nsites
    }

    pub fn check(&self, nsites: usize) -> Result<()> {
        match self.end > nsites {
            true => Err(Error::SiteRange {
                start: self.start,
                end: self.end,
                nsites,
            }),
            false => Ok(()),
        }
    }
}

/// Allele counts of one haplotype, or of a cluster of haplotypes.
///
/// The alternate allele count is derived: leaf_count - ref_counts - unk_counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HaplotypeSummary {
    pub ref_counts: Array1<u32>,
    pub unk_counts: Array1<u32>,
    pub leaf_count: u32,
    pub haplo_id: HaploId,
}

impl HaplotypeSummary {
    pub fn new_leaf(haplo_id: HaploId, len: usize) -> Self {
        Self {
            ref_counts: Array1::zeros(len),
            unk_counts: Array1::zeros(len),
            leaf_count: 1,
            haplo_id,
        }
    }

    pub fn window_len(&self) -> usize {
        self.ref_counts.len()
    }

    pub fn observe(&mut self, site_ix: usize, allele: i32) {
        match allele {
            a if a < 0 => self.unk_counts[site_ix] += 1,
            0 => self.ref_counts[site_ix] += 1,
            _ => (),
        }
    }

    pub fn mark_unknown(&mut self, site_ix: usize) {
        self.unk_counts[site_ix] += 1;
    }

    pub fn alt_count(&self, site_ix: usize) -> u32 {
        self.leaf_count - self.ref_counts[site_ix] - self.unk_counts[site_ix]
    }

    /// Majority vote, ties go to the reference allele
    pub fn is_ref(&self, site_ix: usize) -> bool {
        self.ref_counts[site_ix] >= self.alt_count(site_ix)
    }

    /// Sum the counts of two clusters, the id of self is retained
    pub fn merge(&self, other: &Self) -> Self {
        assert!(
            self.leaf_count > 0 && other.leaf_count > 0,
            "An empty haplotype slot reached a cluster merge"
        );
        assert_eq!(
            self.window_len(),
            other.window_len(),
            "Merged haplotype summaries cover different windows"
        );

        Self {
            ref_counts: &self.ref_counts + &other.ref_counts,
            unk_counts: &self.unk_counts + &other.unk_counts,
            leaf_count: self.leaf_count + other.leaf_count,
            haplo_id: self.haplo_id,
        }
    }

    /// Majority alleles as '0' (ref) and '1' (alt)
    pub fn allele_string(&self) -> String {
        (0..self.window_len())
            .map(|site_ix| match self.is_ref(site_ix) {
                true => '0',
                false => '1',
            })
            .collect()
    }

    /// Mouseover label, i.e. "N=3 01[*]1". Sites with both alleles present are marked with '*',
    /// "..." marks sites left out of the clustering window.
    pub fn consensus(&self, sites: &SiteWindow) -> String {
        let center = sites.relative_center();
        let mut label = format!("N={} ", self.leaf_count);

        if sites.is_clipped_start() {
            label.push_str("...");
        }

        for site_ix in 0..self.window_len() {
            let symbol = match self.ref_counts[site_ix] > 0 && self.alt_count(site_ix) > 0 {
                true => '*',
                false if self.is_ref(site_ix) => '0',
                false => '1',
            };

            match site_ix == center {
                true => label.push_str(&format!("[{symbol}]")),
                false => label.push(symbol),
            }
        }

        if sites.is_clipped_end() {
            label.push_str("...");
        }

        label
    }

    pub fn is_consistent(&self) -> bool {
        self.ref_counts.len() == self.unk_counts.len()
            && Zip::from(&self.ref_counts)
                .and(&self.unk_counts)
                .all(|&r, &u| r + u <= self.leaf_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: usize, alleles: &[i32]) -> HaplotypeSummary {
        let mut summary = HaplotypeSummary::new_leaf(HaploId(id), alleles.len());
        for (site_ix, allele) in alleles.iter().enumerate() {
            summary.observe(site_ix, *allele);
        }
        summary
    }

    #[test]
    fn test_genotype_call_resolution() {
        assert!(GenotypeCall::phased(0, 1).is_resolved());
        assert!(GenotypeCall::haploid(1).is_resolved());
        assert!(GenotypeCall::unphased(1, 1).is_resolved());
        assert!(GenotypeCall::missing().is_resolved());
        assert!(!GenotypeCall::unphased(0, 1).is_resolved());
    }

    #[test]
    fn test_window_rejects_ragged_rows() {
        let samples = vec!["S1".to_string(), "S2".to_string()];
        let sites = vec![
            vec![GenotypeCall::phased(0, 1), GenotypeCall::phased(0, 0)],
            vec![GenotypeCall::phased(0, 1)],
        ];

        let err = GenotypeWindow::new(samples, sites).unwrap_err();
        assert!(matches!(
            err,
            Error::SiteShape { site: 1, found: 1, expected: 2 }
        ));
    }

    #[test]
    fn test_sample_lookup_and_file_order() {
        let samples = vec!["S1".to_string(), "S2".to_string()];
        let sites = vec![
            vec![GenotypeCall::phased(0, 1), GenotypeCall::haploid(1)],
            vec![GenotypeCall::phased(1, 1), GenotypeCall::haploid(0)],
        ];
        let window = GenotypeWindow::new(samples, sites).unwrap();

        assert_eq!(window.sample_idx("S2").unwrap(), 1);
        assert!(window.sample_idx("S3").is_err());
        assert_eq!(
            window.file_order(),
            vec![HaploId(0), HaploId(1), HaploId(2)]
        );
    }

    #[test]
    fn test_haplo_id_parts() {
        let id = HaploId::new(7, 1);
        assert_eq!(id.index(), 15);
        assert_eq!(id.sample(), 7);
        assert_eq!(id.hap(), 1);
    }

    #[test]
    fn test_site_window_bounds() {
        assert!(SiteWindow::new(0, 3, 1, 3).is_ok());
        assert!(SiteWindow::new(0, 0, 0, 3).is_ok());
        assert!(matches!(
            SiteWindow::new(2, 1, 1, 3),
            Err(Error::SiteRange { .. })
        ));
        assert!(matches!(
            SiteWindow::new(0, 4, 1, 3),
            Err(Error::SiteRange { .. })
        ));
        assert!(matches!(
            SiteWindow::new(0, 3, 3, 3),
            Err(Error::CenterOutOfRange { .. })
        ));

        let sites = SiteWindow::around(10, 100, 4).unwrap();
        assert_eq!((sites.start(), sites.end()), (6, 15));
        assert_eq!(sites.relative_center(), 4);

        let sites = SiteWindow::around(1, 5, 50).unwrap();
        assert_eq!((sites.start(), sites.end(), sites.len()), (0, 5, 5));
    }

    #[test]
    fn test_majority_vote_ties_favor_ref() {
        let merged = leaf(0, &[0, 1, -1]).merge(&leaf(1, &[1, 1, 0]));

        assert_eq!(merged.ref_counts.to_vec(), vec![1, 0, 1]);
        assert_eq!(merged.unk_counts.to_vec(), vec![0, 0, 1]);
        assert_eq!(merged.alt_count(0), 1);
        assert!(merged.is_ref(0));
        assert!(!merged.is_ref(1));
        assert!(merged.is_ref(2));
        assert_eq!(merged.allele_string(), "010");
    }

    #[test]
    fn test_merge_is_additive() {
        let a = leaf(4, &[0, 0, 1, -1]);
        let b = leaf(9, &[1, 0, -1, -1]).merge(&leaf(2, &[0, 1, 1, 0]));
        let merged = a.merge(&b);

        assert_eq!(merged.leaf_count, a.leaf_count + b.leaf_count);
        assert_eq!(merged.ref_counts, &a.ref_counts + &b.ref_counts);
        assert_eq!(merged.unk_counts, &a.unk_counts + &b.unk_counts);
        assert_eq!(merged.haplo_id, HaploId(4));
        assert!(merged.is_consistent());
    }

    #[test]
    #[should_panic(expected = "An empty haplotype slot reached a cluster merge")]
    fn test_merge_rejects_empty_slot() {
        let mut empty = leaf(1, &[0]);
        empty.leaf_count = 0;
        empty.ref_counts[0] = 0;
        leaf(0, &[0]).merge(&empty);
    }

    #[test]
    fn test_consensus_label() {
        let merged = leaf(0, &[0, 1, 0]).merge(&leaf(1, &[0, 0, 1]));
        let sites = SiteWindow::full(3, 1).unwrap();
        assert_eq!(merged.consensus(&sites), "N=2 0[*]*");

        let sites = SiteWindow::new(2, 4, 3, 6).unwrap();
        assert_eq!(leaf(3, &[1, 0]).consensus(&sites), "N=1 ...1[0]...");

        let sites = SiteWindow::new(0, 2, 0, 3).unwrap();
        assert_eq!(leaf(3, &[1, 1]).consensus(&sites), "N=1 [1]1...");
    }

    #[test]
    fn test_site_window_clipping() {
        let sites = SiteWindow::around(1, 10, 2).unwrap();
        assert!(!sites.is_clipped_start());
        assert!(sites.is_clipped_end());

        let sites = SiteWindow::around(8, 10, 2).unwrap();
        assert!(sites.is_clipped_start());
        assert!(!sites.is_clipped_end());

        let sites = SiteWindow::full(10, 5).unwrap();
        assert!(!sites.is_clipped_start() && !sites.is_clipped_end());
    }
}
