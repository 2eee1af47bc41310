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

use crate::error::{Error, Result};
use crate::structs::{GenotypeWindow, HaploId, HaplotypeSummary, Ploidy, SiteWindow};

/// Builds the leaves of the cluster forest for the given samples.
///
/// All first haplotypes come first in sample order, followed by the second haplotypes. Samples
/// that are haploid over the whole site window do not get a second leaf.
pub fn summarize_haplotypes(
    window: &GenotypeWindow,
    sites: &SiteWindow,
    samples: &[usize],
) -> Result<Vec<HaplotypeSummary>> {
    sites.check(window.nsites())?;

    if let Some(sample) = samples.iter().find(|sample| **sample >= window.nsamples()) {
        return Err(Error::SampleNotFound {
            sample: sample.to_string(),
        });
    }

    let len = sites.len();
    let mut first_haps = Vec::with_capacity(samples.len());
    let mut second_haps = Vec::with_capacity(samples.len());

    for &sample in samples {
        let mut hap_a = HaplotypeSummary::new_leaf(HaploId::new(sample, 0), len);
        let mut hap_b = HaplotypeSummary::new_leaf(HaploId::new(sample, 1), len);

        for (site_ix, call) in window.sample_calls(sample, sites).iter().enumerate() {
            if !call.is_resolved() {
                hap_a.mark_unknown(site_ix);
                hap_b.mark_unknown(site_ix);
                continue;
            }

            hap_a.observe(site_ix, call.allele_a);
            match call.haploid {
                true => hap_b.mark_unknown(site_ix),
                false => hap_b.observe(site_ix, call.allele_b),
            }
        }

        first_haps.push(hap_a);
        if window.ploidy(sample, sites) == Ploidy::Diploid {
            second_haps.push(hap_b);
        }
    }

    let npruned = samples.len() - second_haps.len();
    if npruned > 0 {
        tracing::debug!("Pruned {npruned} empty haplotype slots of haploid samples");
    }

    first_haps.extend(second_haps);
    Ok(first_haps)
}
