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
use crate::structs::HaplotypeSummary;
use crate::utils::alpha_weights;

use super::engine::{DistanceFn, MergeFn, TieBreakFn};

/// Center-weighted alpha distance: a majority allele mismatch at site s costs alpha^|s - center|.
#[derive(Debug, Clone, PartialEq)]
pub struct CenterWeightedAlpha {
    weights: Vec<f64>,
}

impl CenterWeightedAlpha {
    /// center is relative to the start of the summarized window
    pub fn new(center: usize, len: usize, alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(Error::Alpha { alpha });
        }

        if center >= len && !(center == 0 && len == 0) {
            return Err(Error::CenterOutOfRange {
                center,
                start: 0,
                end: len,
            });
        }

        Ok(Self {
            weights: alpha_weights(center, len, alpha),
        })
    }

    pub fn window_len(&self) -> usize {
        self.weights.len()
    }

    /// Checked version of the metric for summaries coming from outside the engine
    pub fn try_distance(&self, a: &HaplotypeSummary, b: &HaplotypeSummary) -> Result<f64> {
        for summary in [a, b] {
            if summary.window_len() != self.window_len() {
                return Err(Error::WindowLenMismatch {
                    expected: self.window_len(),
                    found: summary.window_len(),
                });
            }
        }

        Ok(self.weighted_mismatches(a, b))
    }

    fn weighted_mismatches(&self, a: &HaplotypeSummary, b: &HaplotypeSummary) -> f64 {
        self.weights
            .iter()
            .enumerate()
            .filter(|(site_ix, _)| a.is_ref(*site_ix) != b.is_ref(*site_ix))
            .fold(0.0, |acc, (_, weight)| acc + weight)
    }
}

impl DistanceFn<HaplotypeSummary> for CenterWeightedAlpha {
    fn distance(&self, a: &HaplotypeSummary, b: &HaplotypeSummary) -> f64 {
        assert!(
            a.window_len() == self.window_len() && b.window_len() == self.window_len(),
            "Haplotype summaries do not cover the sites of the distance window"
        );
        self.weighted_mismatches(a, b)
    }
}

impl MergeFn<HaplotypeSummary> for CenterWeightedAlpha {
    fn merge(&self, a: &HaplotypeSummary, b: &HaplotypeSummary) -> HaplotypeSummary {
        a.merge(b)
    }
}

impl TieBreakFn<HaplotypeSummary> for CenterWeightedAlpha {
    type Key = String;

    fn key(&self, item: &HaplotypeSummary) -> String {
        item.allele_string()
    }
}
