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

// The median site is used when no center was requested, requests past the end snap to the last site
pub fn center_variant_idx(nsites: usize, requested: Option<usize>) -> usize {
    match requested {
        Some(idx) => idx.min(nsites.saturating_sub(1)),
        None => nsites.saturating_sub(1) / 2,
    }
}

// Weight of every site: alpha^|site - center|
pub fn alpha_weights(center: usize, len: usize, alpha: f64) -> Vec<f64> {
    let mut weights = vec![0.0; len];

    let mut weight = 1.0;
    for site_ix in (0..len.min(center + 1)).rev() {
        weights[site_ix] = weight;
        weight *= alpha;
    }

    let mut weight = alpha;
    for w in weights.iter_mut().skip(center + 1) {
        *w = weight;
        weight *= alpha;
    }

    weights
}
