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

use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

#[rustfmt::skip]
#[derive(ThisError, Debug)]
pub enum Error {
    #[error("Site range {start}..{end} is not valid for a window of {nsites} sites")]
    SiteRange { start: usize, end: usize, nsites: usize },

    #[error("Center site {center} is outside of the site range {start}..{end}")]
    CenterOutOfRange { center: usize, start: usize, end: usize },

    #[error("Alpha must be in the range (0, 1], got {alpha}")]
    Alpha { alpha: f64 },

    #[error("Haplotype summary covers {found} sites but the distance window has {expected}")]
    WindowLenMismatch { expected: usize, found: usize },

    #[error("Site {site} has genotypes for {found} samples, expected {expected}")]
    SiteShape { site: usize, found: usize, expected: usize },

    #[error("Something failed in building the genotype matrix {0}")]
    ShapeError(#[from] ndarray::ShapeError),

    #[error("Sample {sample} was not found in the genotype window")]
    SampleNotFound { sample: String },

    #[error("A trio needs one or two parents, got {nparents}")]
    PedigreeShape { nparents: usize },

    #[error("Sample {sample} is used more than once in the same trio")]
    DuplicateTrioMember { sample: String },

    #[error("Failed to serialize the dendrogram: {0}")]
    Json(#[from] serde_json::Error),
}
