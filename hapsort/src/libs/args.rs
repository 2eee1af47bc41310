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

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::structs::{GenotypeWindow, SiteWindow};
use crate::utils::center_variant_idx;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
#[serde(default)]
pub struct ClusterArgs {
    /// Weight decay per site away from the center variant, in (0, 1]
    #[cfg_attr(feature = "clap", arg(long, default_value_t = 0.5))]
    pub alpha: f64,

    /// Index of the center variant (defaults to the median variant of the window)
    #[cfg_attr(feature = "clap", arg(short = 'c', long))]
    pub center: Option<usize>,

    /// Max amount of variants used for clustering on both sides of the center
    #[cfg_attr(feature = "clap", arg(long, default_value_t = 50))]
    pub max_variants_per_side: usize,

    /// Order of parent and child haplotypes in trio mode
    #[cfg_attr(feature = "clap", arg(long, value_enum, default_value_t = FamilyLayout::ChildCentered))]
    pub layout: FamilyLayout,
}

impl Default for ClusterArgs {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            center: None,
            max_variants_per_side: 50,
            layout: FamilyLayout::ChildCentered,
        }
    }
}

impl ClusterArgs {
    pub fn validate(&self) -> Result<()> {
        match self.alpha > 0.0 && self.alpha <= 1.0 {
            true => Ok(()),
            false => Err(Error::Alpha { alpha: self.alpha }),
        }
    }

    pub fn center_idx(&self, window: &GenotypeWindow) -> usize {
        center_variant_idx(window.nsites(), self.center)
    }

    /// Sites used for clustering, capped to max_variants_per_side around the center
    pub fn cluster_sites(&self, window: &GenotypeWindow) -> Result<SiteWindow> {
        self.validate()?;
        SiteWindow::around(
            self.center_idx(window),
            window.nsites(),
            self.max_variants_per_side,
        )
    }

    /// Trio windows are small, so every site is used
    pub fn trio_sites(&self, window: &GenotypeWindow) -> Result<SiteWindow> {
        self.validate()?;
        SiteWindow::full(window.nsites(), self.center_idx(window))
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum FamilyLayout {
    #[default]
    /// Parent haplotypes above and below the child, transmitted haplotypes next to the child
    ChildCentered,
    /// Child haplotypes first, then each parent with the transmitted haplotype first
    ChildFirst,
}

impl std::fmt::Display for FamilyLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Self::ChildCentered => write!(f, "Child centered"),
            Self::ChildFirst => write!(f, "Child first"),
        }
    }
}
