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

//! HAPSORT - Haplotype sorting for variant tracks
//!
//! This library orders the haplotypes of a genotyped VCF window so that similar
//! haplotypes are drawn next to each other.
//!
//! * Summarize per-sample genotype calls into per-haplotype allele counts
//! * Cluster the haplotypes with a center-weighted distance
//! * Derive a draw order (heavier subtree first) and a dendrogram
//! * Match a child's haplotypes to the haplotypes of one or two parents
//!
//! # Getting started
//!
//! ```ignore
//! use hapsort::args::ClusterArgs;
//! use hapsort::hac::draw_order_or_file_order;
//!
//! let order = draw_order_or_file_order(&window, &ClusterArgs::default());
//! ```
//!
//! The engine does no I/O. Genotypes are handed over in a [`structs::GenotypeWindow`]
//! by whatever reads the VCF.

/// Clustering configuration
pub mod args;

#[doc(hidden)]
pub mod error;

/// HAPSORT structs
pub mod structs;

#[doc(hidden)]
pub mod utils;
