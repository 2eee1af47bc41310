#![allow(dead_code)]
use color_eyre::Result;
use rand::{rngs::StdRng, Rng};

use hapsort::structs::{GenotypeCall, GenotypeWindow};

pub const SEED: u64 = 5213;

fn allele(symbol: u8) -> i32 {
    match symbol {
        b'.' => -1,
        s => (s - b'0') as i32,
    }
}

pub fn sample_names(nsamples: usize) -> Vec<String> {
    (0..nsamples).map(|i| format!("sample_{i}")).collect()
}

/// Phased window from one (first, second) haplotype pair per sample. '.' is a missing allele.
pub fn phased_window(haps: &[(&str, &str)]) -> Result<GenotypeWindow> {
    build_window(sample_names(haps.len()), haps)
}

/// Same as [phased_window] but with named samples
pub fn named_window(haps: &[(&str, &str, &str)]) -> Result<GenotypeWindow> {
    let names = haps.iter().map(|(name, _, _)| name.to_string()).collect();
    let pairs = haps.iter().map(|(_, a, b)| (*a, *b)).collect::<Vec<_>>();
    build_window(names, &pairs)
}

fn build_window(names: Vec<String>, haps: &[(&str, &str)]) -> Result<GenotypeWindow> {
    let nsites = haps.first().map(|(a, _)| a.len()).unwrap_or(0);

    let sites = (0..nsites)
        .map(|site| {
            haps.iter()
                .map(|(a, b)| {
                    GenotypeCall::phased(allele(a.as_bytes()[site]), allele(b.as_bytes()[site]))
                })
                .collect()
        })
        .collect();

    Ok(GenotypeWindow::new(names, sites)?)
}

/// Random genotypes with missing, unphased and haploid calls. Every fourth sample is haploid.
pub fn random_window(rng: &mut StdRng, nsites: usize, nsamples: usize) -> Result<GenotypeWindow> {
    let sites = (0..nsites)
        .map(|_| {
            (0..nsamples)
                .map(|sample| {
                    if sample % 4 == 3 {
                        return GenotypeCall::haploid(rng.gen_range(-1..2));
                    }
                    let (a, b) = (rng.gen_range(0..2), rng.gen_range(0..2));
                    match rng.gen_range(0..10) {
                        0 => GenotypeCall::missing(),
                        1 | 2 => GenotypeCall::unphased(a, b),
                        _ => GenotypeCall::phased(a, b),
                    }
                })
                .collect()
        })
        .collect();

    Ok(GenotypeWindow::new(sample_names(nsamples), sites)?)
}
