/*!
# Orientors
Strategies that turn a variant and its genotype into the candidate allele-to-haplotype assignments the search may include.
Each strategy is a pure function of the variant; the same variant always produces the same orientations in the same order.
Orientations that would not change either haplotype are never produced, so such variants can only be excluded.
*/
use serde::Serialize;
use strum_macros::EnumString;

use crate::data_types::oriented_variant::{Haplotype, OrientedVariant};
use crate::data_types::variants::Variant;

#[derive(thiserror::Error, Debug)]
pub enum OrientorError {
    #[error("{orientor} orientor does not support ploidy {ploidy} (variant {variant})")]
    UnsupportedPloidy { orientor: Orientor, ploidy: usize, variant: String },
    #[error("{orientor} orientor requires a genotype (variant {variant})")]
    MissingGenotype { orientor: Orientor, variant: String }
}

/// The available orientation strategies
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, strum_macros::Display, EnumString, Serialize, clap::ValueEnum)]
pub enum Orientor {
    /// Collapses ploidy, each distinct called ALT allele is tried on both haplotypes
    #[strum(ascii_case_insensitive, serialize = "squash")]
    #[clap(name = "squash")]
    Squash,
    /// Heterozygous genotypes are tried in both haplotype assignments
    #[default]
    #[strum(ascii_case_insensitive, serialize = "unphased")]
    #[clap(name = "unphased")]
    Unphased,
    /// Phased heterozygous genotypes are only tried in the reported assignment
    #[strum(ascii_case_insensitive, serialize = "phased")]
    #[clap(name = "phased")]
    Phased,
    /// Phased heterozygous genotypes are only tried in the inverse of the reported assignment
    #[strum(ascii_case_insensitive, serialize = "phase_inverted")]
    #[clap(name = "phase_inverted")]
    PhaseInverted,
    /// Allows partial genotype matches, i.e. each called ALT against REF on either haplotype
    #[strum(ascii_case_insensitive, serialize = "allele_gt")]
    #[clap(name = "allele_gt")]
    AlleleGt,
    /// Ignores the genotype, each ALT allele is tried on both haplotypes
    #[strum(ascii_case_insensitive, serialize = "haploid_pop")]
    #[clap(name = "haploid_pop")]
    HaploidPop,
    /// Ignores the genotype, every diploid combination of ALT and missing alleles is tried
    #[strum(ascii_case_insensitive, serialize = "diploid_pop")]
    #[clap(name = "diploid_pop")]
    DiploidPop,
}

impl Orientor {
    /// Verifies that this strategy can handle a variant, so configuration problems surface before any search starts.
    /// # Arguments
    /// * `variant` - the variant to check
    /// # Errors
    /// * if a genotype-driven strategy receives a variant with no genotype
    /// * if a diploid strategy receives a genotype with ploidy above two
    pub fn check(&self, variant: &Variant) -> Result<(), OrientorError> {
        match self {
            Orientor::HaploidPop |
            Orientor::DiploidPop => Ok(()),
            Orientor::Squash => {
                if variant.ploidy() == 0 {
                    Err(OrientorError::MissingGenotype { orientor: *self, variant: variant.to_string() })
                } else {
                    Ok(())
                }
            },
            Orientor::Unphased |
            Orientor::Phased |
            Orientor::PhaseInverted |
            Orientor::AlleleGt => {
                match variant.ploidy() {
                    0 => Err(OrientorError::MissingGenotype { orientor: *self, variant: variant.to_string() }),
                    1 | 2 => Ok(()),
                    ploidy => Err(OrientorError::UnsupportedPloidy { orientor: *self, ploidy, variant: variant.to_string() })
                }
            }
        }
    }

    /// Generates the candidate orientations for a variant.
    /// Callers are expected to have run `check()` on the variant first.
    /// # Arguments
    /// * `variant` - the variant to orient
    pub fn orientations<'a>(&self, variant: &'a Variant) -> Vec<OrientedVariant<'a>> {
        let candidates = match self {
            Orientor::Squash => squash(variant),
            Orientor::Unphased => unphased(variant),
            Orientor::Phased => phased(variant, false),
            Orientor::PhaseInverted => phased(variant, true),
            Orientor::AlleleGt => allele_gt(variant),
            Orientor::HaploidPop => haploid_population(variant),
            Orientor::DiploidPop => diploid_population(variant)
        };
        candidates.into_iter()
            .filter(changes_haplotype)
            .collect()
    }
}

/// True if at least one of the haplotypes would be changed by this orientation
fn changes_haplotype(ov: &OrientedVariant) -> bool {
    [Haplotype::A, Haplotype::B].into_iter()
        .any(|h| ov.allele(h).is_some_and(|a| !a.is_empty_insertion()))
}

/// Extracts the two genotype alleles, treating haploid calls as homozygous
fn diploid_alleles(variant: &Variant) -> Option<(i32, i32)> {
    match variant.genotype() {
        [a] => Some((*a, *a)),
        [a, b] => Some((*a, *b)),
        _ => None
    }
}

/// Both haplotype assignments for heterozygous calls
fn unphased(variant: &Variant) -> Vec<OrientedVariant> {
    match diploid_alleles(variant) {
        Some((a, b)) if a != b => vec![
            OrientedVariant::new(variant, true, a, b),
            OrientedVariant::new(variant, false, b, a)
        ],
        Some((a, _)) => vec![OrientedVariant::homozygous(variant, a)],
        None => vec![]
    }
}

/// Only the reported (or inverted) assignment for phased heterozygous calls
fn phased(variant: &Variant, invert: bool) -> Vec<OrientedVariant> {
    match diploid_alleles(variant) {
        Some((a, b)) if a != b && variant.is_phased() => {
            if invert {
                vec![OrientedVariant::new(variant, false, b, a)]
            } else {
                vec![OrientedVariant::new(variant, true, a, b)]
            }
        },
        _ => unphased(variant)
    }
}

/// Returns true if the allele id refers to a replayable ALT allele
fn is_replayable_alt(variant: &Variant, allele_id: i32) -> bool {
    allele_id > 0 && variant.allele(allele_id).is_some()
}

/// One homozygous orientation per distinct replayable ALT in the genotype
fn squash(variant: &Variant) -> Vec<OrientedVariant> {
    let mut seen: Vec<i32> = vec![];
    for &allele_id in variant.genotype() {
        if is_replayable_alt(variant, allele_id) && !seen.contains(&allele_id) {
            seen.push(allele_id);
        }
    }
    seen.into_iter()
        .map(|allele_id| OrientedVariant::homozygous(variant, allele_id))
        .collect()
}

/// Every way of placing the called ALT alleles against REF or each other
fn allele_gt(variant: &Variant) -> Vec<OrientedVariant> {
    let Some((a, b)) = diploid_alleles(variant) else {
        return vec![];
    };
    let a_var = is_replayable_alt(variant, a);
    let b_var = is_replayable_alt(variant, b);
    if !a_var && !b_var {
        return vec![];
    }
    let la = if a_var { a } else { b };
    let lb = if b_var { b } else { a };
    if la == lb {
        vec![
            OrientedVariant::new(variant, true, 0, la),
            OrientedVariant::new(variant, true, la, 0),
            OrientedVariant::homozygous(variant, la),
        ]
    } else {
        vec![
            OrientedVariant::new(variant, true, 0, la),
            OrientedVariant::new(variant, true, 0, lb),
            OrientedVariant::new(variant, true, la, 0),
            OrientedVariant::new(variant, true, lb, 0),
            OrientedVariant::new(variant, true, la, lb),
            OrientedVariant::new(variant, true, lb, la),
        ]
    }
}

/// One homozygous orientation per ALT allele
fn haploid_population(variant: &Variant) -> Vec<OrientedVariant> {
    (1..variant.num_alleles() as i32)
        .map(|allele_id| OrientedVariant::homozygous(variant, allele_id))
        .collect()
}

/// For each ALT `i`: `i` against missing in both assignments, `i` against every earlier ALT in both assignments, then `i/i`.
/// REF is only used as a partner when the missing allele slot is explicitly populated.
/// For `n` ALT alleles this is `n * (n + 2)` orientations.
fn diploid_population(variant: &Variant) -> Vec<OrientedVariant> {
    let explicit_half_call = variant.allele(-1).is_some();
    let num_alleles = variant.num_alleles() as i32;
    let mut orientations = Vec::with_capacity((num_alleles * num_alleles).max(1) as usize);
    for i in 1..num_alleles {
        let partners = std::iter::once(-1)
            .chain(if explicit_half_call { 0 } else { 1 }..i);
        for j in partners {
            orientations.push(OrientedVariant::new(variant, true, i, j));
            orientations.push(OrientedVariant::new(variant, false, j, i));
        }
        orientations.push(OrientedVariant::new(variant, true, i, i));
    }
    orientations
}
