use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::data_types::variants::{Allele, Variant};

/// Haplotype label within a diploid half path
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Haplotype {
    A,
    B
}

/// Match status assigned to a variant once the best path is known
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, strum_macros::AsRefStr)]
pub enum MatchStatus {
    /// Not assigned yet
    #[default]
    #[strum(serialize = "UNK")]
    Unknown,
    /// Included and explained by the other side
    #[strum(serialize = "TP")]
    TruePositive,
    /// Included, but redundant given the other included variants in its region
    #[strum(serialize = "NOP")]
    NoOp
}

/// A variant with one allele bound to each haplotype.
/// This is a small value type that borrows the underlying variant, so it is cheap to copy around the search.
#[derive(Clone, Copy, Debug)]
pub struct OrientedVariant<'a> {
    /// The underlying variant
    variant: &'a Variant,
    /// True if the haplotype assignment follows the genotype order
    is_original: bool,
    /// Allele id played on haplotype A
    allele_a: i32,
    /// Allele id played on haplotype B
    allele_b: i32,
    /// Credit assigned by the weighting pass
    weight: f64,
    /// Status assigned by the weighting pass
    status: MatchStatus
}

impl<'a> OrientedVariant<'a> {
    /// Creates an orientation with (potentially) different alleles on each haplotype
    /// # Arguments
    /// * `variant` - the underlying variant
    /// * `is_original` - true if this assignment follows the genotype order
    /// * `allele_a` - allele id played on haplotype A
    /// * `allele_b` - allele id played on haplotype B
    pub fn new(variant: &'a Variant, is_original: bool, allele_a: i32, allele_b: i32) -> Self {
        Self {
            variant, is_original, allele_a, allele_b,
            weight: 0.0,
            status: MatchStatus::Unknown
        }
    }

    /// Creates an orientation that plays the same allele on both haplotypes
    pub fn homozygous(variant: &'a Variant, allele: i32) -> Self {
        Self::new(variant, true, allele, allele)
    }

    /// True when the two haplotypes carry different alleles
    pub fn is_heterozygous(&self) -> bool {
        self.allele_a != self.allele_b
    }

    /// The reciprocal orientation, with the haplotype assignment swapped.
    /// Orientations carrying the same allele on both haplotypes have no reciprocal.
    pub fn other(&self) -> Option<OrientedVariant<'a>> {
        if self.is_heterozygous() {
            Some(Self::new(self.variant, !self.is_original, self.allele_b, self.allele_a))
        } else {
            None
        }
    }

    /// The allele id played on a given haplotype
    pub fn allele_id(&self, haplotype: Haplotype) -> i32 {
        match haplotype {
            Haplotype::A => self.allele_a,
            Haplotype::B => self.allele_b
        }
    }

    /// The replayable allele on a given haplotype, if any
    pub fn allele(&self, haplotype: Haplotype) -> Option<&'a Allele> {
        self.variant.allele(self.allele_id(haplotype))
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    pub fn set_status(&mut self, status: MatchStatus) {
        self.status = status;
    }

    /// Sort key shared by the equality and ordering implementations
    fn key(&self) -> (usize, usize, usize, bool, i32, i32) {
        (self.variant.start(), self.variant.end(), self.variant.id(), !self.is_original, self.allele_a, self.allele_b)
    }

    // getters
    pub fn variant(&self) -> &'a Variant {
        self.variant
    }

    pub fn is_original(&self) -> bool {
        self.is_original
    }

    pub fn allele_ids(&self) -> [i32; 2] {
        [self.allele_a, self.allele_b]
    }

    pub fn start(&self) -> usize {
        self.variant.start()
    }

    pub fn end(&self) -> usize {
        self.variant.end()
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }
}

impl PartialEq for OrientedVariant<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OrientedVariant<'_> {}

impl PartialOrd for OrientedVariant<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrientedVariant<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for OrientedVariant<'_> {
    /// Alleles are marked with `^` when on haplotype A, `v` when on B, and `x` when on both.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = (self.allele_a, self.allele_b);
        let show_missing = a == -1 || b == -1;
        let alleles = self.variant.format_alleles(show_missing, |allele_id| {
            if allele_id == a && allele_id == b {
                "x"
            } else if allele_id == a {
                "^"
            } else if allele_id == b {
                "v"
            } else {
                ""
            }
        });
        write!(f, "{}-{} ({alleles})", self.variant.start() + 1, self.variant.end() + 1)
    }
}
