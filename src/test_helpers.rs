/*!
Shared fixtures for unit tests.
*/

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::data_types::oriented_variant::OrientedVariant;
use crate::data_types::variants::{parse_genotype, Allele, Variant};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Creates a variant spanning 1-based [start, end) with a "plus" allele and an optional "minus" allele.
/// Without a minus allele the variant is homozygous for plus.
/// Bases are given as codes.
pub fn mock_variant(start: usize, end: usize, plus: &[u8], minus: Option<&[u8]>) -> Variant {
    let (start, end) = (start - 1, end - 1);
    let mut alleles = vec![None, None, Some(Allele::new(start, end, plus.to_vec()).unwrap())];
    let genotype = match minus {
        Some(nt) => {
            alleles.push(Some(Allele::new(start, end, nt.to_vec()).unwrap()));
            vec![1, 2]
        },
        None => vec![1, 1]
    };
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    Variant::with_bounds(id, start, end, alleles, genotype, true).unwrap()
}

/// Orients a mock variant; when `include` is false, haplotype A plays the minus allele
pub fn mock_oriented(variant: &Variant, include: bool) -> OrientedVariant<'_> {
    let [plus, minus] = match variant.genotype() {
        [p, m] => [*p, *m],
        _ => panic!("mock variants are diploid")
    };
    if include {
        OrientedVariant::new(variant, true, plus, minus)
    } else {
        OrientedVariant::new(variant, false, minus, plus)
    }
}

/// Creates a variant from VCF-style text: 1-based position, REF, comma separated ALTs, and a genotype
pub fn vcf_variant(id: usize, position: usize, reference: &str, alternates: &str, genotype: &str) -> Variant {
    let alts: Vec<&[u8]> = alternates.split(',').map(|a| a.as_bytes()).collect();
    let (gt, phased) = parse_genotype(genotype).unwrap();
    Variant::from_vcf_alleles(id, position - 1, reference.as_bytes(), &alts, gt, phased).unwrap()
}
