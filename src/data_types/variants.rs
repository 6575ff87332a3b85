use std::cmp::Ordering;
use std::fmt;

use crate::data_types::dna;

#[derive(thiserror::Error, Debug)]
pub enum VariantError {
    #[error("interval start ({start}) is after end ({end})")]
    InvalidBounds { start: usize, end: usize },
    #[error("allele{index} spans {start}-{end}, outside of the variant bounds {var_start}-{var_end}")]
    AlleleOutOfBounds { index: usize, start: usize, end: usize, var_start: usize, var_end: usize },
    #[error("variant has no replayable alleles to derive bounds from")]
    NoAlleles,
    #[error("genotype refers to allele {allele}, but only {num_alleles} alleles are defined")]
    GenotypeIndex { allele: i32, num_alleles: usize },
    #[error("reference allele is empty")]
    EmptyReference,
    #[error("unable to parse genotype \"{genotype}\"")]
    GenotypeParse { genotype: String }
}

/// A single replacement sequence over a half-open reference interval.
/// Insertions have `start == end`, deletions have an empty sequence.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Allele {
    /// 0-based start, inclusive
    start: usize,
    /// 0-based end, exclusive
    end: usize,
    /// replacement bases as codes
    nt: Vec<u8>
}

impl Allele {
    /// Constructor
    /// # Arguments
    /// * `start` - 0-based inclusive start
    /// * `end` - 0-based exclusive end
    /// * `nt` - the replacement sequence, encoded
    /// # Errors
    /// * if `start > end`
    pub fn new(start: usize, end: usize, nt: Vec<u8>) -> Result<Allele, VariantError> {
        if start > end {
            return Err(VariantError::InvalidBounds { start, end });
        }
        Ok(Allele { start, end, nt })
    }

    /// Returns true if this allele has no effect on a haplotype (empty insertion).
    pub fn is_empty_insertion(&self) -> bool {
        self.start == self.end && self.nt.is_empty()
    }

    // getters
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn nt(&self) -> &[u8] {
        &self.nt
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", dna::decode(&self.nt))
    }
}

/// A described edit to the template along with the genotype it was called with.
/// Alleles are stored by genotype id + 1, so slot 0 holds the missing ('.') allele and slot 1 holds REF.
/// Slots are `None` when the allele is not replayable, which is always the case for REF after trimming.
#[derive(Clone, Debug, PartialEq)]
pub struct Variant {
    /// Unique (per sequence) identifier, also the input order
    id: usize,
    /// 0-based start of the full variant
    start: usize,
    /// 0-based exclusive end of the full variant
    end: usize,
    /// Allele slots indexed by genotype id + 1
    alleles: Vec<Option<Allele>>,
    /// The called allele ids, -1 for missing; empty if no genotype was provided
    genotype: Vec<i32>,
    /// True if the genotype was reported as phased
    phased: bool,
    /// Optional score used for ROC building
    score: Option<f64>
}

impl Variant {
    /// Creates a variant with bounds derived from the replayable alleles.
    /// # Arguments
    /// * `id` - unique identifier within the sequence
    /// * `alleles` - allele slots, index 0 is the missing allele and index 1 is REF
    /// * `genotype` - allele ids for each haplotype, -1 for missing
    /// * `phased` - true if the genotype is phased
    /// # Errors
    /// * if no allele is present to derive bounds from
    /// * if the genotype references an allele that does not exist
    pub fn new(id: usize, alleles: Vec<Option<Allele>>, genotype: Vec<i32>, phased: bool) -> Result<Variant, VariantError> {
        let start = alleles.iter().flatten().map(|a| a.start()).min();
        let end = alleles.iter().flatten().map(|a| a.end()).max();
        match (start, end) {
            (Some(start), Some(end)) => Self::with_bounds(id, start, end, alleles, genotype, phased),
            _ => Err(VariantError::NoAlleles)
        }
    }

    /// Creates a variant with explicit bounds.
    /// # Arguments
    /// * `id` - unique identifier within the sequence
    /// * `start` - 0-based inclusive start
    /// * `end` - 0-based exclusive end
    /// * `alleles` - allele slots, index 0 is the missing allele and index 1 is REF
    /// * `genotype` - allele ids for each haplotype, -1 for missing
    /// * `phased` - true if the genotype is phased
    /// # Errors
    /// * if the bounds are inverted, or any allele escapes them
    /// * if the genotype references an allele that does not exist
    pub fn with_bounds(
        id: usize, start: usize, end: usize,
        mut alleles: Vec<Option<Allele>>, genotype: Vec<i32>, phased: bool
    ) -> Result<Variant, VariantError> {
        if start > end {
            return Err(VariantError::InvalidBounds { start, end });
        }
        // always have the missing and REF slots
        if alleles.len() < 2 {
            alleles.resize(2, None);
        }
        for (index, allele) in alleles.iter().enumerate() {
            if let Some(a) = allele {
                if a.start() < start || a.end() > end {
                    return Err(VariantError::AlleleOutOfBounds {
                        index, start: a.start(), end: a.end(), var_start: start, var_end: end
                    });
                }
            }
        }

        let num_alleles = alleles.len() - 1;
        for &allele in genotype.iter() {
            if allele < -1 || allele >= num_alleles as i32 {
                return Err(VariantError::GenotypeIndex { allele, num_alleles });
            }
        }

        Ok(Variant {
            id, start, end, alleles, genotype, phased, score: None
        })
    }

    /// Builds a variant from VCF-style alleles, trimming the reference padding shared between REF and each ALT.
    /// Leading bases are trimmed first, then trailing bases.
    /// Symbolic and spanning-deletion ALTs are kept as non-replayable slots.
    /// # Arguments
    /// * `id` - unique identifier within the sequence
    /// * `position` - 0-based position of the REF allele
    /// * `reference` - REF allele in ASCII
    /// * `alternates` - ALT alleles in ASCII
    /// * `genotype` - allele ids for each haplotype, -1 for missing
    /// * `phased` - true if the genotype is phased
    /// # Errors
    /// * if REF is empty
    /// * if the genotype references an allele that does not exist
    pub fn from_vcf_alleles(
        id: usize, position: usize, reference: &[u8], alternates: &[&[u8]],
        genotype: Vec<i32>, phased: bool
    ) -> Result<Variant, VariantError> {
        if reference.is_empty() {
            return Err(VariantError::EmptyReference);
        }
        let ref_codes = dna::encode(reference);
        let ref_end = position + ref_codes.len();

        let mut alleles: Vec<Option<Allele>> = vec![None, None];
        for &alt in alternates.iter() {
            if is_symbolic(alt) {
                alleles.push(None);
                continue;
            }
            let alt_codes = dna::encode(alt);
            let lead = ref_codes.iter().zip(alt_codes.iter())
                .take_while(|(r, a)| r == a)
                .count();
            let max_trail = ref_codes.len().min(alt_codes.len()) - lead;
            let trail = ref_codes.iter().rev().zip(alt_codes.iter().rev())
                .take(max_trail)
                .take_while(|(r, a)| r == a)
                .count();
            alleles.push(Some(Allele {
                start: position + lead,
                end: ref_end - trail,
                nt: alt_codes[lead..(alt_codes.len() - trail)].to_vec()
            }));
        }

        if alleles.iter().flatten().next().is_some() {
            Self::new(id, alleles, genotype, phased)
        } else {
            Self::with_bounds(id, position, ref_end, alleles, genotype, phased)
        }
    }

    /// Attaches a score to this variant
    pub fn with_score(mut self, score: Option<f64>) -> Variant {
        self.score = score;
        self
    }

    /// Returns the allele for a given genotype id, if it is replayable.
    /// # Arguments
    /// * `allele_id` - genotype allele id, -1 for the missing allele
    pub fn allele(&self, allele_id: i32) -> Option<&Allele> {
        let slot = allele_id + 1;
        if slot < 0 {
            return None;
        }
        self.alleles.get(slot as usize).and_then(|a| a.as_ref())
    }

    /// Number of alleles, including REF but not the missing slot
    pub fn num_alleles(&self) -> usize {
        self.alleles.len() - 1
    }

    /// Number of haplotypes in the genotype
    pub fn ploidy(&self) -> usize {
        self.genotype.len()
    }

    /// Ordering by reference position, then by id
    pub fn natural_cmp(&self, other: &Variant) -> Ordering {
        self.start.cmp(&other.start)
            .then(self.end.cmp(&other.end))
            .then(self.id.cmp(&other.id))
    }

    /// Renders the alleles with a marker after each allele id; used by the Display implementations.
    /// The missing slot is only rendered when `show_missing` is set.
    pub(crate) fn format_alleles(&self, show_missing: bool, marker: impl Fn(i32) -> &'static str) -> String {
        let first = if show_missing { -1 } else { 0 };
        let parts: Vec<String> = (first..self.num_alleles() as i32)
            .map(|allele_id| {
                let bases = match self.allele(allele_id) {
                    Some(a) => a.to_string(),
                    None if allele_id == -1 => ".".to_string(),
                    None => "*".to_string()
                };
                format!("{bases}{}", marker(allele_id))
            })
            .collect();
        parts.join(":")
    }

    // getters
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn alleles(&self) -> &[Option<Allele>] {
        &self.alleles
    }

    pub fn genotype(&self) -> &[i32] {
        &self.genotype
    }

    pub fn is_phased(&self) -> bool {
        self.phased
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({})", self.start + 1, self.end + 1, self.format_alleles(false, |_| ""))
    }
}

/// Returns true for ALT alleles we cannot replay, such as `<DEL>`, `*`, `.`, or breakends.
fn is_symbolic(alt: &[u8]) -> bool {
    alt.is_empty() || alt == b"*" || alt == b"." || alt.iter().any(|&c| matches!(c, b'<' | b'>' | b'[' | b']'))
}

/// Parses a VCF genotype string like `0|1`, `1/2`, `./1`, or `1`.
/// Returns the allele ids (-1 for missing) and whether the genotype is phased.
/// Haploid genotypes are reported as unphased.
/// # Errors
/// * if any allele is not an integer or '.'
pub fn parse_genotype(genotype: &str) -> Result<(Vec<i32>, bool), VariantError> {
    let phased = genotype.contains('|') && !genotype.contains('/');
    let alleles: Result<Vec<i32>, VariantError> = genotype.split(['|', '/'])
        .map(|token| match token {
            "." => Ok(-1),
            t => t.parse::<i32>()
                .ok()
                .filter(|&v| v >= 0)
                .ok_or_else(|| VariantError::GenotypeParse { genotype: genotype.to_string() })
        })
        .collect();
    let alleles = alleles?;
    let phased = phased && alleles.len() > 1;
    Ok((alleles, phased))
}
