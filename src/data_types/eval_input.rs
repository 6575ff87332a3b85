use serde::{Deserialize, Serialize};

use crate::data_types::variants::{parse_genotype, Variant, VariantError};

#[derive(thiserror::Error, Debug)]
pub enum InputError {
    #[error("{side} variant #{index} on {sequence} has position 0, positions are 1-based")]
    ZeroPosition { sequence: String, side: String, index: usize },
    #[error("{side} variant at {sequence}:{position} is invalid")]
    InvalidVariant {
        sequence: String, side: String, position: usize,
        #[source] source: VariantError
    }
}

/// A single VCF-like variant record
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct VariantRecord {
    /// 1-based position of the REF allele
    pub position: usize,
    /// REF allele
    pub reference: String,
    /// ALT alleles, may be symbolic
    pub alternates: Vec<String>,
    /// VCF-style genotype such as "0|1"; missing means no genotype
    #[serde(default)]
    pub genotype: Option<String>,
    /// Score used for ROC building
    #[serde(default)]
    pub score: Option<f64>
}

impl VariantRecord {
    /// Converts the record into a trimmed variant
    /// # Arguments
    /// * `id` - the id to assign to the variant
    /// # Errors
    /// * if the genotype cannot be parsed
    /// * if the alleles cannot form a variant
    pub fn to_variant(&self, id: usize) -> Result<Variant, VariantError> {
        let (genotype, phased) = match self.genotype.as_deref() {
            Some(gt) => parse_genotype(gt)?,
            None => (vec![], false)
        };
        let alternates: Vec<&[u8]> = self.alternates.iter().map(|a| a.as_bytes()).collect();
        Ok(Variant::from_vcf_alleles(id, self.position - 1, self.reference.as_bytes(), &alternates, genotype, phased)?
            .with_score(self.score))
    }
}

/// Baseline and called variants for one sequence
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SequenceVariants {
    /// Sequence name, which must be present in the reference
    pub name: String,
    /// Baseline (truth) variants
    #[serde(default)]
    pub baseline: Vec<VariantRecord>,
    /// Called (query) variants
    #[serde(default)]
    pub called: Vec<VariantRecord>
}

impl SequenceVariants {
    /// Converts records into variants sorted by position, with ids assigned in that order
    fn convert(&self, records: &[VariantRecord], side: &str) -> Result<Vec<Variant>, InputError> {
        if let Some(index) = records.iter().position(|r| r.position == 0) {
            return Err(InputError::ZeroPosition { sequence: self.name.clone(), side: side.to_string(), index });
        }
        let mut ordered: Vec<&VariantRecord> = records.iter().collect();
        ordered.sort_by_key(|r| r.position);
        ordered.into_iter()
            .enumerate()
            .map(|(id, record)| {
                record.to_variant(id).map_err(|source| InputError::InvalidVariant {
                    sequence: self.name.clone(), side: side.to_string(), position: record.position, source
                })
            })
            .collect()
    }

    /// The baseline variants, sorted with stable ids
    /// # Errors
    /// * if any record cannot be converted
    pub fn baseline_variants(&self) -> Result<Vec<Variant>, InputError> {
        self.convert(&self.baseline, "baseline")
    }

    /// The called variants, sorted with stable ids
    /// # Errors
    /// * if any record cannot be converted
    pub fn called_variants(&self) -> Result<Vec<Variant>, InputError> {
        self.convert(&self.called, "called")
    }
}
