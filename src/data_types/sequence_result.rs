use serde::Serialize;

use crate::data_types::oriented_variant::OrientedVariant;
use crate::data_types::phasing_result::PhasingResult;
use crate::data_types::roc::RocContainer;
use crate::data_types::summary_metrics::SummaryMetrics;
use crate::data_types::variants::Variant;

/// The final call for a single input variant
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, strum_macros::AsRefStr)]
pub enum VariantCategory {
    /// Baseline or called variant explained by the other side
    #[serde(rename = "TP")]
    #[strum(serialize = "TP")]
    TruePositive,
    /// Called variant that explains nothing in the baseline
    #[serde(rename = "FP")]
    #[strum(serialize = "FP")]
    FalsePositive,
    /// Baseline variant that no call explains
    #[serde(rename = "FN")]
    #[strum(serialize = "FN")]
    FalseNegative,
    /// Included variant whose region saw no change on the other side, so it gets no credit either way
    #[serde(rename = "NOOP")]
    #[strum(serialize = "NOOP")]
    NoOp,
    /// Variant from a region that was too complex to evaluate
    #[serde(rename = "SKIP")]
    #[strum(serialize = "SKIP")]
    Skipped
}

/// Outcome for one input variant
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VariantOutcome {
    /// Input id of the variant
    pub id: usize,
    /// 1-based start of the (trimmed) variant
    pub position: usize,
    /// The assigned category
    pub category: VariantCategory,
    /// Share of the credit for included variants
    pub weight: Option<f64>,
    /// Input score, if any
    pub score: Option<f64>,
    /// Allele ids played on haplotypes A and B, for included variants
    pub alleles: Option<[i32; 2]>
}

impl VariantOutcome {
    /// Outcome for an included variant, with weight and status already assigned
    pub fn included(ov: &OrientedVariant, category: VariantCategory) -> Self {
        Self {
            id: ov.variant().id(),
            position: ov.variant().start() + 1,
            category,
            weight: Some(ov.weight()),
            score: ov.variant().score(),
            alleles: Some(ov.allele_ids())
        }
    }

    /// Outcome for a variant that was not included
    pub fn not_included(variant: &Variant, category: VariantCategory) -> Self {
        Self {
            id: variant.id(),
            position: variant.start() + 1,
            category,
            weight: None,
            score: variant.score(),
            alleles: None
        }
    }
}

/// Everything found for one sequence
#[derive(Clone, Debug, Default, Serialize)]
pub struct SequenceResult {
    /// The sequence name
    pub name: String,
    /// Baseline outcomes in id order
    pub baseline: Vec<VariantOutcome>,
    /// Called outcomes in id order
    pub called: Vec<VariantOutcome>,
    /// 1-based sync points of the best path
    pub sync_points: Vec<i64>,
    /// Phasing counts for the called variants
    pub phasing: PhasingResult
}

impl SequenceResult {
    /// Creates an empty result for a sequence
    pub fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    /// Counts the outcomes with a category across one side
    fn count(outcomes: &[VariantOutcome], category: VariantCategory) -> u64 {
        outcomes.iter().filter(|o| o.category == category).count() as u64
    }

    /// Unweighted summary counts
    pub fn summary_metrics(&self) -> SummaryMetrics {
        SummaryMetrics::new(
            Self::count(&self.baseline, VariantCategory::TruePositive),
            Self::count(&self.baseline, VariantCategory::FalseNegative),
            Self::count(&self.called, VariantCategory::TruePositive),
            Self::count(&self.called, VariantCategory::FalsePositive),
            Self::count(&self.baseline, VariantCategory::Skipped) + Self::count(&self.called, VariantCategory::Skipped)
        )
    }

    /// Adds the scored calls to an ROC container.
    /// True positives contribute their weight, false positives count fully; no-op and skipped calls are left out.
    pub fn add_to_roc(&self, roc: &mut RocContainer) {
        for outcome in self.called.iter() {
            match outcome.category {
                VariantCategory::TruePositive => roc.add_call(outcome.score, outcome.weight.unwrap_or(0.0)),
                VariantCategory::FalsePositive => roc.add_call(outcome.score, 0.0),
                VariantCategory::FalseNegative |
                VariantCategory::NoOp |
                VariantCategory::Skipped => {}
            }
        }
    }
}
