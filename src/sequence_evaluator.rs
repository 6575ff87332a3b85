/*!
# Sequence evaluation
Runs the full comparison for a single reference sequence: best path, weights, phasing, and the per-variant outcomes.
*/

use log::{debug, log_enabled, trace, Level};
use rustc_hash::FxHashMap;

use crate::data_types::oriented_variant::{MatchStatus, OrientedVariant};
use crate::data_types::sequence_result::{SequenceResult, VariantCategory, VariantOutcome};
use crate::data_types::variants::Variant;
use crate::path::{calculate_weights, Path, Side};
use crate::path_finder::{PathFinder, PathFinderConfig, PathFinderError};
use crate::phasing::count_misphasings;

/// Evaluates sequences with a fixed search configuration
#[derive(Clone, Copy, Debug, Default)]
pub struct SequenceEvaluator {
    /// Configuration handed to each path finder
    config: PathFinderConfig
}

impl SequenceEvaluator {
    /// Constructor
    pub fn new(config: PathFinderConfig) -> Self {
        Self { config }
    }

    /// Compares the baseline and called variants of one sequence.
    /// If either side is empty no search is needed: every baseline variant is a false negative and every call a false positive.
    /// # Arguments
    /// * `name` - the sequence name
    /// * `template` - the sequence, as base codes
    /// * `baseline` - baseline variants with unique ids
    /// * `called` - called variants with unique ids
    /// # Errors
    /// * if the path finder fails, see `PathFinder::search`
    pub fn evaluate(&self, name: &str, template: &[u8], baseline: &[Variant], called: &[Variant]) -> Result<SequenceResult, PathFinderError> {
        debug!("Sequence: {name} has {} baseline variants", baseline.len());
        debug!("Sequence: {name} has {} called variants", called.len());

        let mut result = SequenceResult::new(name.to_string());
        if baseline.is_empty() || called.is_empty() {
            result.baseline = by_id(baseline, FxHashMap::default(), VariantCategory::FalseNegative);
            result.called = by_id(called, FxHashMap::default(), VariantCategory::FalsePositive);
            return Ok(result);
        }

        let best = PathFinder::new(template, name, baseline, called, self.config)?.search()?;
        if log_enabled!(Level::Trace) {
            dump_best_path(&best, template)?;
        }

        debug!("Post-processing variant result lists for {name}...");
        let mut called_included = best.included(Side::Called);
        let mut baseline_included = best.included(Side::Baseline);
        calculate_weights(&best, &mut called_included, &mut baseline_included);

        let baseline_decided = decided_outcomes(&best, Side::Baseline, &baseline_included, VariantCategory::FalseNegative);
        let called_decided = decided_outcomes(&best, Side::Called, &called_included, VariantCategory::FalsePositive);
        // anything left undecided was dropped from a too-complex region
        result.baseline = by_id(baseline, baseline_decided, VariantCategory::Skipped);
        result.called = by_id(called, called_decided, VariantCategory::Skipped);
        result.sync_points = best.sync_points().iter().map(|p| p + 1).collect();
        result.phasing = count_misphasings(&best);
        debug!("Ready to write variants for {name}...");
        Ok(result)
    }
}

/// Outcomes for the included and excluded variants of one side, by id
fn decided_outcomes(
    best: &Path, side: Side, included: &[OrientedVariant], excluded_category: VariantCategory
) -> FxHashMap<usize, VariantOutcome> {
    let mut decided: FxHashMap<usize, VariantOutcome> = FxHashMap::default();
    for ov in included.iter() {
        let category = match ov.status() {
            MatchStatus::TruePositive => VariantCategory::TruePositive,
            MatchStatus::NoOp | MatchStatus::Unknown => VariantCategory::NoOp
        };
        decided.insert(ov.variant().id(), VariantOutcome::included(ov, category));
    }
    for variant in best.excluded(side) {
        decided.insert(variant.id(), VariantOutcome::not_included(variant, excluded_category));
    }
    decided
}

/// Lists outcomes for every input variant in id order, using `fallback` for variants without a decided outcome
fn by_id(variants: &[Variant], mut decided: FxHashMap<usize, VariantOutcome>, fallback: VariantCategory) -> Vec<VariantOutcome> {
    let mut ordered: Vec<&Variant> = variants.iter().collect();
    ordered.sort_by_key(|v| v.id());
    ordered.into_iter()
        .map(|v| decided.remove(&v.id()).unwrap_or_else(|| VariantOutcome::not_included(v, fallback)))
        .collect()
}

/// Traces the haplotypes of the best path over the region it changed
fn dump_best_path(best: &Path, template: &[u8]) -> Result<(), PathFinderError> {
    trace!("#### {best}");
    let start = best.sync_points().first().copied().unwrap_or(0).max(0);
    let end = best.baseline().variant_end_position().max(best.called().variant_end_position()) + 1;
    trace!("#### Template {}", Path::new(template).baseline().dump_haplotypes(start, end)?);
    trace!("#### Baseline {}", best.baseline().dump_haplotypes(start, end)?);
    trace!("#### Call     {}", best.called().dump_haplotypes(start, end)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;
    use crate::data_types::dna;
    use crate::data_types::phasing_result::PhasingResult;
    use crate::data_types::summary_metrics::SummaryMetrics;
    use crate::path_finder::{PathFinderConfigBuilder, TooComplexPolicy};
    use crate::test_helpers::vcf_variant;

    fn categories(outcomes: &[VariantOutcome]) -> Vec<(usize, &str)> {
        outcomes.iter().map(|o| (o.id, o.category.as_ref())).collect()
    }

    #[test]
    fn test_empty_side() {
        let template = dna::encode(b"ACGTACGTAC");
        let baseline = vec![vcf_variant(1, 3, "G", "T", "0/1"), vcf_variant(0, 2, "C", "A", "1/1")];
        let result = SequenceEvaluator::default().evaluate("chr1", &template, &baseline, &[]).unwrap();
        assert_eq!(categories(&result.baseline), vec![(0, "FN"), (1, "FN")]);
        assert!(result.called.is_empty());
        assert!(result.sync_points.is_empty());

        let result = SequenceEvaluator::default().evaluate("chr1", &template, &[], &baseline).unwrap();
        assert_eq!(categories(&result.called), vec![(0, "FP"), (1, "FP")]);
        assert_eq!(result.summary_metrics(), SummaryMetrics::new(0, 0, 0, 2, 0));
    }

    #[test]
    fn test_evaluate() {
        let template = dna::encode(&b"ACGT".repeat(6));
        let baseline = vec![
            vcf_variant(0, 3, "G", "T", "0|1"),
            vcf_variant(1, 10, "C", "A", "1/1"),
            // same repeat unit deletion as the called one, at a different position
            vcf_variant(2, 12, "TACGT", "T", "1/1")
        ];
        let called = vec![
            vcf_variant(0, 3, "G", "T", "1|0"),
            vcf_variant(1, 7, "G", "C", "0/1").with_score(Some(4.0)),
            vcf_variant(2, 16, "TACGT", "T", "1/1").with_score(Some(9.0))
        ];
        let result = SequenceEvaluator::default().evaluate("chr1", &template, &baseline, &called).unwrap();
        assert_eq!(categories(&result.baseline), vec![(0, "TP"), (1, "FN"), (2, "TP")]);
        assert_eq!(categories(&result.called), vec![(0, "TP"), (1, "FP"), (2, "TP")]);
        assert_approx_eq!(result.called[2].weight.unwrap(), 1.0);
        assert_eq!(result.called[1].weight, None);
        assert_eq!(result.called[1].score, Some(4.0));
        assert_eq!(result.summary_metrics(), SummaryMetrics::new(2, 1, 2, 1, 0));
        assert_eq!(result.phasing, PhasingResult::default());
        assert!(!result.sync_points.is_empty());
        assert!(result.sync_points.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_no_op_call() {
        // the called pair of indels cancels out, so it is neither a TP nor an FP
        let template = dna::encode(b"ACGTTTTTTACGTACGT");
        let baseline = vec![vcf_variant(0, 14, "A", "G", "1/1")];
        let called = vec![
            vcf_variant(0, 4, "T", "TT", "1/1"),
            vcf_variant(1, 8, "TT", "T", "1/1"),
            vcf_variant(2, 14, "A", "G", "1/1")
        ];
        let result = SequenceEvaluator::default().evaluate("chr1", &template, &baseline, &called).unwrap();
        assert_eq!(categories(&result.baseline), vec![(0, "TP")]);
        assert_eq!(categories(&result.called), vec![(0, "NOOP"), (1, "NOOP"), (2, "TP")]);
    }

    #[test]
    fn test_skipped_region() {
        let mut template = vec![b'A'; 30];
        template.extend_from_slice(b"CGTCGTCGTC");
        let template = dna::encode(&template);
        let mut called: Vec<Variant> = (0..12).map(|i| vcf_variant(i, 3 + i, "A", "AA", "0/1")).collect();
        called.push(vcf_variant(12, 35, "G", "T", "1/1"));
        let baseline = vec![vcf_variant(0, 35, "G", "T", "1/1")];

        let config = PathFinderConfigBuilder::default()
            .max_paths(4)
            .too_complex(TooComplexPolicy::Skip)
            .build().unwrap();
        let result = SequenceEvaluator::new(config).evaluate("chr1", &template, &baseline, &called).unwrap();
        assert_eq!(categories(&result.baseline), vec![(0, "TP")]);
        assert_eq!(result.called.len(), 13);
        assert_eq!(result.called[12].category, VariantCategory::TruePositive);
        let metrics = result.summary_metrics();
        assert!(metrics.skipped > 0);
        assert_eq!(metrics.skipped + metrics.called_fp + metrics.called_tp, 13);

        // the default policy gives up instead
        let strict = PathFinderConfigBuilder::default().max_paths(4).build().unwrap();
        let error = SequenceEvaluator::new(strict).evaluate("chr1", &template, &baseline, &called).unwrap_err();
        assert!(matches!(error, PathFinderError::TooComplex { .. }));
    }
}
