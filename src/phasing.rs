/*!
# Phasing evaluation
Counts how well the phase of the called variants agrees with the baseline along a best path.
Each sync region is independent for matching, so the orientation chosen inside one region says nothing on its own.
What matters is whether the phase *changes* between consecutive phased calls the same way it changes in the baseline.

Excluded calls still bridge a phasing run, but only included calls are scored.
A region whose baseline variants are not all phased the same way breaks the run, and the phased calls inside it are counted as unphaseable.
*/

use itertools::Itertools;

use crate::data_types::phasing_result::PhasingResult;
use crate::path::{Path, Side};

/// The phasing details of one decided variant
#[derive(Clone, Copy, Debug)]
struct PhaseSummary {
    /// Start of the variant
    start: usize,
    /// True if the input genotype was phased
    phased: bool,
    /// True if the variant was included in the original genotype order
    phase: bool,
    /// True if the variant was included
    included: bool
}

/// Finds the phasing region of a variant start.
/// Unlike the weighting regions, a variant starting exactly on a sync point belongs to the following region.
fn phasing_region(sync_points: &[i64], start: i64) -> usize {
    sync_points.iter()
        .position(|&point| start < point)
        .unwrap_or(sync_points.len().saturating_sub(1))
}

/// Merges included and excluded variants of one side back into reference order, then groups them by sync region
fn side_regions(path: &Path, side: Side, sync_points: &[i64]) -> Vec<Vec<PhaseSummary>> {
    let included = path.included(side).into_iter().map(|ov| PhaseSummary {
        start: ov.start(),
        phased: ov.variant().is_phased(),
        phase: ov.is_original(),
        included: true
    });
    let excluded = path.excluded(side).into_iter().map(|v| PhaseSummary {
        start: v.start(),
        phased: v.is_phased(),
        phase: false,
        included: false
    });

    let mut regions = vec![vec![]; sync_points.len().max(1)];
    for summary in included.merge_by(excluded, |a, b| a.start <= b.start) {
        regions[phasing_region(sync_points, summary.start as i64)].push(summary);
    }
    regions
}

/// True if every variant in the group is phased, all in the same orientation
fn group_in_phase(group: &[PhaseSummary]) -> bool {
    match group.first() {
        None => true,
        Some(first) => group.iter().all(|s| s.phased && s.phase == first.phase)
    }
}

/// Counts correct, incorrect and unphaseable phasings of the called variants on a path.
/// # Arguments
/// * `path` - the finished best path, including its final sync point
pub fn count_misphasings(path: &Path) -> PhasingResult {
    let sync_points = path.sync_points();
    let baseline_regions = side_regions(path, Side::Baseline, &sync_points);
    let called_regions = side_regions(path, Side::Called, &sync_points);

    let mut result = PhasingResult::default();
    let mut baseline_is_phased = false;
    let mut baseline_phase = false;
    let mut call_is_phased = false;
    let mut call_phase = false;
    for (baseline, calls) in baseline_regions.iter().zip(called_regions.iter()) {
        if !group_in_phase(baseline) {
            // without a consistent baseline there is no way to tell which calls swapped
            result.unphaseable += calls.iter().filter(|c| c.phased).count() as u64;
            baseline_is_phased = false;
            call_is_phased = false;
            continue;
        }

        if !baseline_is_phased {
            call_is_phased = false;
        }
        let mut transition = false;
        for summary in baseline.iter() {
            if baseline_phase != summary.phase {
                transition = true;
            }
            baseline_is_phased = true;
            baseline_phase = summary.phase;
        }

        for call in calls.iter() {
            if !call.phased {
                call_is_phased = false;
            } else if !call_is_phased {
                // start of a new run
                call_is_phased = true;
                call_phase = call.phase;
            } else if call.included {
                let call_transition = call.phase != call_phase;
                if call_transition == transition {
                    result.correct_phasings += 1;
                } else {
                    result.misphasings += 1;
                }
                call_phase = call.phase;
            }
            transition = false;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::dna;
    use crate::data_types::variants::Variant;
    use crate::path_finder::PathFinder;
    use crate::test_helpers::vcf_variant;

    /// Builds G>T SNPs from (1-based position, genotype) pairs
    fn snps(calls: &[(usize, &str)]) -> Vec<Variant> {
        calls.iter().enumerate()
            .map(|(i, &(position, genotype))| vcf_variant(i, position, "G", "T", genotype))
            .collect()
    }

    fn check_phasing(baseline: &[(usize, &str)], called: &[(usize, &str)], expected: PhasingResult) {
        let template = dna::encode(&[b'G'; 30]);
        let baseline = snps(baseline);
        let called = snps(called);
        let best = PathFinder::best_path(&template, "10", &baseline, &called).unwrap();
        assert_eq!(best.included(Side::Called).len(), called.len());
        assert_eq!(count_misphasings(&best), expected);
    }

    #[test]
    fn test_phasing() {
        check_phasing(
            &[(9, "1|0"), (13, "0|1")],
            &[(9, "1|0"), (13, "1|0")],
            PhasingResult::new(1, 0, 0)
        );
    }

    #[test]
    fn test_double_phasing() {
        check_phasing(
            &[(9, "1|0"), (13, "0|1"), (16, "0|1")],
            &[(9, "1|0"), (13, "1|0"), (16, "0|1")],
            PhasingResult::new(2, 0, 0)
        );
    }

    #[test]
    fn test_phasing_resumes_after_unphased() {
        check_phasing(
            &[(9, "1|0"), (13, "0|1"), (16, "0|1"), (19, "0|1"), (22, "0|1"), (25, "1|0")],
            &[(9, "1|0"), (13, "1|0"), (16, "1|0"), (19, "0/1"), (22, "1|0"), (25, "1|0")],
            PhasingResult::new(2, 1, 0)
        );
    }

    #[test]
    fn test_phase_change_after_unphased() {
        check_phasing(
            &[(9, "1|0"), (13, "0|1"), (16, "0|1"), (19, "0|1"), (22, "0|1"), (25, "1|0")],
            &[(9, "1|0"), (13, "1|0"), (16, "1|0"), (19, "0/1"), (22, "0|1"), (25, "1|0")],
            PhasingResult::new(1, 2, 0)
        );
    }

    #[test]
    fn test_cluster() {
        check_phasing(
            &[(9, "1|0"), (13, "0|1"), (15, "0|1"), (17, "0|1"), (19, "0|1"), (25, "1|0")],
            &[(9, "0|1"), (13, "1|0"), (15, "1|0"), (17, "0|1"), (19, "1|0"), (25, "0|1")],
            PhasingResult::new(2, 3, 0)
        );
    }

    #[test]
    fn test_unphaseable() {
        check_phasing(
            &[(9, "1|0"), (13, "0/1")],
            &[(9, "1|0"), (13, "1|0")],
            PhasingResult::new(0, 0, 1)
        );
    }

    #[test]
    fn test_false_positive_bridges_run() {
        let template = dna::encode(&[b'G'; 30]);
        let baseline = snps(&[(9, "1|0"), (16, "0|1")]);
        let called = snps(&[(9, "1|0"), (13, "1|0"), (16, "1|0")]);
        let best = PathFinder::best_path(&template, "10", &baseline, &called).unwrap();
        assert_eq!(best.excluded(Side::Called).len(), 1);
        assert_eq!(count_misphasings(&best), PhasingResult::new(1, 0, 0));
    }

    #[test]
    fn test_variant_on_sync_point() {
        let template = dna::encode(&[b'G'; 30]);
        let baseline = snps(&[(9, "1|0"), (10, "0|1")]);
        let called = snps(&[(9, "1|0"), (10, "1|0")]);
        let best = PathFinder::best_path(&template, "10", &baseline, &called).unwrap();

        // both sides move a variant starting on the point into the next region
        for side in [Side::Baseline, Side::Called] {
            let regions = side_regions(&best, side, &[7, 8, 29]);
            let starts: Vec<Vec<usize>> = regions.iter()
                .map(|region| region.iter().map(|s| s.start).collect())
                .collect();
            assert_eq!(starts, vec![vec![], vec![], vec![8, 9]], "{side}");
        }
        assert_eq!(phasing_region(&[7, 8, 29], 7), 1);
        assert_eq!(phasing_region(&[7, 8, 29], 6), 0);
        // past the last point falls back to the last region
        assert_eq!(phasing_region(&[7, 8, 29], 29), 2);
        assert_eq!(phasing_region(&[], 3), 0);
    }

    #[test]
    fn test_group_in_phase() {
        let summary = |phased, phase| PhaseSummary { start: 0, phased, phase, included: true };
        assert!(group_in_phase(&[]));
        assert!(group_in_phase(&[summary(true, true), summary(true, true)]));
        assert!(!group_in_phase(&[summary(true, true), summary(true, false)]));
        assert!(!group_in_phase(&[summary(false, false)]));
    }
}
