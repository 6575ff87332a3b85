/*!
# Path finder
Searches for the best reconciliation of the baseline and called variants over a single template.
Candidate paths live in an ordered frontier; the smallest (least advanced) path is expanded first, so paths converge on the same positions and duplicates collapse onto the better one.
*/

use derive_builder::Builder;
use log::{debug, trace, warn};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use strum_macros::EnumString;

use crate::data_types::variants::Variant;
use crate::orientor::{Orientor, OrientorError};
use crate::path::{Path, Side};
use crate::replay::half_path::HalfPath;
use crate::replay::haplotype_playback::PlaybackError;

#[derive(thiserror::Error, Debug)]
pub enum PathFinderError {
    #[error(transparent)]
    Orientor(#[from] OrientorError),
    #[error(transparent)]
    Playback(#[from] PlaybackError),
    #[error("Evaluation too complex ({paths} unresolved paths, {iterations} iterations) at reference region {sequence}:{start}-{end}")]
    TooComplex { sequence: String, start: i64, end: i64, paths: usize, iterations: usize },
    #[error("no complete path found for {sequence}")]
    NoPath { sequence: String }
}

/// What to do when a region exceeds the search limits
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, strum_macros::Display, EnumString, Serialize, clap::ValueEnum)]
pub enum TooComplexPolicy {
    /// Abort the sequence with an error
    #[default]
    #[strum(ascii_case_insensitive, serialize = "fail")]
    #[clap(name = "fail")]
    Fail,
    /// Drop the variants in the region and resume from the last sync point
    #[strum(ascii_case_insensitive, serialize = "skip")]
    #[clap(name = "skip")]
    Skip
}

/// Criteria for choosing between two paths that reach the same state
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, strum_macros::Display, EnumString, Serialize, clap::ValueEnum)]
pub enum PathPreference {
    /// Maximize the total number of included variants across both sides
    #[default]
    #[strum(ascii_case_insensitive, serialize = "sum")]
    #[clap(name = "sum")]
    MaxSumBoth,
    /// Maximize included calls while minimizing included baseline variants
    #[strum(ascii_case_insensitive, serialize = "calls-min-base")]
    #[clap(name = "calls-min-base")]
    MaxCallsMinBaseline
}

impl PathPreference {
    /// Ranks a challenger against the incumbent; `Greater` means the challenger is strictly better.
    /// Full ties fall back to the included variant ids, compared without regard to side, so swapping baseline and called picks the mirrored path.
    /// Paths with identical ids on both sides tie, and the incumbent is kept.
    /// # Arguments
    /// * `challenger` - the newly found path
    /// * `incumbent` - the path already held
    /// * `baseline_size` - number of baseline variants in the search
    /// * `called_size` - number of called variants in the search
    pub fn rank(&self, challenger: &Path, incumbent: &Path, baseline_size: usize, called_size: usize) -> Ordering {
        let baseline_count = |p: &Path| p.baseline().included_count();
        let called_count = |p: &Path| p.called().included_count();

        // favor whichever side had fewer variants to begin with
        let minority_count = |p: &Path| match baseline_size.cmp(&called_size) {
            Ordering::Less => baseline_count(p),
            Ordering::Greater => called_count(p),
            Ordering::Equal => baseline_count(p).min(called_count(p))
        };
        let imbalance = |p: &Path| p.baseline_since_sync().abs_diff(p.called_since_sync());
        // sorted ids per side, smaller list first
        let variant_ids = |p: &Path| {
            let ids = |side: Side| {
                let mut ids: Vec<usize> = p.included(side).iter().map(|ov| ov.variant().id()).collect();
                ids.sort_unstable();
                ids
            };
            let (baseline_ids, called_ids) = (ids(Side::Baseline), ids(Side::Called));
            if baseline_ids <= called_ids {
                (baseline_ids, called_ids)
            } else {
                (called_ids, baseline_ids)
            }
        };
        let tail = || {
            minority_count(challenger).cmp(&minority_count(incumbent))
                .then_with(|| imbalance(incumbent).cmp(&imbalance(challenger)))
                .then_with(|| variant_ids(incumbent).cmp(&variant_ids(challenger)))
        };

        match self {
            PathPreference::MaxSumBoth => {
                let total = |p: &Path| baseline_count(p) + called_count(p);
                total(challenger).cmp(&total(incumbent))
                    .then_with(tail)
            },
            PathPreference::MaxCallsMinBaseline => {
                called_count(challenger).cmp(&called_count(incumbent))
                    .then_with(|| baseline_count(incumbent).cmp(&baseline_count(challenger)))
                    .then_with(tail)
            }
        }
    }
}

/// Controls the path search
#[derive(Builder, Clone, Copy, Debug)]
#[builder(default)]
pub struct PathFinderConfig {
    /// Orientation strategy for baseline variants
    baseline_orientor: Orientor,
    /// Orientation strategy for called variants
    called_orientor: Orientor,
    /// Criteria for picking between equivalent paths
    path_preference: PathPreference,
    /// Maximum number of unresolved paths before a region is too complex
    max_paths: usize,
    /// Maximum number of iterations since the last sync point before a region is too complex
    max_iterations: usize,
    /// Behavior for regions that are too complex
    too_complex: TooComplexPolicy
}

impl Default for PathFinderConfig {
    fn default() -> Self {
        // these settings are set to reasonable defaults for unit tests
        // main.rs will set each of them manually based on user input
        Self {
            baseline_orientor: Orientor::Unphased,
            called_orientor: Orientor::Unphased,
            path_preference: PathPreference::MaxSumBoth,
            max_paths: 5000,
            max_iterations: 10_000_000,
            too_complex: TooComplexPolicy::Fail
        }
    }
}

impl PathFinderConfig {
    // getters
    pub fn baseline_orientor(&self) -> Orientor {
        self.baseline_orientor
    }

    pub fn called_orientor(&self) -> Orientor {
        self.called_orientor
    }

    pub fn path_preference(&self) -> PathPreference {
        self.path_preference
    }

    pub fn max_paths(&self) -> usize {
        self.max_paths
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn too_complex(&self) -> TooComplexPolicy {
        self.too_complex
    }
}

/// Best-path search over one template
pub struct PathFinder<'a> {
    /// The reference template, as codes
    template: &'a [u8],
    /// Template name for messages
    name: &'a str,
    /// Baseline variants in natural order
    baseline: Vec<&'a Variant>,
    /// Called variants in natural order
    called: Vec<&'a Variant>,
    /// Search configuration
    config: PathFinderConfig
}

impl<'a> PathFinder<'a> {
    /// Finds the best path using the default configuration
    /// # Arguments
    /// * `template` - the reference template, as codes
    /// * `name` - template name for messages
    /// * `baseline` - the baseline variants
    /// * `called` - the called variants
    /// # Errors
    /// * see `PathFinder::new` and `PathFinder::search`
    pub fn best_path(template: &'a [u8], name: &'a str, baseline: &'a [Variant], called: &'a [Variant]) -> Result<Path<'a>, PathFinderError> {
        Self::new(template, name, baseline, called, PathFinderConfig::default())?.search()
    }

    /// Prepares a search, sorting each side and verifying that the orientors accept every variant.
    /// # Arguments
    /// * `template` - the reference template, as codes
    /// * `name` - template name for messages
    /// * `baseline` - the baseline variants
    /// * `called` - the called variants
    /// * `config` - search configuration
    /// # Errors
    /// * if either orientor cannot handle one of its variants
    pub fn new(
        template: &'a [u8], name: &'a str, baseline: &'a [Variant], called: &'a [Variant], config: PathFinderConfig
    ) -> Result<Self, PathFinderError> {
        let prepare = |variants: &'a [Variant], orientor: Orientor| -> Result<Vec<&'a Variant>, OrientorError> {
            let mut sorted: Vec<&'a Variant> = variants.iter().collect();
            for variant in sorted.iter() {
                orientor.check(variant)?;
            }
            sorted.sort_by(|a, b| a.natural_cmp(b));
            Ok(sorted)
        };
        Ok(Self {
            template,
            name,
            baseline: prepare(baseline, config.baseline_orientor())?,
            called: prepare(called, config.called_orientor())?,
            config
        })
    }

    fn variants(&self, side: Side) -> &[&'a Variant] {
        match side {
            Side::Baseline => &self.baseline,
            Side::Called => &self.called
        }
    }

    fn orientor(&self, side: Side) -> Orientor {
        match side {
            Side::Baseline => self.config.baseline_orientor(),
            Side::Called => self.config.called_orientor()
        }
    }

    fn last_template_position(&self) -> i64 {
        self.template.len() as i64 - 1
    }

    fn clamped_start(&self, variant: &Variant) -> i64 {
        variant.start().min(self.template.len()) as i64
    }

    /// Runs the search.
    /// # Errors
    /// * if a region is too complex and the policy is `TooComplexPolicy::Fail`
    /// * if the replay rejects an allele it previously accepted
    /// * if no path reached the end of the template
    pub fn search(&self) -> Result<Path<'a>, PathFinderError> {
        debug!("Starting path-finding for {} using {},{}", self.name, self.config.baseline_orientor(), self.config.called_orientor());
        let mut frontier: BTreeSet<Path<'a>> = BTreeSet::new();
        frontier.insert(Path::new(self.template));

        let mut best: Option<Path<'a>> = None;
        let mut max_paths = 0;
        let mut max_paths_region = String::new();
        let mut region_paths = 0;
        let mut iterations = 0;
        let mut current_max_position: i64 = 0;
        let mut last_sync_path: Option<Path<'a>> = None;
        let mut last_sync_position: i64 = 0;

        while let Some(mut head) = frontier.pop_first() {
            region_paths = region_paths.max(frontier.len() + 1);
            iterations += 1;
            trace!(
                "Size: {} Range: {}-{} Iterations: {iterations} Head: {head}",
                frontier.len() + 1, last_sync_position + 1, current_max_position + 1
            );

            if frontier.is_empty() {
                // a single path in play, remember it as the restart point
                if head.in_sync() || last_sync_path.is_none() {
                    let sync_position = head.called().position();
                    if region_paths > max_paths {
                        max_paths = region_paths;
                        max_paths_region = format!("{}:{}-{}", self.name, last_sync_position + 1, sync_position + 1);
                        trace!("Maximum path complexity now {max_paths}, at {max_paths_region} with {iterations} iterations");
                    }
                    region_paths = 0;
                    iterations = 0;
                    last_sync_position = sync_position;
                    last_sync_path = Some(head.clone());
                }
            } else if frontier.len() > self.config.max_paths() || iterations > self.config.max_iterations() {
                let (start, end) = (last_sync_position + 1, current_max_position + 2);
                match self.config.too_complex() {
                    TooComplexPolicy::Fail => {
                        return Err(PathFinderError::TooComplex {
                            sequence: self.name.to_string(), start, end,
                            paths: frontier.len(), iterations
                        });
                    },
                    TooComplexPolicy::Skip => {
                        warn!(
                            "Evaluation too complex ({} unresolved paths, {iterations} iterations) at reference region {}:{start}-{end}. Variants in this region will not be included in results.",
                            frontier.len(), self.name
                        );
                        frontier.clear();
                        iterations = 0;
                        region_paths = 0;
                        head = match last_sync_path.clone() {
                            Some(path) => path,
                            None => return Err(PathFinderError::NoPath { sequence: self.name.to_string() })
                        };
                        self.skip_variants_to(&mut head, current_max_position + 1)?;
                    }
                }
            }

            if head.finished() && self.all_decided(&head) {
                // complete path, keep it if it beats the current best
                let position = head.called().position();
                head.add_sync_point(position);
                best = Some(match best {
                    Some(incumbent) => self.better(incumbent, head),
                    None => head
                });
                continue;
            }

            if self.enqueue_variant(&mut frontier, &head, Side::Called, &mut current_max_position)? {
                continue;
            }
            if self.enqueue_variant(&mut frontier, &head, Side::Baseline, &mut current_max_position)? {
                continue;
            }

            head.step();
            if head.in_sync() {
                self.skip_to_next_variant(&mut head)?;
            }

            if head.matches() {
                self.add_if_better(&mut frontier, head);
            } else {
                trace!("Head mismatch, discard");
            }
        }

        debug!("Reference {} had maximum path complexity of {max_paths} at {max_paths_region}", self.name);
        best.ok_or_else(|| PathFinderError::NoPath { sequence: self.name.to_string() })
    }

    /// True when every variant on both sides has been decided
    fn all_decided(&self, path: &Path) -> bool {
        path.called().next_variant_index() >= self.called.len() &&
            path.baseline().next_variant_index() >= self.baseline.len()
    }

    /// Index of the next variant for a half path, if it should be decided at the current position
    fn next_variant(&self, half_path: &HalfPath, side: Side) -> Option<usize> {
        let index = half_path.next_variant_index();
        let variant = self.variants(side).get(index)?;
        let start = self.clamped_start(variant);
        let ready = start <= half_path.position() + 1 ||
            (half_path.wants_future_variant_bases() && start <= half_path.variant_end_position()) ||
            half_path.finished();
        ready.then_some(index)
    }

    /// Branches the head on the next variant for a side, if one is ready.
    /// Returns true if the head was consumed.
    fn enqueue_variant(
        &self, frontier: &mut BTreeSet<Path<'a>>, head: &Path<'a>, side: Side, current_max_position: &mut i64
    ) -> Result<bool, PathFinderError> {
        let Some(index) = self.next_variant(head.half_path(side), side) else {
            return Ok(false);
        };
        let variant = self.variants(side)[index];
        *current_max_position = (*current_max_position).max(self.clamped_start(variant));
        trace!("Add alternatives to {side} {variant}");
        for path in head.add_variant(side, variant, index, self.orientor(side))? {
            self.add_if_better(frontier, path);
        }
        Ok(true)
    }

    /// Start of the next undecided variant for a side, or the last template position if there is none
    fn future_variant_position(&self, half_path: &HalfPath, side: Side) -> i64 {
        self.variants(side).get(half_path.next_variant_index())
            .map_or(self.last_template_position(), |v| self.clamped_start(v))
    }

    /// Moves an in-sync path to just before the next variant on either side
    fn skip_to_next_variant(&self, head: &mut Path<'a>) -> Result<(), PlaybackError> {
        let next_called = self.future_variant_position(head.called(), Side::Called);
        let next_baseline = self.future_variant_position(head.baseline(), Side::Baseline);
        let target = next_called.min(next_baseline).min(self.last_template_position()) - 1;
        if target > head.called().position() {
            head.move_forward(target)?;
        }
        Ok(())
    }

    /// Marks every undecided variant starting before `boundary` as skipped, then moves the path up to the boundary
    fn skip_variants_to(&self, head: &mut Path<'a>, boundary: i64) -> Result<(), PlaybackError> {
        for side in [Side::Called, Side::Baseline] {
            let variants = self.variants(side);
            let half_path = head.half_path_mut(side);
            let first = half_path.next_variant_index();
            let mut index = first;
            while index < variants.len() && (variants[index].start() as i64) < boundary {
                half_path.skip(variants[index], index);
                index += 1;
            }
            debug!("Skipped {} {side} variants before {}:{}", index - first, self.name, boundary + 1);
        }
        let target = boundary.min(self.last_template_position()) - 1;
        if target > head.called().position() {
            head.move_forward(target)?;
        }
        Ok(())
    }

    /// Returns the preferred of two paths; the incumbent wins full ties
    fn better(&self, incumbent: Path<'a>, challenger: Path<'a>) -> Path<'a> {
        let rank = self.config.path_preference().rank(&challenger, &incumbent, self.baseline.len(), self.called.len());
        if rank == Ordering::Greater {
            challenger
        } else {
            incumbent
        }
    }

    /// Adds a path to the frontier, keeping only the better of two equivalent paths
    fn add_if_better(&self, frontier: &mut BTreeSet<Path<'a>>, path: Path<'a>) {
        let keep = match frontier.take(&path) {
            Some(incumbent) => self.better(incumbent, path),
            None => path
        };
        frontier.insert(keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;
    use crate::data_types::oriented_variant::{MatchStatus, OrientedVariant};
    use crate::path::calculate_weights;
    use crate::test_helpers::{mock_variant, vcf_variant};

    /// Runs the search and verifies that the variants flagged `true` are included and the others excluded
    fn check(template: &[u8], called: &[(Variant, bool)], baseline: &[(Variant, bool)]) {
        let called_variants: Vec<Variant> = called.iter().map(|(v, _)| v.clone()).collect();
        let baseline_variants: Vec<Variant> = baseline.iter().map(|(v, _)| v.clone()).collect();
        let best = PathFinder::best_path(template, "currentName", &baseline_variants, &called_variants).unwrap();
        check_side(&best, Side::Called, called);
        check_side(&best, Side::Baseline, baseline);
    }

    fn check_side(best: &Path, side: Side, expected: &[(Variant, bool)]) {
        let included: Vec<usize> = best.included(side).iter().map(|ov| ov.variant().id()).collect();
        let excluded: Vec<usize> = best.excluded(side).iter().map(|v| v.id()).collect();
        for (variant, include) in expected.iter() {
            if *include {
                assert!(included.contains(&variant.id()), "the variant <{variant}> wasn't included");
            } else {
                assert!(excluded.contains(&variant.id()), "the variant <{variant}> wasn't excluded");
            }
        }
        assert_eq!(included.len(), expected.iter().filter(|(_, i)| *i).count());
        assert_eq!(excluded.len(), expected.iter().filter(|(_, i)| !*i).count());
    }

    fn check_weights(variants: &[OrientedVariant], weights: &[f64]) {
        assert_eq!(variants.len(), weights.len());
        for (ov, &weight) in variants.iter().zip(weights.iter()) {
            if weight == 0.0 {
                assert_eq!(ov.weight(), 0.0, "{ov}");
            } else {
                assert_approx_eq!(ov.weight(), weight);
            }
        }
    }

    const TEMPLATE: [u8; 7] = [1, 1, 1, 1, 1, 1, 2];

    #[test]
    fn test_best_path() {
        let template = [1, 1, 1, 1];
        let baseline = vec![mock_variant(2, 3, &[3], None)];
        let called = vec![mock_variant(2, 3, &[3], None)];
        let best = PathFinder::best_path(&template, "currentName", &baseline, &called).unwrap();
        assert_eq!(best.included(Side::Called)[0].variant().id(), called[0].id());
        assert!(best.excluded(Side::Called).is_empty());
        assert_eq!(best.included(Side::Baseline)[0].variant().id(), baseline[0].id());
        assert!(best.excluded(Side::Baseline).is_empty());

        // swapping the sides mirrors the result
        let best2 = PathFinder::best_path(&template, "currentName", &called, &baseline).unwrap();
        assert_eq!(best2.included(Side::Called)[0].variant().id(), baseline[0].id());
        assert_eq!(best2.included(Side::Baseline)[0].variant().id(), called[0].id());
    }

    /// Sorted ids of the variants included on, or excluded from, one side
    fn side_ids(path: &Path, side: Side, include: bool) -> Vec<usize> {
        let mut ids: Vec<usize> = if include {
            path.included(side).iter().map(|ov| ov.variant().id()).collect()
        } else {
            path.excluded(side).iter().map(|v| v.id()).collect()
        };
        ids.sort_unstable();
        ids
    }

    /// Weights of the included variants on one side, keyed by variant id
    fn side_weights(path: &Path, side: Side) -> Vec<(usize, f64)> {
        let mut called_included = path.included(Side::Called);
        let mut baseline_included = path.included(Side::Baseline);
        calculate_weights(path, &mut called_included, &mut baseline_included);
        let included = match side {
            Side::Called => called_included,
            Side::Baseline => baseline_included
        };
        let mut weights: Vec<(usize, f64)> = included.iter().map(|ov| (ov.variant().id(), ov.weight())).collect();
        weights.sort_by_key(|(id, _)| *id);
        weights
    }

    /// Searches with `x` as the baseline, then again with the sides swapped, and verifies the two results mirror each other
    fn check_mirrored<'a>(template: &'a [u8], x: &'a [Variant], y: &'a [Variant]) -> Path<'a> {
        let forward = PathFinder::best_path(template, "currentName", x, y).unwrap();
        let swapped = PathFinder::best_path(template, "currentName", y, x).unwrap();
        for (side, mirror) in [(Side::Baseline, Side::Called), (Side::Called, Side::Baseline)] {
            for include in [true, false] {
                assert_eq!(side_ids(&forward, side, include), side_ids(&swapped, mirror, include), "{side} include={include}");
            }
            let (expected, actual) = (side_weights(&forward, side), side_weights(&swapped, mirror));
            assert_eq!(expected.len(), actual.len());
            for ((id, weight), (mirror_id, mirror_weight)) in expected.iter().zip(actual.iter()) {
                assert_eq!(id, mirror_id);
                if *weight == 0.0 {
                    assert_eq!(*mirror_weight, 0.0);
                } else {
                    assert_approx_eq!(*weight, *mirror_weight);
                }
            }
        }
        forward
    }

    #[test]
    fn test_swap_equivalent_deletions() {
        // one side inserts and deletes an A, the other deletes an A twice; X1 pairs equally well with Y0 or Y1
        let template = dna_template("CTAAAAAATACGGT");
        let x = vec![
            vcf_variant(0, 4, "A", "AA", "1/1"),
            vcf_variant(1, 6, "AA", "A", "1/1")
        ];
        let y = vec![
            vcf_variant(2, 3, "AA", "A", "1/1"),
            vcf_variant(3, 6, "AA", "A", "1/1")
        ];
        let best = check_mirrored(&template, &x, &y);
        // the lowest ids win the tie
        assert_eq!(side_ids(&best, Side::Baseline, true), vec![1]);
        assert_eq!(side_ids(&best, Side::Called, true), vec![2]);
        assert_eq!(side_ids(&best, Side::Called, false), vec![3]);
        assert_eq!(side_weights(&best, Side::Called), vec![(2, 1.0)]);
    }

    #[test]
    fn test_swap_homopolymer_deletions() {
        // any two deletions from the run of A give the same haplotype
        let template = [1, 1, 1, 1, 1, 1, 1, 1, 2];
        let x = vec![
            mock_variant(2, 3, &[], None),
            mock_variant(5, 6, &[], None)
        ];
        let y = vec![
            mock_variant(3, 4, &[], None),
            mock_variant(6, 7, &[], None),
            mock_variant(8, 9, &[], None)
        ];
        let best = check_mirrored(&template, &x, &y);
        assert_eq!(best.included(Side::Baseline).len(), 2);
        assert_eq!(best.included(Side::Called).len(), 2);
        assert_eq!(best.excluded(Side::Called).len(), 1);
    }

    #[test]
    fn test_best_path_shifted_deletion() {
        check(&TEMPLATE, &[
            (mock_variant(2, 3, &[3], None), true),
            (mock_variant(4, 5, &[], None), true)
        ], &[
            (mock_variant(2, 3, &[3], None), true),
            (mock_variant(5, 6, &[], None), true)
        ]);
    }

    #[test]
    fn test_best_path_one_sided() {
        check(&TEMPLATE, &[
            (mock_variant(2, 3, &[3], None), true),
            (mock_variant(4, 5, &[], None), false)
        ], &[
            (mock_variant(2, 3, &[3], None), true)
        ]);
        check(&TEMPLATE, &[
            (mock_variant(2, 3, &[3], None), true)
        ], &[
            (mock_variant(2, 3, &[3], None), true),
            (mock_variant(5, 6, &[], None), false)
        ]);
    }

    #[test]
    fn test_best_path_heterozygous() {
        // genotype order does not matter when unphased
        check(&TEMPLATE, &[
            (mock_variant(2, 3, &[3], Some(&[4])), true)
        ], &[
            (mock_variant(2, 3, &[4], Some(&[3])), true)
        ]);

        // sharing a single allele is not enough
        check(&TEMPLATE, &[
            (mock_variant(2, 3, &[3], Some(&[4])), false)
        ], &[
            (mock_variant(2, 3, &[4], Some(&[2])), false)
        ]);

        check(&TEMPLATE, &[
            (mock_variant(2, 3, &[3], Some(&[4])), false),
            (mock_variant(5, 7, &[2], Some(&[1])), true)
        ], &[
            (mock_variant(2, 3, &[4], Some(&[2])), false),
            (mock_variant(5, 7, &[1], Some(&[2])), true)
        ]);
    }

    #[test]
    fn test_best_path_adjacent() {
        check(&TEMPLATE, &[
            (mock_variant(2, 3, &[3], None), true),
            (mock_variant(3, 4, &[2], Some(&[1])), true)
        ], &[
            (mock_variant(2, 3, &[3], None), true),
            (mock_variant(3, 4, &[1], Some(&[2])), true)
        ]);
        check(&TEMPLATE, &[
            (mock_variant(2, 3, &[], None), true),
            (mock_variant(3, 4, &[2], Some(&[1])), true)
        ], &[
            (mock_variant(2, 3, &[], None), true),
            (mock_variant(3, 4, &[1], Some(&[2])), true)
        ]);
        check(&TEMPLATE, &[
            (mock_variant(2, 3, &[3], Some(&[1])), false),
            (mock_variant(3, 4, &[2], Some(&[1])), true)
        ], &[
            (mock_variant(2, 3, &[3], None), false),
            (mock_variant(3, 4, &[1], Some(&[2])), true)
        ]);
    }

    #[test]
    fn test_edge_deletion() {
        // disagree
        check(&TEMPLATE, &[(mock_variant(4, 8, &[], Some(&[1, 1, 2])), false)], &[(mock_variant(7, 8, &[3], None), false)]);
        // agree
        check(&TEMPLATE, &[(mock_variant(4, 8, &[], Some(&[1, 1, 2])), true)], &[(mock_variant(4, 8, &[1, 1, 2], Some(&[])), true)]);
        // nothing in baseline
        check(&TEMPLATE, &[(mock_variant(4, 8, &[], Some(&[1, 1, 2])), false)], &[]);
        // nothing in calls
        check(&TEMPLATE, &[], &[(mock_variant(4, 8, &[1, 1, 2], Some(&[])), false)]);
        // disagree, both deletions at the edge
        check(&TEMPLATE, &[(mock_variant(4, 8, &[], Some(&[1, 1, 2])), false)], &[(mock_variant(6, 8, &[], None), false)]);
    }

    #[test]
    fn test_edge_insertion() {
        // disagree
        check(&TEMPLATE, &[(mock_variant(8, 8, &[], Some(&[3, 3, 3])), false)], &[(mock_variant(8, 8, &[3], None), false)]);
        // agree
        check(&TEMPLATE, &[(mock_variant(8, 8, &[], Some(&[3, 3, 3])), true)], &[(mock_variant(8, 8, &[3, 3, 3], Some(&[])), true)]);
        // only in baseline
        check(&TEMPLATE, &[], &[(mock_variant(8, 8, &[3, 3, 3], Some(&[])), false)]);
        // only in calls
        check(&TEMPLATE, &[(mock_variant(8, 8, &[], Some(&[3, 3, 3])), false)], &[]);
    }

    #[test]
    fn test_insertion() {
        check(&TEMPLATE, &[(mock_variant(2, 2, &[3], None), true)], &[(mock_variant(2, 2, &[3], None), true)]);
    }

    #[test]
    fn test_shifted_insertions() {
        let template = [1, 1, 3, 1, 1, 1, 1, 1, 2];
        check(
            &template,
            &[(mock_variant(3, 3, &[3, 1, 2, 4, 1], Some(&[])), true)],
            &[(mock_variant(5, 5, &[2, 4, 1, 3, 1], Some(&[])), true)]
        );
    }

    #[test]
    fn test_template_ends() {
        let template = [1, 1];
        check(&template, &[(mock_variant(2, 3, &[2], Some(&[1])), true)], &[(mock_variant(2, 3, &[2], Some(&[1])), true)]);
        check(&template, &[(mock_variant(2, 3, &[2], Some(&[1])), false)], &[(mock_variant(2, 3, &[2], Some(&[3])), false)]);
        check(&template, &[(mock_variant(1, 2, &[2], Some(&[1])), true)], &[(mock_variant(1, 2, &[2], Some(&[1])), true)]);
        check(&template, &[(mock_variant(1, 2, &[2], Some(&[1])), false)], &[(mock_variant(1, 2, &[2], Some(&[3])), false)]);

        let template = [1, 1, 3];
        check(&template, &[(mock_variant(1, 2, &[], None), true)], &[(mock_variant(1, 2, &[], None), true)]);
        check(&template, &[(mock_variant(1, 2, &[], None), false)], &[(mock_variant(1, 2, &[2], Some(&[])), false)]);
        check(&template, &[(mock_variant(1, 1, &[2], None), true)], &[(mock_variant(1, 1, &[2], None), true)]);
        check(&template, &[(mock_variant(1, 1, &[2], None), false)], &[(mock_variant(1, 1, &[3], None), false)]);
    }

    #[test]
    fn test_overlapping() {
        let template = [1, 1, 3, 1, 2];
        check(&template, &[
            (vcf_variant(0, 1, "AA", "C", "1/1"), false),
            (vcf_variant(1, 2, "AG", "C", "1/1"), false)
        ], &[
            (vcf_variant(0, 1, "A", "G", "1/1"), false)
        ]);
        check(&template, &[
            (vcf_variant(0, 1, "AA", "C", "1/1"), false),
            (vcf_variant(1, 2, "AG", "C", "1/1"), true)
        ], &[
            (vcf_variant(0, 1, "A", "G", "1/1"), false),
            (vcf_variant(1, 2, "AG", "C", "1/1"), true)
        ]);
    }

    #[test]
    fn test_multi_allelic() {
        let template = [1, 1, 2, 4, 4];
        check(&template, &[(vcf_variant(0, 3, "C", "G,T", "1/2"), true)], &[(vcf_variant(0, 3, "C", "T,G", "1/2"), true)]);
        check(&template, &[
            (vcf_variant(0, 1, "A", "T,G", "1/2"), true),
            (vcf_variant(1, 3, "C", "G,T", "1/2"), true)
        ], &[
            (vcf_variant(0, 1, "A", "G,T", "1/2"), true),
            (vcf_variant(1, 3, "C", "T,G", "1/2"), true)
        ]);
    }

    #[test]
    fn test_shifted_het_insertions() {
        let template = [1, 1, 3, 1, 1, 2, 2];
        check(&template, &[(vcf_variant(0, 4, "A", "ACTAGA", "0/1"), true)], &[(vcf_variant(0, 2, "A", "AGACTA", "0/1"), true)]);
    }

    fn run_weights(template: &[u8], baseline: &[Variant], called: &[Variant]) -> Vec<f64> {
        let best = PathFinder::best_path(template, "currentName", baseline, called).unwrap();
        let mut called_included = best.included(Side::Called);
        let mut baseline_included = best.included(Side::Baseline);
        calculate_weights(&best, &mut called_included, &mut baseline_included);
        called_included.iter().map(|ov| ov.weight()).collect()
    }

    #[test]
    fn test_heterozygous_insert() {
        let template = dna_template("ACATTTTACA");
        let a = vec![
            vcf_variant(0, 2, "C", "T", "1/1"),
            vcf_variant(1, 7, "T", "TT", "0/1"),
            vcf_variant(2, 9, "C", "T", "1/1")
        ];
        let b = vec![
            vcf_variant(0, 2, "C", "T", "1/1"),
            vcf_variant(1, 4, "T", "TT", "1/1"),
            vcf_variant(2, 9, "C", "T", "1/1")
        ];
        let best = PathFinder::best_path(&template, "currentName", &b, &a).unwrap();
        let mut called_included = best.included(Side::Called);
        let mut baseline_included = best.included(Side::Baseline);
        calculate_weights(&best, &mut called_included, &mut baseline_included);
        check_weights(&called_included, &[1.0, 1.0]);
        assert_eq!(best.excluded(Side::Called)[0].id(), 1);

        let best = PathFinder::best_path(&template, "currentName", &a, &b).unwrap();
        let mut called_included = best.included(Side::Called);
        let mut baseline_included = best.included(Side::Baseline);
        calculate_weights(&best, &mut called_included, &mut baseline_included);
        check_weights(&called_included, &[1.0, 1.0]);
    }

    #[test]
    fn test_heterozygous_delete() {
        let template = dna_template("ACATTTTACA");
        let a = vec![
            vcf_variant(0, 2, "C", "T", "1/1"),
            vcf_variant(1, 6, "TT", "T", "1/0"),
            vcf_variant(2, 9, "C", "T", "1/1")
        ];
        let b = vec![
            vcf_variant(0, 2, "C", "T", "1/1"),
            vcf_variant(1, 4, "TT", "T", "1/1"),
            vcf_variant(2, 9, "C", "T", "1/1")
        ];
        assert_eq!(run_weights(&template, &b, &a), vec![1.0, 1.0]);
        assert_eq!(run_weights(&template, &a, &b), vec![1.0, 1.0]);
    }

    #[test]
    fn test_no_op() {
        let template = dna_template("ACATTTTACA");
        let a = vec![
            vcf_variant(0, 2, "C", "T", "1/1"),
            vcf_variant(1, 3, "AT", "A", "1/1"),
            vcf_variant(2, 6, "T", "TT", "1/1"),
            vcf_variant(3, 9, "C", "T", "1/1")
        ];
        let b = vec![
            vcf_variant(0, 2, "C", "T", "1/1"),
            vcf_variant(1, 9, "C", "T", "1/1")
        ];
        let best = PathFinder::best_path(&template, "currentName", &b, &a).unwrap();
        // the no-op variants are initially included
        let mut called_included = best.included(Side::Called);
        let mut baseline_included = best.included(Side::Baseline);
        assert_eq!(called_included.len(), 4);
        assert_eq!(baseline_included.len(), 2);
        let (called_tp, baseline_tp) = calculate_weights(&best, &mut called_included, &mut baseline_included);
        assert_eq!(called_tp.len(), 2);
        assert_eq!(baseline_tp.len(), 2);
        check_weights(&called_included, &[1.0, 0.0, 0.0, 1.0]);
        assert_eq!(called_included[1].status(), MatchStatus::NoOp);
        assert_eq!(called_included[2].status(), MatchStatus::NoOp);
    }

    #[test]
    fn test_insert_prior_to_snp() {
        let template = [1, 1, 1, 1, 1, 1, 2, 1, 1];
        let a = vec![
            vcf_variant(0, 1, "A", "AGGG", "1/1"),
            vcf_variant(1, 2, "A", "C", "1/1")
        ];
        let b = vec![vcf_variant(0, 2, "A", "GGGC", "1/1")];
        let best = PathFinder::best_path(&template, "currentName", &b, &a).unwrap();
        let mut called_included = best.included(Side::Called);
        let mut baseline_included = best.included(Side::Baseline);
        calculate_weights(&best, &mut called_included, &mut baseline_included);
        check_weights(&called_included, &[0.5, 0.5]);
        check_weights(&baseline_included, &[2.0]);

        // symmetric under a side swap
        let best = PathFinder::best_path(&template, "currentName", &a, &b).unwrap();
        let mut called_included = best.included(Side::Called);
        let mut baseline_included = best.included(Side::Baseline);
        calculate_weights(&best, &mut called_included, &mut baseline_included);
        check_weights(&baseline_included, &[0.5, 0.5]);
    }

    #[test]
    fn test_past_end_of_template() {
        let template = dna_template("ACATTTTACA");
        let variants = vec![vcf_variant(0, 12, "C", "T", "1/1")];
        let best = PathFinder::best_path(&template, "seq", &variants, &variants).unwrap();
        assert_eq!(best.included(Side::Called).len(), 1);
        assert_eq!(best.included(Side::Baseline).len(), 1);
    }

    #[test]
    fn test_unsorted_input() {
        let template = dna_template("ACGTACGTAC");
        let called = vec![vcf_variant(0, 8, "T", "A", "0/1"), vcf_variant(1, 2, "C", "G", "1/1")];
        let baseline = vec![vcf_variant(0, 2, "C", "G", "1/1"), vcf_variant(1, 8, "T", "A", "1/0")];
        let best = PathFinder::best_path(&template, "seq", &baseline, &called).unwrap();
        let ids: Vec<usize> = best.included(Side::Called).iter().map(|ov| ov.variant().id()).collect();
        assert_eq!(ids, vec![1, 0]);
        assert_eq!(best.included(Side::Baseline).len(), 2);
    }

    #[test]
    fn test_empty() {
        let template = dna_template("ACGT");
        let best = PathFinder::best_path(&template, "seq", &[], &[]).unwrap();
        assert!(best.included(Side::Called).is_empty());
        assert!(best.finished());
    }

    #[test]
    fn test_orientor_check() {
        let template = dna_template("ACGT");
        let called = vec![vcf_variant(0, 2, "C", "G", "0/1/1")];
        let result = PathFinder::new(&template, "seq", &[], &called, PathFinderConfig::default());
        assert!(matches!(result, Err(PathFinderError::Orientor(_))));
    }

    /// Heterozygous insertions in a long homopolymer stay consistent for many bases, so paths pile up
    fn complex_region() -> (Vec<u8>, Vec<Variant>, Vec<Variant>) {
        let template = dna_template(&format!("{}{}", "A".repeat(30), "CGTCGTCGTC"));
        let mut called: Vec<Variant> = (0..12)
            .map(|i| vcf_variant(i, 3 + i, "A", "AA", "0/1"))
            .collect();
        called.push(vcf_variant(12, 35, "G", "T", "1/1"));
        let baseline = vec![vcf_variant(0, 35, "G", "T", "1/1")];
        (template, called, baseline)
    }

    #[test]
    fn test_too_complex_fail() {
        let (template, called, baseline) = complex_region();
        let config = PathFinderConfigBuilder::default()
            .max_paths(4)
            .build().unwrap();
        let result = PathFinder::new(&template, "seq", &baseline, &called, config).unwrap().search();
        match result {
            Err(PathFinderError::TooComplex { sequence, .. }) => assert_eq!(sequence, "seq"),
            _ => panic!("expected a too complex error")
        }
    }

    #[test]
    fn test_too_complex_skip() {
        let (template, called, baseline) = complex_region();
        let config = PathFinderConfigBuilder::default()
            .max_paths(4)
            .too_complex(TooComplexPolicy::Skip)
            .build().unwrap();
        let best = PathFinder::new(&template, "seq", &baseline, &called, config).unwrap().search().unwrap();
        assert!(!best.skipped(Side::Called).is_empty());
        // the downstream SNP is still matched
        let baseline_ids: Vec<usize> = best.included(Side::Baseline).iter().map(|ov| ov.variant().id()).collect();
        assert_eq!(baseline_ids, vec![0]);
        assert!(best.included(Side::Called).iter().any(|ov| ov.variant().id() == 12));
        let decided = best.included(Side::Called).len() + best.excluded(Side::Called).len() + best.skipped(Side::Called).len();
        assert_eq!(decided, called.len());
    }

    #[test]
    fn test_path_preference() {
        let template = [1, 1, 1, 1, 1, 1, 2];
        let called = vec![mock_variant(2, 3, &[3], None)];
        let baseline = vec![mock_variant(2, 3, &[3], None)];
        let path = Path::new(&template);
        let excluded = path.add_variant(Side::Called, &called[0], 0, Orientor::Unphased).unwrap().remove(0);
        let included = path.add_variant(Side::Called, &called[0], 0, Orientor::Unphased).unwrap().remove(1);
        let both = included.add_variant(Side::Baseline, &baseline[0], 0, Orientor::Unphased).unwrap().remove(1);

        let sum = PathPreference::MaxSumBoth;
        assert_eq!(sum.rank(&included, &excluded, 1, 1), Ordering::Greater);
        assert_eq!(sum.rank(&excluded, &included, 1, 1), Ordering::Less);
        assert_eq!(sum.rank(&both, &included, 1, 1), Ordering::Greater);
        assert_eq!(sum.rank(&included, &included, 1, 1), Ordering::Equal);

        let calls = PathPreference::MaxCallsMinBaseline;
        assert_eq!(calls.rank(&included, &both, 1, 1), Ordering::Greater);
        assert_eq!(calls.rank(&excluded, &both, 1, 1), Ordering::Less);
        assert_eq!("calls-min-base".parse::<PathPreference>().unwrap(), calls);
    }

    fn dna_template(sequence: &str) -> Vec<u8> {
        crate::data_types::dna::encode(sequence.as_bytes())
    }
}
