/*!
# Paths
A `Path` is one candidate reconciliation of the two sides: a baseline half path and a called half path that are replayed in lockstep.
Paths branch whenever a variant is decided, and are pruned as soon as their haplotypes disagree.

Once the best path is found, `calculate_weights` splits the included variants into sync regions and assigns each one a share of the credit.
*/

use std::cmp::Ordering;
use std::fmt;

use crate::data_types::oriented_variant::{Haplotype, MatchStatus, OrientedVariant};
use crate::data_types::variants::Variant;
use crate::orientor::Orientor;
use crate::replay::half_path::HalfPath;
use crate::replay::haplotype_playback::PlaybackError;
use crate::util::persistent_list::PersistentList;

/// The two sides of a comparison
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum_macros::Display)]
pub enum Side {
    #[strum(serialize = "baseline")]
    Baseline,
    #[strum(serialize = "called")]
    Called
}

/// A candidate pairing of baseline and called decisions
#[derive(Clone, Debug)]
pub struct Path<'a> {
    /// Decisions for the called variants
    called: HalfPath<'a>,
    /// Decisions for the baseline variants
    baseline: HalfPath<'a>,
    /// Template positions where every haplotype was in sync, newest first
    sync_points: PersistentList<i64>,
    /// Baseline variants included since the last sync point
    baseline_since_sync: usize,
    /// Called variants included since the last sync point
    called_since_sync: usize
}

impl<'a> Path<'a> {
    /// Creates the root path with no decisions
    pub fn new(template: &'a [u8]) -> Self {
        Self {
            called: HalfPath::new(template),
            baseline: HalfPath::new(template),
            sync_points: PersistentList::new(),
            baseline_since_sync: 0,
            called_since_sync: 0
        }
    }

    pub fn half_path(&self, side: Side) -> &HalfPath<'a> {
        match side {
            Side::Baseline => &self.baseline,
            Side::Called => &self.called
        }
    }

    pub(crate) fn half_path_mut(&mut self, side: Side) -> &mut HalfPath<'a> {
        match side {
            Side::Baseline => &mut self.baseline,
            Side::Called => &mut self.called
        }
    }

    /// True if all four haplotypes sit on the same template position with nothing left to play from decided variants
    pub fn in_sync(&self) -> bool {
        let (called, baseline) = (&self.called, &self.baseline);
        called.compare_haplotype_positions() == Ordering::Equal &&
            baseline.compare_haplotype_positions() == Ordering::Equal &&
            called.position() == baseline.position() &&
            called.position() >= called.variant_end_position() &&
            baseline.position() >= baseline.variant_end_position() &&
            called.is_on_template() &&
            baseline.is_on_template()
    }

    /// True once every haplotype has run off the end
    pub fn finished(&self) -> bool {
        self.called.finished() && self.baseline.finished()
    }

    /// Branches on a variant: one path excluding it, and one path per orientation that fits the current haplotypes.
    /// A sync point is recorded first if this path is currently in sync.
    /// # Arguments
    /// * `side` - the side the variant belongs to
    /// * `variant` - the variant to decide
    /// * `index` - index of the variant within its side
    /// * `orientor` - orientation strategy for this side
    /// # Errors
    /// * if an accepted orientation could not be queued, which would indicate a replay bug
    pub fn add_variant(&self, side: Side, variant: &'a Variant, index: usize, orientor: Orientor) -> Result<Vec<Path<'a>>, PlaybackError> {
        let mut parent = self.clone();
        if parent.in_sync() {
            parent.add_sync_point(parent.called.position());
            parent.baseline_since_sync = 0;
            parent.called_since_sync = 0;
        }

        let mut paths = vec![];
        let mut exclude = parent.clone();
        exclude.half_path_mut(side).exclude(variant, index);
        paths.push(exclude);

        for ov in orientor.orientations(variant) {
            if parent.half_path(side).is_new(&ov) {
                let mut include = parent.clone();
                include.half_path_mut(side).include(ov, index)?;
                match side {
                    Side::Baseline => include.baseline_since_sync += 1,
                    Side::Called => include.called_since_sync += 1
                }
                paths.push(include);
            }
        }
        Ok(paths)
    }

    /// Records a sync point
    pub(crate) fn add_sync_point(&mut self, position: i64) {
        self.sync_points = self.sync_points.push(position);
    }

    fn step_haplotype(&mut self, haplotype: Haplotype) {
        self.called.step_haplotype(haplotype);
        self.baseline.step_haplotype(haplotype);
    }

    /// Advances the path by one base.
    /// If the called haplotypes are at different positions, the lagging one catches up on both sides.
    /// A finished haplotype never holds the other one back.
    pub fn step(&mut self) {
        let a_open = !self.called.haplotype(Haplotype::A).finished();
        let b_open = !self.called.haplotype(Haplotype::B).finished();
        match self.called.compare_haplotype_positions() {
            Ordering::Greater if b_open => self.step_haplotype(Haplotype::B),
            Ordering::Less if a_open => self.step_haplotype(Haplotype::A),
            _ => {
                self.called.step();
                self.baseline.step();
            }
        }
    }

    /// True if the haplotypes agree across the sides at the current step
    pub fn matches(&self) -> bool {
        [Haplotype::A, Haplotype::B].into_iter().all(|h| {
            self.called.haplotype(h).matches(self.baseline.haplotype(h))
        })
    }

    /// Fast-forwards every haplotype to a template position
    pub fn move_forward(&mut self, position: i64) -> Result<(), PlaybackError> {
        self.called.move_forward(position)?;
        self.baseline.move_forward(position)
    }

    /// Sync points in the order they were found
    pub fn sync_points(&self) -> Vec<i64> {
        self.sync_points.to_vec()
    }

    /// Included orientations for one side, in decision order
    pub fn included(&self, side: Side) -> Vec<OrientedVariant<'a>> {
        self.half_path(side).included().to_vec()
    }

    /// Excluded variants for one side, in decision order
    pub fn excluded(&self, side: Side) -> Vec<&'a Variant> {
        self.half_path(side).excluded().to_vec()
    }

    /// Skipped variants for one side, in decision order
    pub fn skipped(&self, side: Side) -> Vec<&'a Variant> {
        self.half_path(side).skipped().to_vec()
    }

    // getters
    pub fn called(&self) -> &HalfPath<'a> {
        &self.called
    }

    pub fn baseline(&self) -> &HalfPath<'a> {
        &self.baseline
    }

    pub fn baseline_since_sync(&self) -> usize {
        self.baseline_since_sync
    }

    pub fn called_since_sync(&self) -> usize {
        self.called_since_sync
    }
}

impl PartialEq for Path<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Path<'_> {}

impl PartialOrd for Path<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Path<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.called.cmp(&other.called)
            .then_with(|| self.baseline.cmp(&other.baseline))
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sync_points: Vec<String> = self.sync_points().iter().map(|p| (p + 1).to_string()).collect();
        write!(f, "baseline: {} called: {} sync_points: [{}]", self.baseline, self.called, sync_points.join(", "))
    }
}

/// Finds the sync region a variant start belongs to.
/// A region ends at its sync point (inclusive); anything after the last sync point belongs to the last region.
fn region_index(sync_points: &[i64], start: i64) -> usize {
    sync_points.iter()
        .position(|&point| start <= point)
        .unwrap_or(sync_points.len().saturating_sub(1))
}

fn region_counts(sync_points: &[i64], variants: &[OrientedVariant]) -> Vec<usize> {
    let mut counts = vec![0; sync_points.len().max(1)];
    for ov in variants.iter() {
        counts[region_index(sync_points, ov.start() as i64)] += 1;
    }
    counts
}

fn assign_weights(sync_points: &[i64], variants: &mut [OrientedVariant], own_counts: &[usize], other_counts: &[usize]) {
    for ov in variants.iter_mut() {
        let region = region_index(sync_points, ov.start() as i64);
        let other = other_counts[region];
        if other == 0 {
            ov.set_weight(0.0);
            ov.set_status(MatchStatus::NoOp);
        } else {
            ov.set_weight(other as f64 / own_counts[region] as f64);
            ov.set_status(MatchStatus::TruePositive);
        }
    }
}

/// Weights the included variants of a path by sync region.
/// Within a region, each variant receives `other side count / own side count` and `MatchStatus::TruePositive`.
/// Regions where the other side included nothing are no-ops: the variants there receive weight 0 and `MatchStatus::NoOp`.
/// Weights and statuses are written into the provided slices; the returned lists only hold the true positives.
/// # Arguments
/// * `path` - the finished best path
/// * `called` - the included called variants, usually `path.included(Side::Called)`
/// * `baseline` - the included baseline variants, usually `path.included(Side::Baseline)`
pub fn calculate_weights<'a>(
    path: &Path<'a>, called: &mut [OrientedVariant<'a>], baseline: &mut [OrientedVariant<'a>]
) -> (Vec<OrientedVariant<'a>>, Vec<OrientedVariant<'a>>) {
    let sync_points = path.sync_points();
    let called_counts = region_counts(&sync_points, called);
    let baseline_counts = region_counts(&sync_points, baseline);
    assign_weights(&sync_points, called, &called_counts, &baseline_counts);
    assign_weights(&sync_points, baseline, &baseline_counts, &called_counts);

    let true_positives = |variants: &[OrientedVariant<'a>]| -> Vec<OrientedVariant<'a>> {
        variants.iter()
            .filter(|ov| ov.status() == MatchStatus::TruePositive)
            .copied()
            .collect()
    };
    (true_positives(&*called), true_positives(&*baseline))
}
