/*!
# ROC aggregation
Weighted true/false positive tallies keyed by call score.
Points are additive, so per-sequence containers can be merged in any order before the curve is built.
*/

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// A single point (or partial tally) on an ROC curve
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RocPoint<T> {
    /// The score threshold this point corresponds to, if any
    pub threshold: Option<T>,
    /// Weighted true positives, in baseline-equivalent units
    pub true_positives: f64,
    /// False positive calls
    pub false_positives: f64,
    /// Unweighted true positive calls
    pub raw_true_positives: f64
}

impl<T> RocPoint<T> {
    /// Constructor
    pub fn new(threshold: Option<T>, true_positives: f64, false_positives: f64, raw_true_positives: f64) -> Self {
        Self {
            threshold, true_positives, false_positives, raw_true_positives
        }
    }

    /// Adds the counts of another point into this one, keeping our threshold
    pub fn add(&mut self, other: &RocPoint<T>) {
        self.true_positives += other.true_positives;
        self.false_positives += other.false_positives;
        self.raw_true_positives += other.raw_true_positives;
    }

    /// Precision at this point, if any calls were made
    pub fn precision(&self) -> Option<f64> {
        let denom = self.true_positives + self.false_positives;
        if denom > 0.0 {
            Some(self.true_positives / denom)
        } else {
            None
        }
    }

    /// Recall at this point relative to a baseline total
    pub fn recall(&self, total_baseline: f64) -> Option<f64> {
        if total_baseline > 0.0 {
            Some(self.true_positives / total_baseline)
        } else {
            None
        }
    }
}

impl<T> AddAssign<&RocPoint<T>> for RocPoint<T> {
    fn add_assign(&mut self, rhs: &RocPoint<T>) {
        self.add(rhs);
    }
}

/// Harmonic mean of precision and recall, 0.0 when both are 0
pub fn f_measure(precision: f64, recall: f64) -> f64 {
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

/// Interpolates a curve so that no true positive jump between adjacent points exceeds `tp_step`.
/// Interpolated points take their threshold from `interpolator`, which receives both neighbouring thresholds and the fraction between them.
/// Raw true positives are only interpolated if any input point carries them.
/// # Arguments
/// * `points` - curve points, sorted by increasing true positives
/// * `tp_step` - the largest allowed true positive increment; values of 1 or less disable interpolation
/// * `interpolator` - produces a threshold for an interpolated point
pub fn interpolate<T, F>(points: &[RocPoint<T>], tp_step: f64, interpolator: F) -> Vec<RocPoint<T>>
where
    T: Clone,
    F: Fn(Option<&T>, Option<&T>, f64) -> Option<T>
{
    if tp_step <= 1.0 || points.is_empty() {
        return points.to_vec();
    }
    let has_raw = points.iter().any(|p| p.raw_true_positives > 0.0);
    let mut result = vec![points[0].clone()];
    for window in points.windows(2) {
        let (last, point) = (&window[0], &window[1]);
        let tp_delta = point.true_positives - last.true_positives;
        if tp_delta > tp_step {
            let f_step = tp_step / tp_delta;
            let mut f = f_step;
            while f < 1.0 {
                let raw = if has_raw {
                    last.raw_true_positives + f * (point.raw_true_positives - last.raw_true_positives)
                } else {
                    0.0
                };
                result.push(RocPoint::new(
                    interpolator(last.threshold.as_ref(), point.threshold.as_ref(), f),
                    last.true_positives + f * tp_delta,
                    last.false_positives + f * (point.false_positives - last.false_positives),
                    raw
                ));
                f += f_step;
            }
        }
        result.push(point.clone());
    }
    result
}

/// Score key that sorts the best (highest) score first
#[derive(Clone, Copy, Debug)]
struct DescendingScore(f64);

impl PartialEq for DescendingScore {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DescendingScore {}

impl PartialOrd for DescendingScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DescendingScore {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.total_cmp(&self.0)
    }
}

/// Accumulates scored calls into ROC points
#[derive(Clone, Debug, Default)]
pub struct RocContainer {
    /// Per-score tallies, best score first
    points: BTreeMap<DescendingScore, RocPoint<f64>>,
    /// Calls with no usable score
    unscored: u64
}

impl RocContainer {
    /// Records a called variant.
    /// # Arguments
    /// * `score` - the call score; missing or non-finite scores are counted but not thresholded
    /// * `weight` - the call weight, where 0.0 marks a false positive
    pub fn add_call(&mut self, score: Option<f64>, weight: f64) {
        let Some(score) = score.filter(|s| s.is_finite()) else {
            self.unscored += 1;
            return;
        };
        let point = if weight > 0.0 {
            RocPoint::new(Some(score), weight, 0.0, 1.0)
        } else {
            RocPoint::new(Some(score), 0.0, 1.0, 0.0)
        };
        self.points.entry(DescendingScore(score))
            .and_modify(|p| p.add(&point))
            .or_insert(point);
    }

    /// The cumulative curve, from the strictest threshold down to the loosest
    pub fn curve(&self) -> Vec<RocPoint<f64>> {
        let mut total = RocPoint::new(None, 0.0, 0.0, 0.0);
        self.points.values()
            .map(|p| {
                total.add(p);
                RocPoint { threshold: p.threshold, ..total.clone() }
            })
            .collect()
    }

    /// The cumulative point that maximizes F-measure, preferring the loosest threshold on ties
    /// # Arguments
    /// * `total_baseline` - the number of baseline variants, which is the recall denominator
    pub fn best_f_measure(&self, total_baseline: u64) -> Option<RocPoint<f64>> {
        let mut best: Option<(f64, RocPoint<f64>)> = None;
        for point in self.curve() {
            let precision = point.precision().unwrap_or(0.0);
            let recall = point.recall(total_baseline as f64).unwrap_or(0.0);
            let f = f_measure(precision, recall);
            if best.as_ref().map_or(true, |(b, _)| f >= *b) {
                best = Some((f, point));
            }
        }
        best.map(|(_, point)| point)
    }

    // getters
    pub fn unscored(&self) -> u64 {
        self.unscored
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl AddAssign<&RocContainer> for RocContainer {
    fn add_assign(&mut self, rhs: &RocContainer) {
        for (score, point) in rhs.points.iter() {
            self.points.entry(*score)
                .and_modify(|p| p.add(point))
                .or_insert_with(|| point.clone());
        }
        self.unscored += rhs.unscored;
    }
}
