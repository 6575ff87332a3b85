use serde::Serialize;
use std::ops::AddAssign;

/// High-level counts for one comparison, unweighted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SummaryMetrics {
    /// Number of baseline variants explained by the calls
    pub baseline_tp: u64,
    /// Number of baseline variants left unexplained
    pub baseline_fn: u64,
    /// Number of called variants that explain baseline variants
    pub called_tp: u64,
    /// Number of called variants that explain nothing
    pub called_fp: u64,
    /// Number of variants (either side) dropped from too-complex regions
    pub skipped: u64
}

impl AddAssign for SummaryMetrics {
    // Enables += with stats
    fn add_assign(&mut self, rhs: Self) {
        self.baseline_tp += rhs.baseline_tp;
        self.baseline_fn += rhs.baseline_fn;
        self.called_tp += rhs.called_tp;
        self.called_fp += rhs.called_fp;
        self.skipped += rhs.skipped;
    }
}

impl SummaryMetrics {
    /// Constructor
    pub fn new(baseline_tp: u64, baseline_fn: u64, called_tp: u64, called_fp: u64, skipped: u64) -> Self {
        Self {
            baseline_tp, baseline_fn, called_tp, called_fp, skipped
        }
    }

    /// Calculates recall if it can, which is relative to the baseline
    pub fn recall(&self) -> Option<f64> {
        let denom = self.baseline_tp + self.baseline_fn;
        if denom > 0 {
            Some(self.baseline_tp as f64 / denom as f64)
        } else {
            None
        }
    }

    /// Calculates precision if it can, which is relative to the calls
    pub fn precision(&self) -> Option<f64> {
        let denom = self.called_tp + self.called_fp;
        if denom > 0 {
            Some(self.called_tp as f64 / denom as f64)
        } else {
            None
        }
    }

    /// Calculates F1 score if possible
    pub fn f1(&self) -> Option<f64> {
        if let (Some(recall), Some(precision)) = (self.recall(), self.precision()) {
            if recall + precision > 0.0 {
                Some(2.0 * recall * precision / (recall + precision))
            } else {
                Some(0.0)
            }
        } else {
            None
        }
    }
}
