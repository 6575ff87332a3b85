use serde::Serialize;
use std::fs::File;
use std::path::Path;

use crate::data_types::phasing_result::PhasingResult;
use crate::data_types::roc::{f_measure, RocContainer, RocPoint};
use crate::data_types::sequence_result::SequenceResult;
use crate::data_types::summary_metrics::SummaryMetrics;

/// Threshold label for the row that applies no score filter
pub const NO_THRESHOLD: &str = "None";

/// Totals for a full run, as saved to the summary JSON
#[derive(Clone, Debug, Serialize)]
pub struct EvaluationSummary {
    /// Number of sequences that were evaluated
    pub sequences: u64,
    /// Unweighted counts
    pub metrics: SummaryMetrics,
    /// Recall = baseline.TP / (baseline.TP + baseline.FN)
    pub recall: Option<f64>,
    /// Precision = called.TP / (called.TP + called.FP)
    pub precision: Option<f64>,
    /// F1 = combination score of recall and precision
    pub f1: Option<f64>,
    /// Phasing counts for the called variants
    pub phasing: PhasingResult,
    /// Calls that could not be placed on the ROC curve
    pub unscored_calls: u64,
    /// The cumulative ROC curve, strictest threshold first
    pub roc: Vec<RocPoint<f64>>
}

/// Accumulates per-sequence results into run totals
#[derive(Clone, Debug, Default)]
pub struct SummaryWriter {
    /// Number of sequences added
    sequences: u64,
    /// Running unweighted counts
    metrics: SummaryMetrics,
    /// Running phasing counts
    phasing: PhasingResult,
    /// Running ROC tallies
    roc: RocContainer
}

/// Contains all the data written to each row of our stats file
#[derive(Serialize)]
struct SummaryRow {
    /// Score threshold, or "None"
    threshold: String,
    /// Weighted true positives, in baseline units
    true_positives: f64,
    /// False positive calls
    false_positives: f64,
    /// Baseline variants not explained at this threshold
    false_negatives: f64,
    /// Precision = TP / (TP + FP)
    precision: Option<f64>,
    /// Sensitivity = TP / (TP + FN)
    sensitivity: Option<f64>,
    /// Harmonic mean of precision and sensitivity
    f_measure: Option<f64>
}

impl SummaryRow {
    /// Creates a new row from a threshold label and cumulative counts
    fn new(threshold: String, true_positives: f64, false_positives: f64, total_baseline: f64) -> Self {
        let point: RocPoint<f64> = RocPoint::new(None, true_positives, false_positives, 0.0);
        let precision = point.precision();
        let sensitivity = point.recall(total_baseline);
        let f = match (precision, sensitivity) {
            (Some(p), Some(s)) => Some(f_measure(p, s)),
            _ => None
        };
        Self {
            threshold,
            true_positives,
            false_positives,
            false_negatives: total_baseline - true_positives,
            precision, sensitivity, f_measure: f
        }
    }
}

impl SummaryWriter {
    /// Adds the results for one sequence
    /// # Arguments
    /// * `result` - the outcomes for the sequence
    pub fn add_sequence_result(&mut self, result: &SequenceResult) {
        self.sequences += 1;
        self.metrics += result.summary_metrics();
        self.phasing += result.phasing;
        result.add_to_roc(&mut self.roc);
    }

    /// Builds the run summary from everything added so far
    pub fn summary(&self) -> EvaluationSummary {
        EvaluationSummary {
            sequences: self.sequences,
            metrics: self.metrics,
            recall: self.metrics.recall(),
            precision: self.metrics.precision(),
            f1: self.metrics.f1(),
            phasing: self.phasing,
            unscored_calls: self.roc.unscored(),
            roc: self.roc.curve()
        }
    }

    /// Writes the threshold summary table: the threshold that maximizes F-measure (when there is score data), then the unfiltered totals.
    /// # Arguments
    /// * `filename` - the filename for the output (tsv/csv)
    pub fn write_summary(&self, filename: &Path) -> csv::Result<()> {
        let mut csv_writer = table_writer(filename)?;
        let total_baseline = (self.metrics.baseline_tp + self.metrics.baseline_fn) as f64;
        if let Some(best) = self.roc.best_f_measure(self.metrics.baseline_tp + self.metrics.baseline_fn) {
            let threshold = best.threshold.map_or_else(|| NO_THRESHOLD.to_string(), |t| format!("{t:.3}"));
            csv_writer.serialize(SummaryRow::new(threshold, best.true_positives, best.false_positives, total_baseline))?;
        }
        csv_writer.serialize(SummaryRow::new(
            NO_THRESHOLD.to_string(), self.metrics.baseline_tp as f64, self.metrics.called_fp as f64, total_baseline
        ))?;
        csv_writer.flush()?;
        Ok(())
    }

    /// Writes the cumulative ROC curve, one row per distinct score
    /// # Arguments
    /// * `filename` - the filename for the output (tsv/csv)
    pub fn write_roc(&self, filename: &Path) -> csv::Result<()> {
        let mut csv_writer = table_writer(filename)?;
        let total_baseline = (self.metrics.baseline_tp + self.metrics.baseline_fn) as f64;
        for point in self.roc.curve() {
            let threshold = point.threshold.map_or_else(|| NO_THRESHOLD.to_string(), |t| format!("{t:.3}"));
            csv_writer.serialize(SummaryRow::new(threshold, point.true_positives, point.false_positives, total_baseline))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    // getters
    pub fn metrics(&self) -> SummaryMetrics {
        self.metrics
    }

    pub fn phasing(&self) -> PhasingResult {
        self.phasing
    }

    pub fn roc(&self) -> &RocContainer {
        &self.roc
    }
}

/// Opens a table writer, using "," if the file ends with .csv and tabs otherwise
fn table_writer(filename: &Path) -> csv::Result<csv::Writer<File>> {
    let is_csv: bool = filename.extension().unwrap_or_default() == "csv";
    let delimiter: u8 = if is_csv { b',' } else { b'\t' };
    csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(filename)
}
