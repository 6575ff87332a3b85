
/// Nucleotide encoding shared by the replay machinery
pub mod dna;
/// Serde models for the per-sequence variant input
pub mod eval_input;
/// A variant placed on a haplotype with a chosen allele
pub mod oriented_variant;
/// Contains tracker for misphasings and unphaseable calls
pub mod phasing_result;
/// ROC points, interpolation and the score-ordered container
pub mod roc;
/// Per-sequence outcomes for each baseline and called variant
pub mod sequence_result;
/// Contains tracker for TP, FP, FN and derived metrics
pub mod summary_metrics;
/// Contains variant definition functionality and checks
pub mod variants;
