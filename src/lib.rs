
/// Command line interface functionality
pub mod cli;
/// Contains various shared data types
pub mod data_types;
/// Runs a full multi-sequence evaluation
pub mod evaluation;
/// Expands variants into the haplotype placements a search may try
pub mod orientor;
/// Search state for one candidate reconciliation
pub mod path;
/// Best-first search for the reconciliation that explains the most variants
pub mod path_finder;
/// Counts misphasings along a chosen path
pub mod phasing;
/// Replays variants against a template to produce haplotype sequences
pub mod replay;
/// Evaluates a single sequence and classifies each variant
pub mod sequence_evaluator;
/// Named reference sequences
pub mod templates;
/// Various utility functions that tend to be very generic
pub mod util;
/// All output writers
pub mod writers;

#[cfg(test)]
mod test_helpers;
