/*!
# Writers module
Contains the logic for writing the output files for the eval command.
*/
/// Orders per-sequence results coming from parallel workers
pub mod eval_synchronizer;
/// Streams per-sequence results as JSON lines
pub mod sequence_results;
/// Generates the summary and ROC files
pub mod summary;
