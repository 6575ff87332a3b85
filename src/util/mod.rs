
/// Helper functions for read/writing JSON via serde
pub mod json_io;
/// Immutable shared-tail list used for path histories
pub mod persistent_list;
/// Helper functions for generating the progress bars
pub mod progress_bar;
/// Fixed-size pool for fallible tasks with first-error-wins semantics
pub mod worker_pool;
