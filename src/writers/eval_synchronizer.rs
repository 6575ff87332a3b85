/*!
# Ordered result writing
Sequences are evaluated in parallel but their results must be written in reference order.
Each worker hands its result to the `EvalSynchronizer`, which blocks the worker until every earlier sequence has been written.
Results are then applied, in order, to a `ResultSink` and to the running summary.
*/

use indicatif::ProgressBar;
use log::debug;
use std::sync::{Condvar, Mutex, MutexGuard};

use crate::data_types::sequence_result::SequenceResult;
use crate::writers::summary::SummaryWriter;

#[derive(thiserror::Error, Debug)]
pub enum SynchronizerError {
    #[error("writing of sequence {sequence} was interrupted by an earlier failure")]
    Interrupted { sequence: String },
    #[error("sequence index {index} is out of range, only {count} sequences are expected")]
    OutOfRange { index: usize, count: usize }
}

/// Destination for per-sequence results, called in sequence order
pub trait ResultSink: Send {
    /// Writes the result for one sequence
    /// # Errors
    /// * if the underlying output fails
    fn write_result(&mut self, result: &SequenceResult) -> anyhow::Result<()>;

    /// Flushes anything buffered, called once after the last result
    /// # Errors
    /// * if the underlying output fails
    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Keeps every result in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    results: Vec<SequenceResult>
}

impl CollectingSink {
    pub fn into_results(self) -> Vec<SequenceResult> {
        self.results
    }
}

impl ResultSink for CollectingSink {
    fn write_result(&mut self, result: &SequenceResult) -> anyhow::Result<()> {
        self.results.push(result.clone());
        Ok(())
    }
}

/// State shared under the lock
struct SyncState<S: ResultSink> {
    /// Index of the next sequence allowed to write
    next_index: usize,
    /// True once any worker has failed
    cancelled: bool,
    /// Where results go
    sink: S,
    /// Running totals
    summary: SummaryWriter
}

/// Serializes result writing into sequence order
pub struct EvalSynchronizer<S: ResultSink> {
    /// Sequence names in the order they must be written
    names: Vec<String>,
    state: Mutex<SyncState<S>>,
    /// Signalled whenever `next_index` advances or the run is cancelled
    turn: Condvar,
    /// Optional progress tracking over written sequences
    progress: Option<ProgressBar>
}

impl<S: ResultSink> EvalSynchronizer<S> {
    /// Constructor
    /// # Arguments
    /// * `names` - the sequences to be written, in output order
    /// * `sink` - the destination for results
    /// * `progress` - optional progress bar, incremented once per written sequence
    pub fn new(names: Vec<String>, sink: S, progress: Option<ProgressBar>) -> Self {
        Self {
            names,
            state: Mutex::new(SyncState {
                next_index: 0,
                cancelled: false,
                sink,
                summary: SummaryWriter::default()
            }),
            turn: Condvar::new(),
            progress
        }
    }

    fn sequence_name(&self, index: usize) -> Result<&str, SynchronizerError> {
        self.names.get(index)
            .map(|n| n.as_str())
            .ok_or(SynchronizerError::OutOfRange { index, count: self.names.len() })
    }

    fn lock(&self, index: usize) -> Result<MutexGuard<'_, SyncState<S>>, SynchronizerError> {
        let sequence = self.sequence_name(index)?.to_string();
        self.state.lock().map_err(|_| SynchronizerError::Interrupted { sequence })
    }

    /// Blocks until `index` is the next sequence to write, then writes its result.
    /// # Arguments
    /// * `index` - position of the sequence in the output order
    /// * `result` - the evaluated sequence
    /// # Errors
    /// * `SynchronizerError::OutOfRange` if the index is not an expected sequence
    /// * `SynchronizerError::Interrupted` if the run was cancelled while waiting, or the lock was poisoned
    /// * if the sink fails, in which case the run is cancelled
    pub fn write(&self, index: usize, result: SequenceResult) -> anyhow::Result<()> {
        let sequence = self.sequence_name(index)?.to_string();
        let guard = self.lock(index)?;
        let mut state = self.turn
            .wait_while(guard, |s| s.next_index != index && !s.cancelled)
            .map_err(|_| SynchronizerError::Interrupted { sequence: sequence.clone() })?;
        if state.cancelled {
            return Err(SynchronizerError::Interrupted { sequence }.into());
        }

        debug!("Writing results for {sequence}");
        if let Err(e) = state.sink.write_result(&result) {
            state.cancelled = true;
            self.turn.notify_all();
            return Err(e.context(format!("Error while writing results for {sequence}:")));
        }
        state.summary.add_sequence_result(&result);
        state.next_index += 1;
        self.turn.notify_all();
        if let Some(pb) = self.progress.as_ref() {
            pb.inc(1);
        }
        Ok(())
    }

    /// Marks the run as failed, waking every blocked writer
    pub fn cancel(&self) {
        match self.state.lock() {
            Ok(mut state) => state.cancelled = true,
            Err(poisoned) => poisoned.into_inner().cancelled = true
        }
        self.turn.notify_all();
    }

    /// Index of the next sequence to be written
    pub fn next_index(&self) -> usize {
        match self.state.lock() {
            Ok(state) => state.next_index,
            Err(poisoned) => poisoned.into_inner().next_index
        }
    }

    /// Finishes the sink and returns it along with the accumulated summary
    /// # Errors
    /// * if the lock was poisoned
    /// * if the sink fails to finish
    pub fn finish(self) -> anyhow::Result<(S, SummaryWriter)> {
        if let Some(pb) = self.progress.as_ref() {
            pb.finish_with_message("Evaluation complete.");
        }
        let mut state = self.state.into_inner()
            .map_err(|_| SynchronizerError::Interrupted { sequence: "final".to_string() })?;
        state.sink.finish()?;
        Ok((state.sink, state.summary))
    }
}
