/*!
# Evaluation runs
Wires everything together for a multi-sequence run: each sequence is evaluated on the worker pool and results are written in input order through the synchronizer.
*/

use anyhow::{anyhow, ensure, Context};
use derive_builder::Builder;
use indicatif::ProgressBar;
use log::{debug, info, warn};
use rustc_hash::FxHashSet;
use std::sync::Arc;

use crate::data_types::eval_input::SequenceVariants;
use crate::data_types::sequence_result::SequenceResult;
use crate::path_finder::PathFinderConfig;
use crate::sequence_evaluator::SequenceEvaluator;
use crate::templates::Templates;
use crate::util::worker_pool::WorkerPool;
use crate::writers::eval_synchronizer::{EvalSynchronizer, ResultSink, SynchronizerError};
use crate::writers::summary::SummaryWriter;

/// Controls a full evaluation run
#[derive(Builder, Clone, Copy, Debug)]
#[builder(default)]
pub struct EvaluationConfig {
    /// Search settings shared by every sequence
    path_finder: PathFinderConfig,
    /// Number of sequences evaluated at once
    threads: usize
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        // these settings are set to reasonable defaults for unit tests
        // main.rs will set each of them manually based on user input
        Self {
            path_finder: PathFinderConfig::default(),
            threads: 1
        }
    }
}

impl EvaluationConfig {
    // getters
    pub fn path_finder(&self) -> PathFinderConfig {
        self.path_finder
    }

    pub fn threads(&self) -> usize {
        self.threads
    }
}

/// Evaluates a single sequence, converting the input records first
/// # Arguments
/// * `templates` - the reference sequences
/// * `input` - the variants for this sequence
/// * `evaluator` - the configured evaluator
/// # Errors
/// * if the sequence is missing from the templates
/// * if the input records are invalid
/// * if the evaluation fails
pub fn evaluate_sequence(templates: &Templates, input: &SequenceVariants, evaluator: SequenceEvaluator) -> anyhow::Result<SequenceResult> {
    let template = templates.encoded(&input.name)
        .ok_or_else(|| anyhow!("Sequence {} is not contained in the reference.", input.name))?;
    let baseline = input.baseline_variants()?;
    let called = input.called_variants()?;
    let result = evaluator.evaluate(&input.name, &template, &baseline, &called)?;
    Ok(result)
}

/// Runs an evaluation over many sequences.
/// Sequences missing from the reference are skipped with a warning.
/// Results reach the sink in input order regardless of which finishes first.
/// # Arguments
/// * `templates` - the reference sequences
/// * `inputs` - baseline and called variants per sequence
/// * `sink` - destination for per-sequence results
/// * `config` - run configuration
/// * `progress` - optional progress bar over written sequences
/// # Errors
/// * if a sequence name appears more than once
/// * the first error hit by any sequence, or by the sink
pub fn run_evaluation<S: ResultSink + 'static>(
    templates: Arc<Templates>, inputs: Vec<SequenceVariants>, sink: S, config: EvaluationConfig, progress: Option<ProgressBar>
) -> anyhow::Result<(S, SummaryWriter)> {
    let mut seen: FxHashSet<&str> = Default::default();
    for input in inputs.iter() {
        ensure!(seen.insert(input.name.as_str()), "Sequence {} appears more than once in the input", input.name);
    }

    let (inputs, missing): (Vec<SequenceVariants>, Vec<SequenceVariants>) = inputs.into_iter()
        .partition(|input| templates.contains(&input.name));
    for input in missing.iter() {
        warn!(
            "Sequence {} is not contained in the reference, skipping {} baseline and {} called variants",
            input.name, input.baseline.len(), input.called.len()
        );
    }

    info!("Evaluating {} sequences with {} threads...", inputs.len(), config.threads());
    if let Some(pb) = progress.as_ref() {
        pb.set_length(inputs.len() as u64);
    }
    let names: Vec<String> = inputs.iter().map(|i| i.name.clone()).collect();
    let synchronizer = Arc::new(EvalSynchronizer::new(names, sink, progress));
    let evaluator = SequenceEvaluator::new(config.path_finder());
    let pool = WorkerPool::new(config.threads())?;

    for (index, input) in inputs.into_iter().enumerate() {
        let templates = templates.clone();
        let synchronizer = synchronizer.clone();
        pool.execute(input.name.clone(), move || {
            match evaluate_sequence(&templates, &input, evaluator) {
                Ok(result) => match synchronizer.write(index, result) {
                    Err(e) if matches!(e.downcast_ref::<SynchronizerError>(), Some(SynchronizerError::Interrupted { .. })) => {
                        // the failure that interrupted us is reported by its own task
                        debug!("{e}");
                        Ok(())
                    },
                    other => other
                },
                Err(e) => {
                    synchronizer.cancel();
                    Err(e)
                }
            }
        });
    }
    pool.terminate()?;

    let synchronizer = Arc::into_inner(synchronizer)
        .ok_or_else(|| anyhow!("Result writer is still in use after all sequences finished"))?;
    synchronizer.finish()
        .with_context(|| "Error while finishing the result output:")
}
