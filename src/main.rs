
use log::{LevelFilter, error, info};
use std::sync::Arc;
use std::time::Instant;

use haplosync::cli::core::{Commands, get_cli};
use haplosync::cli::eval::{EvalSettings, check_eval_settings};
use haplosync::data_types::eval_input::SequenceVariants;
use haplosync::evaluation::{EvaluationConfigBuilder, run_evaluation};
use haplosync::path_finder::PathFinderConfigBuilder;
use haplosync::templates::Templates;
use haplosync::util::json_io::{load_json, save_json};
use haplosync::util::progress_bar::sequence_progress_bar;
use haplosync::writers::sequence_results::SequenceResultWriter;

fn run_eval(settings: EvalSettings) {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    let filter_level: LevelFilter = match settings.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    let settings = match check_eval_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };

    // create the primary output folder
    info!("Creating output folder at {:?}...", settings.output_folder);
    match std::fs::create_dir_all(&settings.output_folder) {
        Ok(()) => {},
        Err(e) => {
            error!("Error while creating output folder: {e}");
            std::process::exit(exitcode::IOERR);
        }
    }

    // save the CLI options
    let cli_json = settings.output_folder.join("cli_settings.json");
    info!("Saving CLI options to {cli_json:?}...");
    if let Err(e) = save_json(&settings, &cli_json) {
        error!("Error while saving CLI options: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    // load the reference genome
    info!("Pre-loading reference genome into memory...");
    let templates = match Templates::from_fasta(&settings.reference_fn) {
        Ok(t) => Arc::new(t),
        Err(e) => {
            error!("{e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };
    info!("Loaded {} reference sequences.", templates.len());

    // load the variants
    info!("Loading variants from {:?}...", settings.input_fn);
    let inputs: Vec<SequenceVariants> = match load_json(&settings.input_fn) {
        Ok(i) => i,
        Err(e) => {
            error!("Error while loading variants: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };

    // build our configuration
    let path_finder_config = match PathFinderConfigBuilder::default()
        .baseline_orientor(settings.baseline_orientor)
        .called_orientor(settings.called_orientor)
        .path_preference(settings.path_preference)
        .max_paths(settings.max_paths)
        .max_iterations(settings.max_iterations)
        .too_complex(settings.too_complex)
        .build() {
        Ok(c) => c,
        Err(e) => {
            error!("Error while building path finder config: {e:?}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };
    let eval_config = match EvaluationConfigBuilder::default()
        .path_finder(path_finder_config)
        .threads(settings.threads)
        .build() {
        Ok(c) => c,
        Err(e) => {
            error!("Error while building evaluation config: {e:?}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };

    let results_fn = settings.output_folder.join("sequence_results.jsonl.gz");
    info!("Opening per-sequence results at {results_fn:?}...");
    let results_writer = match SequenceResultWriter::new(&results_fn) {
        Ok(w) => w,
        Err(e) => {
            error!("Error while opening results writer: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };

    // run everything
    let (_results_writer, summary_writer) = match run_evaluation(
        templates, inputs, results_writer, eval_config, Some(sequence_progress_bar())
    ) {
        Ok(r) => r,
        Err(e) => {
            error!("Error while evaluating sequences: {e:#}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };

    let summary = summary_writer.summary();
    info!("Sequences evaluated: {}", summary.sequences);
    info!("Totals: {:?}", summary.metrics);
    info!("\tRecall: {:?}", summary.recall);
    info!("\tPrecision: {:?}", summary.precision);
    info!("\tF1: {:?}", summary.f1);
    info!("Phasing: {:?}", summary.phasing);
    info!("Unscored calls: {}", summary.unscored_calls);

    // now write things
    let summary_json = settings.output_folder.join("summary.json");
    info!("Saving run summary to {summary_json:?}...");
    if let Err(e) = save_json(&summary, &summary_json) {
        error!("Error while saving run summary: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    let summary_fn = settings.output_folder.join("summary.tsv");
    info!("Saving output summary to {summary_fn:?}...");
    if let Err(e) = summary_writer.write_summary(&summary_fn) {
        error!("Error while saving summary file: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    let roc_fn = settings.output_folder.join("roc.tsv");
    info!("Saving ROC curve to {roc_fn:?}...");
    if let Err(e) = summary_writer.write_roc(&roc_fn) {
        error!("Error while saving ROC file: {e:#}");
        std::process::exit(exitcode::IOERR);
    }

    info!("Evaluation completed in {} seconds.", start_time.elapsed().as_secs_f64());
}

fn main() {
    let cli = get_cli();
    match cli.command {
        Commands::Eval(settings) => {
            run_eval(*settings);
        }
    }

    info!("Process finished successfully.");
}
