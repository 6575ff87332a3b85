
use anyhow::bail;
use clap::Args;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_output_folder, check_required_filename, AFTER_HELP, FULL_VERSION};
use crate::orientor::Orientor;
use crate::path_finder::{PathPreference, TooComplexPolicy};

#[derive(Args, Clone, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct EvalSettings {
    #[clap(default_value = "")]
    #[clap(hide = true)]
    haplosync_version: String,

    /// Reference FASTA file
    #[clap(required = true)]
    #[clap(short = 'r')]
    #[clap(long = "reference")]
    #[clap(value_name = "FASTA")]
    #[clap(help_heading = Some("Input/Output"))]
    pub reference_fn: PathBuf,

    /// Baseline and called variants per sequence (JSON, optionally gzipped)
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_fn: PathBuf,

    /// Output directory containing per-sequence results and summaries
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-dir")]
    #[clap(value_name = "DIR")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_folder: PathBuf,

    /// Orientation strategy for the baseline variants
    #[clap(long = "baseline-orientor")]
    #[clap(value_name = "ORIENTOR")]
    #[clap(help_heading = Some("Evaluation parameters"))]
    #[clap(default_value = "unphased")]
    pub baseline_orientor: Orientor,

    /// Orientation strategy for the called variants
    #[clap(long = "called-orientor")]
    #[clap(value_name = "ORIENTOR")]
    #[clap(help_heading = Some("Evaluation parameters"))]
    #[clap(default_value = "unphased")]
    pub called_orientor: Orientor,

    /// Criteria for choosing between equivalent paths
    #[clap(long = "path-preference")]
    #[clap(value_name = "PREF")]
    #[clap(help_heading = Some("Evaluation parameters"))]
    #[clap(default_value = "sum")]
    pub path_preference: PathPreference,

    /// Maximum number of unresolved paths before a region is too complex
    #[clap(long = "max-paths")]
    #[clap(value_name = "INT")]
    #[clap(help_heading = Some("Evaluation parameters"))]
    #[clap(default_value = "5000")]
    pub max_paths: usize,

    /// Maximum number of search iterations since the last sync point before a region is too complex
    #[clap(long = "max-iterations")]
    #[clap(value_name = "INT")]
    #[clap(help_heading = Some("Evaluation parameters"))]
    #[clap(default_value = "10000000")]
    pub max_iterations: usize,

    /// Behavior when a region is too complex
    #[clap(long = "too-complex")]
    #[clap(value_name = "POLICY")]
    #[clap(help_heading = Some("Evaluation parameters"))]
    #[clap(default_value = "fail")]
    pub too_complex: TooComplexPolicy,

    /// Number of sequences to evaluate in parallel
    #[clap(long = "threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    pub threads: usize,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8
}

pub fn check_eval_settings(mut settings: EvalSettings) -> anyhow::Result<EvalSettings> {
    // hard code the version in
    settings.haplosync_version = FULL_VERSION.clone();
    info!("Haplosync version: {:?}", &settings.haplosync_version);
    info!("Sub-command: eval");
    info!("Inputs:");

    // check for all the required input files
    check_required_filename(&settings.reference_fn, "Reference FASTA")?;
    check_required_filename(&settings.input_fn, "Variant input")?;
    info!("\tReference: {:?}", &settings.reference_fn);
    info!("\tVariants: {:?}", &settings.input_fn);

    info!("Outputs:");
    check_output_folder(&settings.output_folder, "Output folder")?;
    info!("\tOutput folder: {:?}", &settings.output_folder);

    info!("Evaluation parameters:");
    info!("\tBaseline orientor: {}", settings.baseline_orientor);
    info!("\tCalled orientor: {}", settings.called_orientor);
    info!("\tPath preference: {}", settings.path_preference);
    if settings.max_paths == 0 {
        bail!("--max-paths must be >0");
    }
    info!("\tMaximum paths: {}", settings.max_paths);
    if settings.max_iterations == 0 {
        bail!("--max-iterations must be >0");
    }
    info!("\tMaximum iterations: {}", settings.max_iterations);
    info!("\tToo complex policy: {}", settings.too_complex);

    if settings.threads == 0 {
        settings.threads = 1;
    }
    info!("Processing threads: {}", settings.threads);

    Ok(settings)
}
