
use anyhow::bail;
use clap::{Parser, Subcommand};
use chrono::Datelike;
use lazy_static::lazy_static;
use std::path::Path;

use crate::cli::eval::EvalSettings;

lazy_static! {
    /// Full version string, combining the package version with the git description from build.rs
    /// # Examples
    /// * `0.1.0-3f2c1aa-dirty` - while on a dirty branch
    /// * `0.1.0-3f2c1aa` - with a fresh commit
    /// * `0.1.0-unknown` - when built without git metadata
    pub static ref FULL_VERSION: String = format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("VERGEN_GIT_DESCRIBE"));

    /// Shared after help string containing the legalese.
    pub static ref AFTER_HELP: String = format!("Copyright (C) 2024-{}     Pacific Biosciences of California, Inc.
This program comes with ABSOLUTELY NO WARRANTY; it is intended for
Research Use Only and not for use in diagnostic procedures.", chrono::Utc::now().year());
}

/// Top-level parser for the haplosync binary
#[derive(Parser)]
#[clap(author,
    version = &**FULL_VERSION,
    about,
    after_help = &**AFTER_HELP)]
#[command(name = "haplosync", propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

/// Haplosync, haplotype-aware reconciliation of baseline and called variants.
/// Select a subcommand to see more usage information:
#[derive(Subcommand)]
pub enum Commands {
    /// Evaluates called variants against baseline variants, one sequence at a time
    Eval(Box<EvalSettings>)
}

pub fn get_cli() -> Cli {
    Cli::parse()
}

/// Checks that an input file exists
/// # Arguments
/// * `filename` - the file path to check for
/// * `label` - the label to use for error messages
/// # Errors
/// * if the path does not exist
pub fn check_required_filename(filename: &Path, label: &str) -> anyhow::Result<()> {
    if !filename.exists() {
        bail!("{} does not exist: \"{}\"", label, filename.display());
    }
    Ok(())
}

/// Checks that an output folder either does not exist yet or is a directory
/// # Arguments
/// * `folder` - the folder to check
/// * `label` - the label to use for error messages
/// # Errors
/// * if the path exists but is not a directory
pub fn check_output_folder(folder: &Path, label: &str) -> anyhow::Result<()> {
    if folder.exists() && !folder.is_dir() {
        bail!("{} exists but is not a directory: \"{}\"", label, folder.display());
    }
    Ok(())
}
