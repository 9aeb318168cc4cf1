//! Schema-driven normalization of heterogeneous retail datasets.
//!
//! Raw records arrive as ordered JSON objects together with a free-text
//! label. [`normalize::normalize_data`] detects the domain from the label,
//! maps raw column names onto that domain's canonical schema, converts each
//! value to its canonical type, derives a few fields, and reports a quality
//! score. The library performs no I/O; the `retail-normalize` binary wraps it
//! with JSON/CSV decoding.

pub mod batch;
pub mod cli;
pub mod convert;
pub mod derive;
pub mod detect;
pub mod error;
pub mod inspect;
pub mod io_utils;
pub mod keywords;
pub mod mapping;
pub mod merge;
pub mod normalize;
pub mod normalize_cmd;
pub mod quality;
pub mod record;
pub mod schema;
pub mod schema_cmd;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};

use crate::cli::{Cli, Commands, DetectArgs};

pub use crate::{
    error::NormalizeError,
    normalize::{
        DatasetInput, NormalizationMetadata, NormalizeOptions, NormalizedData, NormalizedDatasets,
        normalize_data, normalize_data_with_options, normalize_multiple_datasets,
    },
    record::{NormalizedRecord, RawRecord},
    schema::{ColumnType, DomainType},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("retail_normalize", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Normalize(args) => normalize_cmd::execute(&args),
        Commands::Batch(args) => batch::execute(&args),
        Commands::Detect(args) => handle_detect(&args),
        Commands::Inspect(args) => inspect::execute(&args),
        Commands::Schema(args) => schema_cmd::execute(&args),
    }
}

fn handle_detect(args: &DetectArgs) -> Result<()> {
    for label in &args.labels {
        let domain = detect::detect_data_type(label);
        println!("{label}\t{domain}");
    }
    info!("Detected domains for {} label(s)", args.labels.len());
    Ok(())
}
