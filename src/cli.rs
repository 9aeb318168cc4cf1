use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Normalize retail datasets onto canonical schemas",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Normalize one JSON or CSV dataset and emit the result as JSON
    Normalize(NormalizeArgs),
    /// Normalize several labelled datasets in one run
    Batch(BatchArgs),
    /// Print the domain detected for each label
    Detect(DetectArgs),
    /// Show how the columns of a dataset would be mapped
    Inspect(InspectArgs),
    /// List or display the canonical schemas
    Schema(SchemaArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum InputFormat {
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum SchemaFormat {
    #[default]
    Table,
    Yaml,
    Json,
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input file (`-` reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Input format (inferred from the file extension when omitted)
    #[arg(long = "format", value_enum)]
    pub format: Option<InputFormat>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Free-text dataset label used to detect the domain (e.g. "매출", "inventory")
    #[arg(short = 'l', long = "label")]
    pub label: String,
    /// Output JSON file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Additional derived columns using `name=expression`
    #[arg(long = "derive", action = clap::ArgAction::Append)]
    pub derives: Vec<String>,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Repeatable `label=path` pairs; the format follows each file's extension
    #[arg(short = 'd', long = "dataset", action = clap::ArgAction::Append, required = true)]
    pub datasets: Vec<String>,
    /// Character encoding of every input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Output JSON file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct DetectArgs {
    /// One or more dataset labels
    #[arg(required = true)]
    pub labels: Vec<String>,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: InputArgs,
    /// Free-text dataset label used to detect the domain
    #[arg(short = 'l', long = "label")]
    pub label: String,
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub command: SchemaCommand,
}

#[derive(Debug, Subcommand)]
pub enum SchemaCommand {
    /// List every domain with its column counts and relations
    List,
    /// Show the columns of one domain
    Show(SchemaShowArgs),
}

#[derive(Debug, Args)]
pub struct SchemaShowArgs {
    /// Domain name: sales, zone, traffic, product, customer, or inventory
    pub domain: String,
    /// Output format
    #[arg(long, value_enum, default_value_t = SchemaFormat::Table)]
    pub format: SchemaFormat,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

/// Splits a `label=path` dataset argument.
pub fn parse_dataset_spec(value: &str) -> Result<(String, PathBuf), String> {
    let (label, path) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("Dataset '{value}' must look like label=path"))?;
    let label = label.trim();
    let path = path.trim();
    if label.is_empty() || path.is_empty() {
        return Err(format!("Dataset '{value}' must look like label=path"));
    }
    Ok((label.to_string(), PathBuf::from(path)))
}
