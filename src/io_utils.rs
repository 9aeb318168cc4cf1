//! I/O utilities: decoding JSON and CSV inputs into records and writing JSON
//! results.
//!
//! The normalization engine itself never touches files; everything the CLI
//! reads or writes flows through this module.
//!
//! - **Format resolution**: `.csv`/`.tsv` extensions select CSV, anything else
//!   JSON, with a manual override.
//! - **Encoding**: inputs are decoded with `encoding_rs`, defaulting to UTF-8.
//! - **stdin/stdout**: the `-` path convention routes through standard streams.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};
use encoding_rs_io::DecodeReaderBytesBuilder;
use serde::Serialize;
use serde_json::Value;

use crate::{
    cli::InputFormat,
    record::{RawRecord, records_from_json},
};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

pub fn resolve_input_format(path: &Path, provided: Option<InputFormat>) -> InputFormat {
    provided.unwrap_or_else(|| {
        if has_extension(path, "csv") || has_extension(path, "tsv") {
            InputFormat::Csv
        } else {
            InputFormat::Json
        }
    })
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| {
        if has_extension(path, "tsv") {
            DEFAULT_TSV_DELIMITER
        } else {
            DEFAULT_CSV_DELIMITER
        }
    })
}

pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    Ok(reader)
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false);
    builder.from_reader(reader)
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

pub fn reader_headers<R>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Vec<String>>
where
    R: Read,
{
    let headers = reader.byte_headers()?.clone();
    decode_record(&headers, encoding)
}

/// Reads a JSON array of objects, or a single object, into records.
pub fn read_json_records<R>(reader: R, encoding: &'static Encoding) -> Result<Vec<RawRecord>>
where
    R: Read,
{
    let decoded = DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding))
        .build(reader);
    let document: Value = serde_json::from_reader(decoded).context("Parsing JSON input")?;
    Ok(records_from_json(document)?)
}

/// Reads a headed CSV stream into records. Every cell becomes a JSON string.
pub fn read_csv_records<R>(
    reader: R,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Vec<RawRecord>>
where
    R: Read,
{
    let mut csv_reader = open_csv_reader(reader, delimiter);
    let headers = reader_headers(&mut csv_reader, encoding)?;
    let mut records = Vec::new();
    for (row_idx, result) in csv_reader.byte_records().enumerate() {
        let record = result.with_context(|| format!("Reading CSV row {}", row_idx + 2))?;
        let decoded = decode_record(&record, encoding)
            .with_context(|| format!("Decoding CSV row {}", row_idx + 2))?;
        records.push(
            headers
                .iter()
                .cloned()
                .zip(decoded.into_iter().map(Value::String))
                .collect::<RawRecord>(),
        );
    }
    Ok(records)
}

pub fn read_records(
    path: &Path,
    format: Option<InputFormat>,
    delimiter: Option<u8>,
    encoding: &'static Encoding,
) -> Result<Vec<RawRecord>> {
    let reader = open_input(path)?;
    let records = match resolve_input_format(path, format) {
        InputFormat::Json => read_json_records(reader, encoding),
        InputFormat::Csv => {
            read_csv_records(reader, resolve_input_delimiter(path, delimiter), encoding)
        }
    };
    records.with_context(|| format!("Reading records from {path:?}"))
}

pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(io::stdout()),
    };
    Ok(writer)
}

pub fn write_json<T>(path: Option<&Path>, value: &T, pretty: bool) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let mut writer = open_output(path)?;
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writeln!(writer)?;
    writer.flush().context("Flushing JSON output")?;
    Ok(())
}
