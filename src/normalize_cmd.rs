use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::NormalizeArgs,
    derive::parse_derived_columns,
    io_utils,
    normalize::{NormalizeOptions, normalize_data_with_options},
};

pub fn execute(args: &NormalizeArgs) -> Result<()> {
    let source = &args.source;
    let encoding = io_utils::resolve_encoding(source.input_encoding.as_deref())?;
    let derived_columns = parse_derived_columns(&args.derives)?;
    info!(
        "Normalizing {:?} as '{}' with {} extra derived column(s)",
        source.input,
        args.label,
        derived_columns.len()
    );

    let records =
        io_utils::read_records(&source.input, source.format, source.delimiter, encoding)?;
    let options = NormalizeOptions { derived_columns };
    let result = normalize_data_with_options(&records, &args.label, &options);

    io_utils::write_json(args.output.as_deref(), &result, args.pretty)
        .with_context(|| "Writing normalized output".to_string())?;
    info!(
        "Wrote {} '{}' record(s) with quality {:.2}",
        result.metadata.total_records, result.schema_type, result.metadata.quality_score
    );
    Ok(())
}
