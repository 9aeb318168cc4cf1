//! Mapping diagnostics: shows, for every canonical column, the best raw
//! candidate, its similarity score, and whether it clears the threshold.

use anyhow::Result;
use log::info;

use crate::{
    cli::InspectArgs,
    detect::detect_data_type,
    io_utils,
    mapping::{mapping_from_matches, score_columns},
    merge::merge_array_columns,
    quality::calculate_quality_score,
    schema::get_schema,
    table,
};

pub fn execute(args: &InspectArgs) -> Result<()> {
    let source = &args.source;
    let encoding = io_utils::resolve_encoding(source.input_encoding.as_deref())?;
    let records =
        io_utils::read_records(&source.input, source.format, source.delimiter, encoding)?;
    let merged = merge_array_columns(&records);
    let raw_columns = merged
        .first()
        .map(|record| record.keys().cloned().collect::<Vec<_>>())
        .unwrap_or_default();

    let domain = detect_data_type(&args.label);
    let Some(schema) = get_schema(domain) else {
        println!(
            "Label '{}' matches no known domain; records would pass through unchanged.",
            args.label
        );
        return Ok(());
    };

    let matches = score_columns(&raw_columns, schema);
    let mapping = mapping_from_matches(&matches);
    let mut rows = Vec::with_capacity(matches.len());
    for (column, matched) in schema.columns.iter().zip(&matches) {
        let accepted = matched.is_accepted();
        rows.push(vec![
            matched.column.to_string(),
            column.column_type.to_string(),
            if column.required { "yes" } else { "" }.to_string(),
            matched.candidate.clone().unwrap_or_default(),
            format!("{:.3}", matched.score),
            if accepted { "yes" } else { "no" }.to_string(),
        ]);
    }

    println!("Domain: {domain} ({} raw column(s))", raw_columns.len());
    table::print_table(
        &["column", "type", "required", "candidate", "score", "accepted"],
        &rows,
    );
    let quality = calculate_quality_score(schema, &mapping);
    println!("Quality score: {quality:.3}");
    info!(
        "Inspected {} record(s) from {:?}: {} of {} column(s) accepted",
        records.len(),
        source.input,
        mapping.len(),
        schema.columns.len()
    );
    Ok(())
}
