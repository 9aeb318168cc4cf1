use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;

use crate::{
    cli::{SchemaArgs, SchemaCommand, SchemaFormat, SchemaShowArgs},
    schema::{DataSchema, DomainType, all_schemas, get_schema},
    table,
};

pub fn execute(args: &SchemaArgs) -> Result<()> {
    match &args.command {
        SchemaCommand::List => list(),
        SchemaCommand::Show(show_args) => show(show_args),
    }
}

fn list() -> Result<()> {
    let rows = all_schemas()
        .iter()
        .map(|schema| {
            vec![
                schema.domain.to_string(),
                schema.columns.len().to_string(),
                schema.required_columns().map(|c| c.name).join(", "),
                schema.relations.iter().join(", "),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&["domain", "columns", "required", "relations"], &rows);
    info!("Listed {} schema(s)", rows.len());
    Ok(())
}

fn show(args: &SchemaShowArgs) -> Result<()> {
    let domain = args.domain.parse::<DomainType>()?;
    let schema = get_schema(domain)
        .with_context(|| format!("No canonical schema is registered for '{domain}'"))?;
    print!("{}", render_schema(schema, args.format)?);
    Ok(())
}

pub fn render_schema(schema: &DataSchema, format: SchemaFormat) -> Result<String> {
    let rendered = match format {
        SchemaFormat::Table => {
            let rows = schema
                .columns
                .iter()
                .map(|column| {
                    vec![
                        column.name.to_string(),
                        column.column_type.to_string(),
                        if column.required { "yes" } else { "" }.to_string(),
                        column.description.to_string(),
                        column.examples.join(", "),
                    ]
                })
                .collect::<Vec<_>>();
            table::render_table(
                &["column", "type", "required", "description", "examples"],
                &rows,
            )
        }
        SchemaFormat::Yaml => serde_yaml::to_string(schema).context("Serializing schema as YAML")?,
        SchemaFormat::Json => {
            let mut text =
                serde_json::to_string_pretty(schema).context("Serializing schema as JSON")?;
            text.push('\n');
            text
        }
    };
    Ok(rendered)
}
