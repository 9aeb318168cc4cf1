use anyhow::{Result, anyhow};
use log::info;

use crate::{
    cli::{BatchArgs, parse_dataset_spec},
    io_utils,
    normalize::{DatasetInput, normalize_multiple_datasets},
};

pub fn execute(args: &BatchArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let mut datasets = Vec::with_capacity(args.datasets.len());
    for spec in &args.datasets {
        let (label, path) = parse_dataset_spec(spec).map_err(|err| anyhow!(err))?;
        let records = io_utils::read_records(&path, None, None, encoding)?;
        info!("Loaded {} record(s) for '{label}' from {path:?}", records.len());
        datasets.push(DatasetInput::new(records, label));
    }

    let results = normalize_multiple_datasets(&datasets);
    io_utils::write_json(args.output.as_deref(), &results, args.pretty)?;
    info!("Normalized {} dataset(s)", results.len());
    Ok(())
}
