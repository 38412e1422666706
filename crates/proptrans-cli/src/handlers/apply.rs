//! Apply command handler

use crate::cli::ApplyArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::{OutputFormatter, OutputWriter};
use proptrans_core::{Direction, Format, Record, Target, TransformerRegistry};
use serde_json::{Map, Value};
use std::fs;
use tracing::{debug, info, instrument};

use super::utils::{load_records, parse_context_data, RecordDocument};

/// Handle the apply command
#[instrument(skip(config, output), fields(
    file = %args.records.display(),
    format = %args.format,
    direction = %args.direction
))]
pub async fn handle_apply(args: ApplyArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details(
        "apply_command",
        &format!("format: {}, direction: {}", args.format, args.direction),
    );

    let format = Format::from(args.format.as_str());
    let direction = Direction::from(args.direction.as_str());
    let data = parse_context_data(args.data.as_deref())?;

    let registry = {
        let _timer = Timer::new("registry_build");
        config.build_registry()?
    };
    let document = load_records(&args.records)?;
    let single = matches!(document, RecordDocument::One(_));
    let records = document.into_records();

    output.info(&format!(
        "Applying transformers to {} record(s) from {}",
        records.len(),
        args.records.display()
    ))?;

    let mut transformed = Vec::with_capacity(records.len());
    for record in records {
        debug!(type_name = %record.type_ref, fields = record.fields.len(), "Transforming record");
        output.debug(&format!("{} ({} fields)", record.type_ref, record.fields.len()))?;
        transformed.push(apply_record(&registry, record, &format, &direction, data.as_ref()).await?);
    }
    info!(records = transformed.len(), "Records transformed");

    if let Some(path) = &args.output_file {
        let content = if single {
            output.format().format(&transformed[0])?
        } else {
            output.format().format(&transformed)?
        };
        fs::write(path, content)?;
        output.success(&format!("✓ Saved {} record(s) to {}", transformed.len(), path.display()))?;
    } else {
        output.records(&transformed)?;
    }

    Ok(())
}

/// Transform every field of `record`
///
/// Fields are transformed against the original record, so a transformer
/// sees the untransformed values of sibling fields.
pub async fn apply_record(
    registry: &TransformerRegistry,
    record: Record,
    format: &Format,
    direction: &Direction,
    data: Option<&Value>,
) -> Result<Record> {
    let type_ref = record.type_ref.clone();
    let fields = record.fields.clone();
    let target = Target::from(record);

    let mut transformed = Map::new();
    for (property, value) in fields {
        let value = registry
            .apply_transformer(value, &target, &property, format, direction, data)
            .await?;
        transformed.insert(property, value);
    }

    Ok(Record {
        type_ref,
        fields: transformed,
    })
}
