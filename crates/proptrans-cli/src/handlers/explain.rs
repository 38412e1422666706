//! Explain command handler

use crate::cli::ExplainArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use proptrans_core::{Direction, Format, Target, TypeRef};
use tracing::instrument;

/// Handle the explain command
#[instrument(skip(config, output))]
pub fn handle_explain(args: ExplainArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let registry = config.build_registry()?;
    let type_ref = TypeRef::named(&args.type_name);

    match config.schema.properties(&type_ref) {
        None => output.warning(&format!(
            "Type '{}' is not declared in the schema",
            args.type_name
        ))?,
        Some(properties) if !properties.contains_key(&args.property) => output.warning(
            &format!("Property '{}.{}' is not declared", args.type_name, args.property),
        )?,
        Some(_) => {}
    }

    let report = registry.explain(
        &Target::from(type_ref),
        &args.property,
        &Format::from(args.format.as_str()),
        &Direction::from(args.direction.as_str()),
    );
    output.report(&report)
}
