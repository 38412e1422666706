//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
    }
}

/// Handle config init subcommand
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    if args.path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {} (use --force to overwrite)",
            args.path.display()
        ))?;
        return Ok(());
    }

    let sample = Config::sample();
    sample.build_registry()?;
    sample.save(&args.path)?;

    output.success(&format!("✓ Created config at {}", args.path.display()))?;
    output.info("Edit it to declare your types and pick transformers.")?;
    Ok(())
}

/// Handle config show subcommand
fn handle_config_show(
    args: ConfigShowArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let content = match args.format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|e| Error::config(format!("Failed to serialize as JSON: {}", e)))?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)
            .map_err(|e| Error::config(format!("Failed to serialize as YAML: {}", e)))?,
    };

    output.writeln(content.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use tempfile::TempDir;

    fn quiet_output() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Human, false, true, 0, Box::new(std::io::sink()))
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("proptrans.json");

        handle_config_init(
            ConfigInitArgs {
                path: path.clone(),
                force: false,
            },
            &mut quiet_output(),
        )
        .unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.types, Config::sample().types);
        assert!(loaded.build_registry().is_ok());
    }

    #[test]
    fn test_init_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("proptrans.yaml");
        std::fs::write(&path, "formats: {}\n").unwrap();

        handle_config_init(
            ConfigInitArgs {
                path: path.clone(),
                force: false,
            },
            &mut quiet_output(),
        )
        .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "formats: {}\n");

        handle_config_init(ConfigInitArgs { path: path.clone(), force: true }, &mut quiet_output())
            .unwrap();
        assert!(!Config::from_file(&path).unwrap().types.is_empty());
    }
}
