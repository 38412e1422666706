//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialized
//! human formatting for transformed records and resolution reports.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use proptrans_core::{Record, ResolutionReport, ResolutionSource};
use serde::Serialize;
use std::io::{self, Write};
use tracing::debug;

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format transformed records
    fn format_records(&self, records: &[Record]) -> Result<String>;

    /// Format a resolution report
    fn format_report(&self, report: &ResolutionReport) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // Pretty JSON doubles as the human format for arbitrary data
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_records(&self, records: &[Record]) -> Result<String> {
        match self {
            OutputFormat::Human => format_records_human(records),
            _ => self.format(&records),
        }
    }

    fn format_report(&self, report: &ResolutionReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_report_human(report)),
            _ => self.format(report),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self::with_writer(format, use_color, quiet, verbose, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            verbose,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write debug information if verbose mode is enabled
    pub fn debug(&mut self, message: &str) -> Result<()> {
        if self.verbose > 0 && self.format == OutputFormat::Human {
            if self.use_color {
                self.writeln(&format!("{} {}", "DEBUG:".dimmed(), message.dimmed()))
            } else {
                self.writeln(&format!("DEBUG: {}", message))
            }
        } else {
            Ok(())
        }
    }

    /// Write transformed records
    pub fn records(&mut self, records: &[Record]) -> Result<()> {
        let formatted = self.format.format_records(records)?;
        self.writeln(formatted.trim_end())
    }

    /// Write a resolution report
    pub fn report(&mut self, report: &ResolutionReport) -> Result<()> {
        let formatted = self.format.format_report(report)?;
        self.writeln(formatted.trim_end())
    }
}

/// Format records for human reading: one block per record
fn format_records_human(records: &[Record]) -> Result<String> {
    let mut output = String::new();

    for record in records {
        output.push_str(&format!("{}\n", record.type_ref));
        for (name, value) in &record.fields {
            output.push_str(&format!("  {}: {}\n", name, serde_json::to_string(value)?));
        }
    }

    Ok(output)
}

/// Format a resolution report for human reading
fn format_report_human(report: &ResolutionReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{}.{} ({} / {})\n",
        report.type_name,
        report.property,
        label_or_any(report.format.as_str()),
        label_or_any(report.direction.as_str())
    ));

    match &report.declared_type {
        Some(declared) => output.push_str(&format!("  Declared type: {}\n", declared)),
        None if report.source == ResolutionSource::Property => {}
        None => output.push_str("  Declared type: none\n"),
    }

    let source = match report.source {
        ResolutionSource::Property => "property slot",
        ResolutionSource::DeclaredType => "declared type",
        ResolutionSource::Wildcard => "any-type fallback",
        ResolutionSource::None => "nothing registered",
    };
    output.push_str(&format!("  Resolved from: {}\n", source));
    output.push_str(&format!(
        "  Transformer: {}\n",
        report.transformer.as_deref().unwrap_or("none (value passes through)")
    ));

    output
}

fn label_or_any(label: &str) -> &str {
    if label.is_empty() {
        "*"
    } else {
        label
    }
}
