//! Output formatting for build summaries
//!
//! Formats a [`BuildReport`] as JSON, YAML, or human-readable text. The human
//! format lists the generated docker image and the packages found in the output
//! directory.

use anyhow::{Context, Result};
use std::fmt::Write;

use crate::build::BuildReport;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Output formatter for build reports
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, report: &BuildReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize report to YAML")
            }
            OutputFormat::Human => Ok(self.format_human(report)),
        }
    }

    fn format_human(&self, report: &BuildReport) -> String {
        let mut out = String::new();

        if let Some(image) = &report.image {
            section(&mut out, " + Docker container generated:");
            match &image.listing {
                Some(listing) if !listing.is_empty() => {
                    let _ = writeln!(out, "{}", listing);
                }
                _ => {
                    let _ = writeln!(out, "{}", image.image.tag);
                }
            }
        }

        if !report.packages.is_empty() {
            section(&mut out, " + InfluxDB packages generated are available here:");
            for group in &report.packages {
                let _ = writeln!(out);
                let _ = writeln!(out, "{} package:", group.kind);
                for file in &group.files {
                    let _ = writeln!(out, "{}", file.display());
                }
            }
        }

        out
    }
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "-".repeat(title.len()));
}
