use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use gen_fields_build::{GETTER_PREFIX, OutputStatus, PackageOutcome};
use serde::Serialize;

use crate::theme::{ICONS, THEME};

/// Output format options for the run summary
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Human readable status lines (default)
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

/// Global CLI options that affect output
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Serializable summary of one generated package
#[derive(Debug, Serialize, PartialEq)]
pub struct PackageReport {
    pub package: String,
    pub path: String,
    pub status: &'static str,
    pub fields: Vec<FieldReport>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct FieldReport {
    pub name: String,
    pub key: String,
    pub getter: String,
}

impl From<&PackageOutcome> for PackageReport {
    fn from(outcome: &PackageOutcome) -> Self {
        Self {
            package: outcome.package.clone(),
            path: outcome.path.display().to_string(),
            status: status_label(outcome.status),
            fields: outcome
                .fields
                .iter()
                .map(|field| FieldReport {
                    name: field.name.clone(),
                    key: field.key.clone(),
                    getter: format!("{GETTER_PREFIX}{}", field.name),
                })
                .collect(),
        }
    }
}

fn status_label(status: OutputStatus) -> &'static str {
    match status {
        OutputStatus::Written => "written",
        OutputStatus::Unchanged => "unchanged",
        OutputStatus::Skipped => "skipped",
    }
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Report the outcome of a generation run in the configured format.
    pub fn report(&self, source_file: &str, outcomes: &[PackageOutcome]) -> Result<()> {
        if matches!(self.options.output_format, OutputFormat::Json) {
            let reports: Vec<PackageReport> = outcomes.iter().map(PackageReport::from).collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
            return Ok(());
        }

        if outcomes.is_empty() {
            self.warning(&format!("No {source_file} found"));
            return Ok(());
        }

        for outcome in outcomes {
            let path = outcome.path.display();
            let count = outcome.fields.len();
            match outcome.status {
                OutputStatus::Written => {
                    self.success(&format!("Wrote {path} ({count} fields)"));
                }
                OutputStatus::Unchanged => {
                    self.info(&format!("{path} is up to date ({count} fields)"));
                }
                OutputStatus::Skipped => {
                    self.warning(&format!("No getters for package {}; skipped", outcome.package));
                }
            }

            if self.options.verbose {
                for field in &outcome.fields {
                    self.bullet(&format!(
                        "{GETTER_PREFIX}{} {} \"{}\"",
                        field.name, ICONS.arrow, field.key
                    ));
                }
            }
        }
        Ok(())
    }

    /// Display a success message with color and icon
    pub fn success(&self, message: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("{} {message}", ICONS.success)
            } else {
                format!(
                    "{} {}",
                    ICONS.success.color(THEME.success),
                    message.color(THEME.success)
                )
            };
            println!("{output}");
        }
    }

    /// Display an error message with color and icon
    pub fn error(&self, message: &str) {
        let output = if self.options.no_color {
            format!("{} {message}", ICONS.error)
        } else {
            format!(
                "{} {}",
                ICONS.error.color(THEME.error),
                message.color(THEME.error)
            )
        };
        eprintln!("{output}");
    }

    /// Display a warning message
    pub fn warning(&self, message: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("{} {message}", ICONS.warning)
            } else {
                format!(
                    "{} {}",
                    ICONS.warning.color(THEME.warning),
                    message.color(THEME.warning)
                )
            };
            println!("{output}");
        }
    }

    pub fn info(&self, message: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("{} {message}", ICONS.info)
            } else {
                format!(
                    "{} {}",
                    ICONS.info.color(THEME.info),
                    message.color(THEME.info)
                )
            };
            println!("{output}");
        }
    }

    pub fn bullet(&self, text: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("  {} {text}", ICONS.bullet)
            } else {
                format!("  {} {}", ICONS.bullet.color(THEME.muted), text.color(THEME.key))
            };
            println!("{output}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gen_fields_build::FieldDescriptor;
    use std::path::PathBuf;

    fn outcome(status: OutputStatus) -> PackageOutcome {
        PackageOutcome {
            package: "ipinfo".to_string(),
            fields: vec![FieldDescriptor {
                name: "Location".to_string(),
                key: "loc".to_string(),
            }],
            path: PathBuf::from("pkg/ipinfo-fields.go"),
            status,
        }
    }

    #[test]
    fn test_package_report_from_outcome() {
        let report = PackageReport::from(&outcome(OutputStatus::Written));
        assert_eq!(report.package, "ipinfo");
        assert_eq!(report.status, "written");
        assert_eq!(
            report.fields,
            vec![FieldReport {
                name: "Location".to_string(),
                key: "loc".to_string(),
                getter: "GetLocation".to_string(),
            }]
        );
    }

    #[test]
    fn test_report_json_shape() {
        let report = PackageReport::from(&outcome(OutputStatus::Skipped));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["status"], "skipped");
        assert_eq!(value["fields"][0]["key"], "loc");
    }

    #[test]
    fn test_output_manager_report() {
        let manager = OutputManager::new(GlobalOptions {
            no_color: true,
            verbose: true,
            ..Default::default()
        });
        let outcomes = vec![
            outcome(OutputStatus::Written),
            outcome(OutputStatus::Unchanged),
            outcome(OutputStatus::Skipped),
        ];
        assert!(manager.report("ipinfo.go", &outcomes).is_ok());
        assert!(manager.report("ipinfo.go", &[]).is_ok());
    }

    #[test]
    fn test_output_manager_json_quiet() {
        let manager = OutputManager::new(GlobalOptions {
            output_format: OutputFormat::Json,
            quiet: true,
            ..Default::default()
        });
        assert!(manager.report("ipinfo.go", &[outcome(OutputStatus::Written)]).is_ok());
    }
}
