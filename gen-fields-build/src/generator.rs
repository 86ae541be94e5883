//! Accessor generator: builder configuration and the output emitter.

use chrono::{Datelike, Local};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GenerateError, Result};
use crate::extractor::{FieldDescriptor, extract_fields};
use crate::format::format_source;
use crate::scanner::scan_directory;
use crate::template;

/// File scanned in each package directory unless configured otherwise.
pub const DEFAULT_SOURCE_FILE: &str = "ipinfo.go";

/// Suffix appended to the package name to form the output file name.
pub const FILE_SUFFIX: &str = "-fields.go";

/// Everything needed to render one package's output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationContext {
    pub package: String,
    pub year: i32,
    pub fields: Vec<FieldDescriptor>,
}

impl GenerationContext {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            year: Local::now().year(),
            fields: Vec::new(),
        }
    }

    /// Output file name, e.g. `ipinfo-fields.go`.
    pub fn filename(&self) -> String {
        format!("{}{FILE_SUFFIX}", self.package)
    }

    /// Rendered and canonically formatted output.
    pub fn render(&self) -> Result<String> {
        let rendered = template::render(&self.package, &self.fields);
        format_source(&rendered).map_err(|source| GenerateError::Format {
            package: self.package.clone(),
            source,
        })
    }
}

/// What happened to a package's output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStatus {
    /// The file was written.
    Written,
    /// The file already had the generated content.
    Unchanged,
    /// The package had no qualifying fields; nothing was written.
    Skipped,
}

/// Result of processing one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOutcome {
    pub package: String,
    pub fields: Vec<FieldDescriptor>,
    pub path: PathBuf,
    pub status: OutputStatus,
}

/// Builder for configuring and running the accessor generator.
#[derive(Debug, Clone)]
pub struct FieldsGenerator {
    scan_paths: Vec<PathBuf>,
    source_file: String,
    output_dir: Option<PathBuf>,
}

impl FieldsGenerator {
    /// Create a new generator with default settings.
    pub fn new() -> Self {
        Self {
            scan_paths: Vec::new(),
            source_file: DEFAULT_SOURCE_FILE.to_string(),
            output_dir: None,
        }
    }

    /// Add a package directory to scan.
    ///
    /// Can be called multiple times. Default: the current directory.
    pub fn scan_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.scan_paths.push(path.into());
        self
    }

    /// Set the name of the file scanned in each directory.
    ///
    /// Default: `ipinfo.go`
    pub fn source_file(mut self, name: impl Into<String>) -> Self {
        self.source_file = name.into();
        self
    }

    /// Write output files here instead of next to the scanned source.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Run the generator.
    ///
    /// Scans every configured directory, extracts the accessor fields of each
    /// package and writes one `<package>-fields.go` per package. The first
    /// error aborts the run.
    pub fn run(self) -> Result<Vec<PackageOutcome>> {
        let scan_paths = if self.scan_paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.scan_paths
        };

        let mut outcomes = Vec::new();
        for dir in &scan_paths {
            let packages = scan_directory(dir, &self.source_file)?;
            if packages.is_empty() {
                info!("No {} in {}", self.source_file, dir.display());
            }

            for package in packages {
                let mut context = GenerationContext::new(&package.name);
                for file in &package.files {
                    info!("Processing {}...", file.path.display());
                    context.fields.extend(extract_fields(&file.syntax)?);
                }
                debug!(
                    "Package {} ({}): {} fields",
                    context.package,
                    context.year,
                    context.fields.len()
                );

                let out_dir = self.output_dir.as_deref().unwrap_or(dir);
                outcomes.push(emit(context, out_dir)?);
            }
        }

        info!("Done.");
        Ok(outcomes)
    }
}

impl Default for FieldsGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Format and write the output file for one package, or skip it when the
/// package has no fields.
pub fn emit(context: GenerationContext, out_dir: &Path) -> Result<PackageOutcome> {
    let path = out_dir.join(context.filename());

    if context.fields.is_empty() {
        info!("No getters for {}; skipping.", context.filename());
        return Ok(PackageOutcome {
            package: context.package,
            fields: context.fields,
            path,
            status: OutputStatus::Skipped,
        });
    }

    let code = context.render()?;

    // Only write if content has changed
    let unchanged = fs::read(&path).is_ok_and(|existing| existing == code.as_bytes());
    let status = if unchanged {
        info!("{} is up to date", path.display());
        OutputStatus::Unchanged
    } else {
        fs::create_dir_all(out_dir).map_err(|err| GenerateError::io(out_dir, err))?;
        info!("Writing {}...", path.display());
        fs::write(&path, &code).map_err(|err| GenerateError::io(&path, err))?;
        OutputStatus::Written
    };

    Ok(PackageOutcome {
        package: context.package,
        fields: context.fields,
        path,
        status,
    })
}
