//! Build-time generator for Go field accessors.
//!
//! This crate scans a Go package's `ipinfo.go` for struct fields declared as
//! `string` with a tag such as `` `json:"hostname"` ``, and generates
//! `<package>-fields.go` with a `GetHostname` function and `Client` method
//! for each of them.
//!
//! # Example
//!
//! ```ignore
//! gen_fields_build::generate_fields()
//!     .scan_path("ipinfo/")
//!     .run()
//!     .expect("Failed to generate field accessors");
//! ```

mod error;
mod extractor;
mod format;
mod generator;
mod scanner;
mod syntax;
mod template;

pub use error::{GenerateError, Result, SyntaxError};
pub use extractor::{FieldDescriptor, extract_fields, tag_key};
pub use format::format_source;
pub use generator::{
    DEFAULT_SOURCE_FILE, FILE_SUFFIX, FieldsGenerator, GenerationContext, OutputStatus, PackageOutcome, emit,
};
pub use scanner::{ParsedFile, ParsedPackage, parse_source_file, scan_directory};
pub use syntax::GoFile;
pub use template::{GENERATED_HEADER, GETTER_PREFIX, REQUEST_PREFIX, SENTINEL, render};

/// Create a new generator with default settings.
///
/// # Example
///
/// ```ignore
/// gen_fields_build::generate_fields()
///     .source_file("ipinfo.go")
///     .run()
///     .expect("Failed to generate field accessors");
/// ```
pub fn generate_fields() -> FieldsGenerator {
    FieldsGenerator::new()
}
