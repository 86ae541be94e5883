use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenerateError>;

/// Top-level error type returned by the generator.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The target source file is not valid Go.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    /// A tagged string field whose tag has no key token.
    #[error("malformed tag {tag} on field {field} in package {package}: expected a key after the tag name")]
    MalformedTag { package: String, field: String, tag: String },

    /// The rendered output could not be canonicalized.
    #[error("failed to format generated source for package {package}: {source}")]
    Format {
        package: String,
        #[source]
        source: SyntaxError,
    },

    /// Reading a source file or writing an output file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GenerateError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A lexical or syntactic error at a position in Go source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}
