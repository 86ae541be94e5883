//! Source scanner: finds the target file in a package directory and parses it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{GenerateError, Result};
use crate::syntax::GoFile;

/// A parsed source file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub syntax: GoFile,
}

/// Parsed files grouped under their `package` clause.
#[derive(Debug, Clone)]
pub struct ParsedPackage {
    pub name: String,
    pub files: Vec<ParsedFile>,
}

/// Parse every file directly inside `dir` whose name is exactly
/// `source_file`. Packages come back sorted by name.
pub fn scan_directory(dir: &Path, source_file: &str) -> Result<Vec<ParsedPackage>> {
    let mut packages: BTreeMap<String, Vec<ParsedFile>> = BTreeMap::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|err| GenerateError::io(dir, err.into()))?;
        if !entry.file_type().is_file() || entry.file_name() != source_file {
            continue;
        }
        let parsed = parse_source_file(entry.path())?;
        packages
            .entry(parsed.syntax.package().to_string())
            .or_default()
            .push(parsed);
    }

    Ok(packages
        .into_iter()
        .map(|(name, files)| ParsedPackage { name, files })
        .collect())
}

/// Read and parse a single Go file.
pub fn parse_source_file(path: &Path) -> Result<ParsedFile> {
    let content = fs::read_to_string(path).map_err(|err| GenerateError::io(path, err))?;
    let syntax = GoFile::parse(content).map_err(|source| GenerateError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ParsedFile {
        path: path.to_path_buf(),
        syntax,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_exact_file_name_is_considered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ipinfo.go"), "package ipinfo\n").unwrap();
        fs::write(dir.path().join("client.go"), "package ipinfo\n\nthis is not go\n").unwrap();
        fs::write(dir.path().join("ipinfo_test.go"), "not go either").unwrap();

        let packages = scan_directory(dir.path(), "ipinfo.go").unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "ipinfo");
        assert_eq!(packages[0].files.len(), 1);
        assert!(packages[0].files[0].path.ends_with("ipinfo.go"));
    }

    #[test]
    fn test_nested_directories_are_not_scanned() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sub");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("ipinfo.go"), "package sub\n").unwrap();

        assert!(scan_directory(dir.path(), "ipinfo.go").unwrap().is_empty());
    }

    #[test]
    fn test_syntax_error_aborts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ipinfo.go"), "package ipinfo\n\ntype Info struct {\n").unwrap();

        let err = scan_directory(dir.path(), "ipinfo.go").unwrap_err();
        assert!(matches!(err, GenerateError::Parse { .. }));
        assert!(err.to_string().contains("ipinfo.go"));
    }

    #[test]
    fn test_missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_directory(&dir.path().join("missing"), "ipinfo.go").unwrap_err();
        assert!(matches!(err, GenerateError::Io { .. }));
    }
}
