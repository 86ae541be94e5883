use anyhow::{Context, Result};
use gen_fields_build::DEFAULT_SOURCE_FILE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the optional per-package configuration file
pub const CONFIG_FILE: &str = "gen-fields.toml";

/// Configuration stored in gen-fields.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenFieldsConfig {
    #[serde(default)]
    pub generator: GeneratorSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    #[serde(default = "default_source_file")]
    pub source_file: String,
    /// Output directory, relative to the directory holding the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            source_file: default_source_file(),
            out_dir: None,
        }
    }
}

fn default_source_file() -> String {
    DEFAULT_SOURCE_FILE.to_string()
}

impl GenFieldsConfig {
    /// Load `gen-fields.toml` from `dir` if present.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: GenFieldsConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        Ok(Some(config))
    }
}

/// Effective generator settings after merging flags, config file and defaults
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub dirs: Vec<PathBuf>,
    pub source_file: String,
    pub out_dir: Option<PathBuf>,
}

impl Settings {
    /// Flags win over the config file, which wins over the defaults.
    pub fn resolve(
        dirs: Vec<PathBuf>,
        source_flag: Option<String>,
        out_dir_flag: Option<PathBuf>,
    ) -> Result<Self> {
        let dirs = if dirs.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            dirs
        };

        let config_dir = &dirs[0];
        let config = GenFieldsConfig::load(config_dir)?;
        if config.is_some() {
            log::debug!("Loaded {} from {}", CONFIG_FILE, config_dir.display());
        }
        let settings = config.map(|c| c.generator).unwrap_or_default();

        let source_file = source_flag.unwrap_or(settings.source_file);
        let out_dir = out_dir_flag.or_else(|| settings.out_dir.map(|out| config_dir.join(out)));

        Ok(Self {
            dirs,
            source_file,
            out_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GenFieldsConfig::default();
        assert_eq!(config.generator.source_file, "ipinfo.go");
        assert_eq!(config.generator.out_dir, None);
    }

    #[test]
    fn test_config_serialization() {
        let config = GenFieldsConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[generator]"));
        assert!(toml_str.contains("source_file"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: GenFieldsConfig = toml::from_str("[generator]\nout_dir = \"gen\"\n").unwrap();
        assert_eq!(config.generator.source_file, "ipinfo.go");
        assert_eq!(config.generator.out_dir, Some(PathBuf::from("gen")));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(GenFieldsConfig::load(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[generator\n").unwrap();
        let err = GenFieldsConfig::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_resolve_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::resolve(vec![dir.path().to_path_buf()], None, None).unwrap();
        assert_eq!(settings.dirs, vec![dir.path().to_path_buf()]);
        assert_eq!(settings.source_file, "ipinfo.go");
        assert_eq!(settings.out_dir, None);
    }

    #[test]
    fn test_resolve_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[generator]\nsource_file = \"geo.go\"\nout_dir = \"generated\"\n",
        )
        .unwrap();

        let settings = Settings::resolve(vec![dir.path().to_path_buf()], None, None).unwrap();
        assert_eq!(settings.source_file, "geo.go");
        assert_eq!(settings.out_dir, Some(dir.path().join("generated")));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[generator]\nsource_file = \"geo.go\"\nout_dir = \"generated\"\n",
        )
        .unwrap();

        let settings = Settings::resolve(
            vec![dir.path().to_path_buf()],
            Some("asn.go".to_string()),
            Some(PathBuf::from("/tmp/out")),
        )
        .unwrap();
        assert_eq!(settings.source_file, "asn.go");
        assert_eq!(settings.out_dir, Some(PathBuf::from("/tmp/out")));
    }
}
