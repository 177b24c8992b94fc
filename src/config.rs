use crate::error::{Result, StoreError};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "RAGSTORE";
pub const DEFAULT_CONFIG_NAME: &str = "ragstore";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,

    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Documents ingested at startup, one per line.
    #[serde(default)]
    pub documents: Option<PathBuf>,
}

fn default_bind() -> String {
    "127.0.0.1:7878".to_string()
}

fn default_embedding_dimension() -> usize {
    256
}

fn default_top_k() -> usize {
    crate::pipeline::DEFAULT_TOP_K
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            embedding_dimension: default_embedding_dimension(),
            default_top_k: default_top_k(),
            documents: None,
        }
    }
}

impl Settings {
    /// Layers defaults, a TOML file and `RAGSTORE_*` environment variables.
    ///
    /// An explicit `path` must exist; otherwise `ragstore.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.embedding_dimension == 0 {
            return Err(StoreError::InvalidArgument(
                "embedding_dimension must be at least 1".to_string(),
            ));
        }
        if self.default_top_k == 0 {
            return Err(StoreError::InvalidArgument("default_top_k must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod config_test {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.bind, "127.0.0.1:7878");
        assert_eq!(settings.embedding_dimension, 256);
        assert_eq!(settings.default_top_k, 2);
        assert!(settings.documents.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_file_overrides_defaults() {
        let file = toml_file("bind = \"0.0.0.0:9000\"\ndefault_top_k = 4\ndocuments = \"data/docs.txt\"\n");

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.bind, "0.0.0.0:9000");
        assert_eq!(settings.default_top_k, 4);
        assert_eq!(settings.embedding_dimension, 256);
        assert_eq!(settings.documents, Some(PathBuf::from("data/docs.txt")));
    }

    #[test]
    fn test_load_rejects_zero_top_k() {
        let file = toml_file("default_top_k = 0\n");
        let result = Settings::load(Some(file.path()));
        assert!(matches!(result, Err(StoreError::InvalidArgument(_))));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = Settings::load(Some(Path::new("no/such/ragstore.toml")));
        assert!(matches!(result, Err(StoreError::Config(_))));
    }
}
