//! Shared configuration loader for the tagged text toolchain.
//!
//! `defaults/tt.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`TtConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/tt.default.toml");

/// Top-level configuration consumed by the renderer and the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct TtConfig {
    pub cache: CacheConfig,
    pub files: FilesConfig,
    pub output: OutputConfig,
}

/// Persisted node arrays reused across runs.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub folder: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    pub source_extension: String,
    pub cache_extension: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub default_format: String,
    pub create_folders: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (`--no-cache` maps to `cache.enabled`).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<TtConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TtConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(config.cache.enabled);
        assert_eq!(config.cache.folder, "json");
        assert_eq!(config.files.source_extension, "tt");
        assert_eq!(config.files.cache_extension, "json");
        assert_eq!(config.output.default_format, "txt");
        assert!(config.output.create_folders);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("cache.enabled", false)
            .expect("override to apply")
            .set_override("output.default_format", "html")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(!config.cache.enabled);
        assert_eq!(config.output.default_format, "html");
    }
}
