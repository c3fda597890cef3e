//! Configuration for an export run.
//!
//! `defaults/figma-tokens.default.toml` is embedded in the binary. [`Loader`]
//! layers a project file, `FIGMA_TOKENS_*` environment variables and the
//! well-known `FIGMA_FILE_KEY` / `FIGMA_ACCESS_TOKEN` / `FIGMA_PUSH` variables
//! on top before deserializing into [`ExportConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, ValueKind};
use figma_tokens_core::DimensionPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/figma-tokens.default.toml");

/// Project file picked up from the working directory when present.
pub const PROJECT_FILE: &str = "figma-tokens.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub resolve: ResolveConfig,
    pub push: PushConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub variables_file: String,
    pub interchange_file: String,
}

impl OutputConfig {
    pub fn variables_path(&self) -> PathBuf {
        self.dir.join(&self.variables_file)
    }

    pub fn interchange_path(&self) -> PathBuf {
        self.dir.join(&self.interchange_file)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveConfig {
    pub dimension_policy: DimensionPolicy,
}

/// Settings for uploading the variables payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PushConfig {
    pub enabled: bool,
    pub api_base: String,
    #[serde(default)]
    pub file_key: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

impl PushConfig {
    pub fn endpoint(&self, file_key: &str) -> String {
        format!(
            "{}/v1/files/{}/variables",
            self.api_base.trim_end_matches('/'),
            file_key
        )
    }
}

/// Builds an [`ExportConfig`] from the embedded defaults plus whatever layers
/// a run adds. Later layers win.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn defaults() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Adds a TOML file. An explicit `--config` must exist; the project file
    /// in the working directory may not.
    pub fn file(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// `FIGMA_TOKENS_<SECTION>__<KEY>`, then the short `FIGMA_FILE_KEY`,
    /// `FIGMA_ACCESS_TOKEN` and `FIGMA_PUSH` names.
    pub fn env(mut self) -> Result<Self, ConfigError> {
        self.builder = self.builder.add_source(
            Environment::with_prefix("FIGMA_TOKENS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
        if let Ok(key) = std::env::var("FIGMA_FILE_KEY") {
            self = self.set("push.file_key", key)?;
        }
        if let Ok(token) = std::env::var("FIGMA_ACCESS_TOKEN") {
            self = self.set("push.access_token", token)?;
        }
        if let Ok(flag) = std::env::var("FIGMA_PUSH") {
            self = self.set("push.enabled", parse_flag(&flag))?;
        }
        Ok(self)
    }

    /// Pins one dotted key, above every file and variable.
    pub fn set(mut self, key: &str, value: impl Into<ValueKind>) -> Result<Self, ConfigError> {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<ExportConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
