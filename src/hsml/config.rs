//! Compile options and configuration loading.
//!
//! `defaults/hsml.default.toml` is embedded so that the documented defaults and
//! runtime behavior stay in sync. Callers layer user files and key overrides on
//! top of it via [`Loader`] before deserializing into [`HsmlConfig`].
//!
//! The compiler itself only ever sees a [`CompileOptions`] value; it never reads files.
//! [`load_compile_options`] is the lookup the command-line tool performs: a project
//! `hsml.toml` first, then an explicitly named file.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/hsml.default.toml");

/// Name of the project configuration file picked up from a template directory.
pub const PROJECT_CONFIG: &str = "hsml.toml";

/// Top-level configuration consumed by hsml applications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HsmlConfig {
    #[serde(default)]
    pub compile: CompileOptions,
}

/// Knobs of the HTML emitter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompileOptions {
    pub dynamic_attributes: DynamicAttributeStyle,
    pub void_elements: VoidElementStyle,
    pub native_comments: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            dynamic_attributes: DynamicAttributeStyle::default(),
            void_elements: VoidElementStyle::default(),
            native_comments: true,
        }
    }
}

/// Carry-through syntax for dynamic attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DynamicAttributeStyle {
    /// `:name="expr"`, kept for a framework binding step.
    #[default]
    Binding,
    /// `name="{{ expr }}"`, the same delimiters as text interpolation.
    Interpolation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoidElementStyle {
    /// `<img src="a"/>`
    #[default]
    SelfClosing,
    /// `<img src="a">`
    Html,
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

    /// Apply a single key/value override, e.g. `compile.void_elements = "html"`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<HsmlConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve the compile options for templates under `project_dir`.
///
/// Layers, lowest priority first: the embedded defaults, `project_dir/hsml.toml` when it
/// exists, and `explicit` (which must exist) when given.
pub fn load_compile_options(
    project_dir: impl AsRef<Path>,
    explicit: Option<&Path>,
) -> Result<CompileOptions, ConfigError> {
    let mut loader = Loader::new().with_optional_file(project_dir.as_ref().join(PROJECT_CONFIG));
    if let Some(path) = explicit {
        loader = loader.with_file(path);
    }

    let options = loader.build()?.compile;
    log::debug!("compile options: {:?}", options);
    Ok(options)
}
