//! File processing API for hsml
//!
//! Runs a template through the pipeline up to a chosen stage and renders the result in a
//! chosen format. Format names are `<stage>` or `<stage>-<format>`:
//!
//! - `html`: the compiled markup
//! - `ast-json`, `ast-treeviz`: the built tree
//! - `lines-simple`, `lines-json`: the line scanner output
//!
//! The command-line tool resolves `--format` through [`ProcessingSpec::from_string`].

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::hsml::config::CompileOptions;
use crate::hsml::error::CompileError;
use crate::hsml::formats::{lines, treeviz};

/// Represents the processing stage (how far the pipeline runs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Lines,
    Ast,
    Html,
}

/// Represents the output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Simple,
    Json,
    Treeviz,
}

/// A stage together with an output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

impl ProcessingSpec {
    pub const HTML: ProcessingSpec = ProcessingSpec {
        stage: ProcessingStage::Html,
        format: OutputFormat::Html,
    };

    /// Parse a format string like "html", "ast-treeviz" or "lines-json"
    pub fn from_string(format_str: &str) -> Result<Self, ProcessingError> {
        let (stage_str, format_part) = match format_str.split_once('-') {
            Some((stage, format)) => (stage, Some(format)),
            None => (format_str, None),
        };

        let stage = match stage_str {
            "html" => ProcessingStage::Html,
            "ast" => ProcessingStage::Ast,
            "lines" => ProcessingStage::Lines,
            _ => return Err(ProcessingError::InvalidStage(stage_str.to_string())),
        };

        let format = match (stage, format_part) {
            (ProcessingStage::Html, None) => OutputFormat::Html,
            (ProcessingStage::Ast, Some("json")) | (ProcessingStage::Lines, Some("json")) => {
                OutputFormat::Json
            }
            (ProcessingStage::Ast, Some("treeviz")) => OutputFormat::Treeviz,
            (ProcessingStage::Lines, Some("simple")) => OutputFormat::Simple,
            (_, None) => return Err(ProcessingError::InvalidFormat(format_str.to_string())),
            (_, Some(other)) => {
                return Err(ProcessingError::InvalidFormatType(format!(
                    "'{}' is not supported for the {} stage",
                    other, stage_str
                )))
            }
        };

        Ok(ProcessingSpec { stage, format })
    }

    /// Get every supported stage/format pair
    pub fn available_specs() -> Vec<ProcessingSpec> {
        vec![
            ProcessingSpec::HTML,
            ProcessingSpec {
                stage: ProcessingStage::Ast,
                format: OutputFormat::Json,
            },
            ProcessingSpec {
                stage: ProcessingStage::Ast,
                format: OutputFormat::Treeviz,
            },
            ProcessingSpec {
                stage: ProcessingStage::Lines,
                format: OutputFormat::Simple,
            },
            ProcessingSpec {
                stage: ProcessingStage::Lines,
                format: OutputFormat::Json,
            },
        ]
    }

    /// The format string this spec parses from.
    pub fn name(&self) -> String {
        let stage = match self.stage {
            ProcessingStage::Html => return "html".to_string(),
            ProcessingStage::Ast => "ast",
            ProcessingStage::Lines => "lines",
        };
        let format = match self.format {
            OutputFormat::Html => "html",
            OutputFormat::Simple => "simple",
            OutputFormat::Json => "json",
            OutputFormat::Treeviz => "treeviz",
        };
        format!("{}-{}", stage, format)
    }
}

/// Errors that can occur during processing
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Invalid stage: {0}")]
    InvalidStage(String),
    #[error("Invalid format type: {0}")]
    InvalidFormatType(String),
    #[error("{0}")]
    Compile(#[from] CompileError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Process template source according to the given stage and format
pub fn process_source(
    source: &str,
    spec: &ProcessingSpec,
    options: &CompileOptions,
) -> Result<String, ProcessingError> {
    match (spec.stage, spec.format) {
        (ProcessingStage::Lines, OutputFormat::Simple) => {
            Ok(lines::to_simple_str(&crate::hsml::scan(source)?))
        }
        (ProcessingStage::Lines, OutputFormat::Json) => {
            Ok(lines::to_json_str(&crate::hsml::scan(source)?)?)
        }
        (ProcessingStage::Ast, OutputFormat::Json) => {
            let document = crate::hsml::parse(source)?;
            Ok(serde_json::to_string_pretty(&document)?)
        }
        (ProcessingStage::Ast, OutputFormat::Treeviz) => {
            Ok(treeviz::to_treeviz_str(&crate::hsml::parse(source)?))
        }
        (ProcessingStage::Html, OutputFormat::Html) => {
            Ok(crate::hsml::compile_with_options(source, options)?)
        }
        (stage, format) => Err(ProcessingError::InvalidFormatType(format!(
            "Unsupported stage/format combination: {:?}/{:?}",
            stage, format
        ))),
    }
}

/// Process an hsml file according to the given stage and format
pub fn process_file<P: AsRef<Path>>(
    file_path: P,
    spec: &ProcessingSpec,
    options: &CompileOptions,
) -> Result<String, ProcessingError> {
    let content = fs::read_to_string(file_path.as_ref())?;
    process_source(&content, spec, options)
}

/// Get list of available format strings
pub fn available_formats() -> Vec<String> {
    ProcessingSpec::available_specs()
        .iter()
        .map(ProcessingSpec::name)
        .collect()
}
