//! Error types for qa-forge operations.
//!
//! Defines error types for each subsystem:
//! - Template definition, lookup and variant storage
//! - Prompt rendering
//! - Model output validation

use thiserror::Error;

use crate::config::ConfigError;
use crate::render::PromptInputs;

/// Errors that can occur while defining, loading or looking up templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Duplicate template name '{0}'")]
    DuplicateName(String),

    #[error("Template '{0}' has an empty instruction")]
    EmptyInstruction(String),

    #[error("Template '{template}' declares input key '{key}' more than once")]
    DuplicateInputKey { template: String, key: String },

    #[error("Template '{template}' uses '{key}' as both an input key and the output key")]
    OutputKeyIsInput { template: String, key: String },

    #[error("Example {example} of template '{template}' is missing field '{field}'")]
    MissingExampleField {
        template: String,
        example: usize,
        field: String,
    },

    #[error("Example {example} of template '{template}' has undeclared field '{field}'")]
    UnexpectedExampleField {
        template: String,
        example: usize,
        field: String,
    },

    #[error("Example {example} of template '{template}' has an invalid output: {reason}")]
    InvalidExampleOutput {
        template: String,
        example: usize,
        reason: String,
    },

    #[error("Variant of template '{template}' is incompatible with the built-in one: {reason}")]
    IncompatibleVariant { template: String, reason: String },

    #[error("Invalid language '{0}': expected lowercase ASCII letters")]
    InvalidLanguage(String),

    #[error("Invalid template name '{0}': expected ASCII letters, digits, '_' or '-'")]
    InvalidName(String),

    #[error("Invalid catalogue configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while rendering a template into a prompt.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template '{template}' requires input '{key}'")]
    MissingInput { template: String, key: String },

    #[error("Template '{template}' does not declare input '{key}'")]
    UnexpectedInput { template: String, key: String },

    #[error("Tera template rendering error: {0}")]
    Tera(#[from] tera::Error),
}

/// Errors that can occur while validating a model response.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Malformed output for template '{template}': {reason}")]
    MalformedOutput {
        template: String,
        raw: String,
        reason: String,
    },

    #[error("Template '{template}' produces '{actual}' output, not '{requested}'")]
    SchemaMismatch {
        template: String,
        requested: String,
        actual: String,
    },
}

impl OutputError {
    /// Raw model response carried by a malformed output error.
    pub fn raw(&self) -> Option<&str> {
        match self {
            OutputError::MalformedOutput { raw, .. } => Some(raw),
            OutputError::SchemaMismatch { .. } => None,
        }
    }

    /// Builds the inputs for the `fix_output_format` template so the caller
    /// can ask the model to repair a malformed completion.
    ///
    /// `prompt` is the rendered prompt that produced the malformed response.
    /// Returns `None` for errors that are not about the response text.
    pub fn repair_inputs(&self, prompt: &str) -> Option<PromptInputs> {
        self.raw().map(|raw| {
            PromptInputs::new()
                .with("prompt", prompt)
                .with("completion", raw)
        })
    }
}
