//! qa-forge: Spanish prompt templates for synthetic QA testset generation.
//!
//! This library provides the template catalogue used to evolve, answer and
//! filter synthetic questions, a renderer that turns a template and its
//! inputs into a final prompt, and a validator that decodes model responses
//! into typed records.

// Core modules
pub mod catalogue;
pub mod config;
pub mod error;
pub mod prompts;
pub mod render;
pub mod schema;
pub mod utils;
pub mod validator;

pub use catalogue::{get_template, Catalogue};
pub use config::{CatalogueConfig, ConfigError};
pub use prompts::{Example, OutputType, Template};
pub use render::{render_prompt, PromptInputs};
pub use schema::{OutputRecord, OutputSchema, StructuredOutput};
pub use validator::{parse_output, parse_structured, ParsedOutput};

// Re-export commonly used error types
pub use error::{OutputError, RenderError, TemplateError};
