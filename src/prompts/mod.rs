//! Built-in prompt templates for synthetic QA testset generation.
//!
//! Templates are grouped by pipeline stage:
//!
//! - [`evolution`] - Rewriting seed questions into harder variants
//! - [`generation`] - Extracting keyphrases and topics, seeding and answering questions
//! - [`filters`] - Judging context quality, question clarity and evolution equivalence
//! - [`repair`] - Asking the model to fix an answer that failed validation
//!
//! Every template is written in Spanish and declares its input keys, output
//! key and output shape. Lookup by name goes through the
//! [`Catalogue`](crate::catalogue::Catalogue).
//!
//! # Usage
//!
//! ```
//! use qa_forge::prompts::generation;
//! use qa_forge::PromptInputs;
//!
//! let template = generation::seed_question();
//! let prompt = template
//!     .render(
//!         &PromptInputs::new()
//!             .with("context", "La fotosíntesis convierte luz en energía química.")
//!             .with("keyphrase", "Fotosíntesis"),
//!     )
//!     .unwrap();
//! assert!(prompt.ends_with("question: "));
//! ```

pub mod evolution;
pub mod filters;
pub mod generation;
pub mod repair;
pub mod template;

pub use template::{
    is_valid_language, Example, OutputType, Template, DEFAULT_LANGUAGE, DEFAULT_OUTPUT_KEY,
};

/// Every built-in template, in registration order.
pub fn builtin_templates() -> Vec<Template> {
    let mut templates = evolution::templates();
    templates.extend(generation::templates());
    templates.extend(filters::templates());
    templates.push(repair::fix_output_format());
    templates
}
