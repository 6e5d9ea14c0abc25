//! Template renderer.
//!
//! Turns a [`Template`] and caller-supplied [`PromptInputs`] into the final
//! prompt string: instruction, optional format instruction, a labelled section
//! of few-shot examples, then the caller's inputs and a trailing output key
//! for the model to complete.
//!
//! The layout is a Tera template. Instructions, examples and inputs are passed
//! through the Tera context rather than spliced into the template source, so
//! braces in any of them are never interpreted.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tera::{Context, Tera};
use tracing::{debug, warn};

use crate::error::RenderError;
use crate::prompts::Template;

const PROMPT_LAYOUT: &str = r#"{{ instruction }}
{%- if format_instruction %}
{{ format_instruction }}
{%- endif %}
{% if examples %}
{{ labels.examples }}
{% for example in examples %}
{%- for field in example %}
{{ field.key }}: {{ field.value }}
{%- endfor %}
{% endfor -%}
{% endif %}
{{ labels.task }}
{% for field in inputs %}
{{ field.key }}: {{ field.value }}
{%- endfor %}
{{ output_key }}: "#;

/// Values supplied for a template's input keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptInputs(BTreeMap<String, Value>);

impl PromptInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for PromptInputs {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        PromptInputs(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}

/// Section headings for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionLabels {
    pub examples: &'static str,
    pub task: &'static str,
}

impl SectionLabels {
    /// Labels for `language`; unknown languages get English labels.
    pub fn for_language(language: &str) -> Self {
        match language {
            "spanish" => SectionLabels {
                examples: "Ejemplos:",
                task: "Tu tarea:",
            },
            _ => SectionLabels {
                examples: "Examples:",
                task: "Your actual task:",
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct RenderedField<'a> {
    key: &'a str,
    value: String,
}

/// Formats a value for the prompt: text verbatim, anything else as compact
/// JSON fenced in triple backticks.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => format!("```{}```", other),
    }
}

/// Renders `template` with `inputs`.
///
/// # Errors
///
/// - `MissingInput` when a declared input key has no value
/// - `UnexpectedInput` when a supplied key is not declared
/// - `Tera` if the layout fails to render
///
/// # Examples
///
/// ```
/// use qa_forge::{get_template, PromptInputs};
///
/// let template = get_template("answer_formulate").unwrap();
/// let prompt = template
///     .render(&PromptInputs::new().with("context", "X").with("question", "Y"))
///     .unwrap();
/// assert!(prompt.contains("context: X"));
/// assert!(prompt.contains("question: Y"));
/// ```
pub fn render_prompt(template: &Template, inputs: &PromptInputs) -> Result<String, RenderError> {
    for key in &template.input_keys {
        if inputs.get(key).is_none() {
            warn!("Template '{}' rendered without input '{}'", template.name, key);
            return Err(RenderError::MissingInput {
                template: template.name.clone(),
                key: key.clone(),
            });
        }
    }

    if let Some(key) = inputs
        .keys()
        .find(|key| !template.input_keys.iter().any(|k| k.as_str() == *key))
    {
        return Err(RenderError::UnexpectedInput {
            template: template.name.clone(),
            key: key.to_string(),
        });
    }

    let examples: Vec<Vec<RenderedField<'_>>> = template
        .examples
        .iter()
        .map(|example| {
            example
                .fields()
                .map(|(key, value)| RenderedField {
                    key,
                    value: format_value(value),
                })
                .collect()
        })
        .collect();

    let fields: Vec<RenderedField<'_>> = template
        .input_keys
        .iter()
        .filter_map(|key| {
            inputs.get(key).map(|value| RenderedField {
                key,
                value: format_value(value),
            })
        })
        .collect();

    let mut context = Context::new();
    context.insert("instruction", template.instruction.trim());
    context.insert(
        "format_instruction",
        template.output_format_instruction.as_deref().unwrap_or("").trim(),
    );
    context.insert("examples", &examples);
    context.insert("inputs", &fields);
    context.insert("output_key", &template.output_key);
    context.insert(
        "labels",
        &SectionLabels::for_language(template.language_or_default()),
    );

    let prompt = Tera::one_off(PROMPT_LAYOUT, &context, false)?;
    debug!(
        "Rendered template '{}' ({} examples, {} chars)",
        template.name,
        examples.len(),
        prompt.len()
    );
    Ok(prompt)
}
