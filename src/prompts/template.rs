//! Prompt template record.
//!
//! A [`Template`] bundles the instruction shown to the model, the few-shot
//! examples that prime it, the input keys a caller must supply and the shape
//! of the expected answer. Templates are plain data: rendering lives in
//! [`crate::render`] and response decoding in [`crate::validator`].

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{OutputError, RenderError, TemplateError};
use crate::render::{render_prompt, PromptInputs};
use crate::schema::OutputSchema;
use crate::validator::{parse_output, ParsedOutput};

/// Language every built-in template is written in.
pub const DEFAULT_LANGUAGE: &str = "spanish";

/// Output key used when a template does not name one.
pub const DEFAULT_OUTPUT_KEY: &str = "output";

/// A language tag is a non-empty run of lowercase ASCII letters, e.g. `spanish`.
pub fn is_valid_language(language: &str) -> bool {
    !language.is_empty() && language.chars().all(|c| c.is_ascii_lowercase())
}

/// Template names are ASCII letters, digits, `_` and `-`.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Expected shape of a model answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "schema", rename_all = "snake_case")]
pub enum OutputType {
    /// Free text, returned trimmed.
    #[serde(rename = "string")]
    Text,
    /// JSON decoded against the given schema.
    Structured(OutputSchema),
}

/// One few-shot example: field name to value, in declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Example(Map<String, Value>);

impl Example {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The example's values for the template's input keys, usable to render
    /// the template as if the example were a real request.
    pub fn inputs(&self, template: &Template) -> PromptInputs {
        template
            .input_keys
            .iter()
            .filter_map(|key| self.get(key).map(|value| (key.clone(), value.clone())))
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Example {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Example(iter.into_iter().map(|(key, value)| (key.into(), value)).collect())
    }
}

/// A named instruction plus examples bundle for one generation or judgment task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Unique identifier within a catalogue.
    pub name: String,
    /// Directive text shown to the model.
    pub instruction: String,
    /// Few-shot examples, each holding exactly the input keys and the output key.
    #[serde(default)]
    pub examples: Vec<Example>,
    /// Fields the caller must supply at render time, in render order.
    pub input_keys: Vec<String>,
    /// Field under which the model's answer is expected.
    pub output_key: String,
    pub output_type: OutputType,
    /// Extra instruction describing the exact fields of a structured answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format_instruction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Template {
    /// Creates a text template in the default language with no inputs or examples.
    pub fn new(name: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
            examples: Vec::new(),
            input_keys: Vec::new(),
            output_key: DEFAULT_OUTPUT_KEY.to_string(),
            output_type: OutputType::Text,
            output_format_instruction: None,
            language: Some(DEFAULT_LANGUAGE.to_string()),
        }
    }

    pub fn with_input_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_output_key(mut self, key: impl Into<String>) -> Self {
        self.output_key = key.into();
        self
    }

    /// Marks the output as structured JSON decoded against `schema`.
    pub fn with_structured_output(mut self, schema: OutputSchema) -> Self {
        self.output_type = OutputType::Structured(schema);
        self
    }

    /// Appends the schema's format instruction to the rendered prompt.
    pub fn with_format_instruction(mut self) -> Self {
        self.output_format_instruction = self.schema().map(OutputSchema::format_instructions);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_example(mut self, example: Example) -> Self {
        self.examples.push(example);
        self
    }

    /// Schema of a structured template.
    pub fn schema(&self) -> Option<OutputSchema> {
        match self.output_type {
            OutputType::Text => None,
            OutputType::Structured(schema) => Some(schema),
        }
    }

    pub fn is_structured(&self) -> bool {
        self.schema().is_some()
    }

    pub fn language_or_default(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Renders the final prompt for `inputs`; see [`render_prompt`].
    pub fn render(&self, inputs: &PromptInputs) -> Result<String, RenderError> {
        render_prompt(self, inputs)
    }

    /// Validates a model response against this template; see [`parse_output`].
    pub fn parse_output(&self, raw: &str) -> Result<ParsedOutput, OutputError> {
        parse_output(self, raw)
    }

    /// Checks the template's structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violation found:
    /// - empty instruction
    /// - duplicate input key, or the output key reused as an input
    /// - an example missing a declared field or carrying an undeclared one
    /// - an example output that is not text (text templates) or does not
    ///   decode against the schema (structured templates)
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.instruction.trim().is_empty() {
            return Err(TemplateError::EmptyInstruction(self.name.clone()));
        }

        let mut seen = HashSet::new();
        for key in &self.input_keys {
            if !seen.insert(key.as_str()) {
                return Err(TemplateError::DuplicateInputKey {
                    template: self.name.clone(),
                    key: key.clone(),
                });
            }
        }

        if seen.contains(self.output_key.as_str()) {
            return Err(TemplateError::OutputKeyIsInput {
                template: self.name.clone(),
                key: self.output_key.clone(),
            });
        }

        for (index, example) in self.examples.iter().enumerate() {
            self.validate_example(index + 1, example)?;
        }

        Ok(())
    }

    fn validate_example(&self, number: usize, example: &Example) -> Result<(), TemplateError> {
        let declared = self
            .input_keys
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.output_key.as_str()));

        for field in declared.clone() {
            if !example.contains(field) {
                return Err(TemplateError::MissingExampleField {
                    template: self.name.clone(),
                    example: number,
                    field: field.to_string(),
                });
            }
        }

        let declared: HashSet<&str> = declared.collect();
        if let Some((field, _)) = example.fields().find(|(field, _)| !declared.contains(field)) {
            return Err(TemplateError::UnexpectedExampleField {
                template: self.name.clone(),
                example: number,
                field: field.to_string(),
            });
        }

        let output = example.get(&self.output_key).cloned().unwrap_or_default();
        let invalid = |reason: String| TemplateError::InvalidExampleOutput {
            template: self.name.clone(),
            example: number,
            reason,
        };

        match self.output_type {
            OutputType::Text => {
                if !output.is_string() {
                    return Err(invalid(format!("expected text, got {}", output)));
                }
            }
            OutputType::Structured(schema) => {
                let value = match output {
                    Value::String(text) => {
                        serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))?
                    }
                    other => other,
                };
                schema
                    .decode_value(value)
                    .map_err(|e| invalid(format!("does not match {}: {}", schema, e)))?;
            }
        }

        Ok(())
    }

    /// Path of a stored variant of template `name` in `language`.
    ///
    /// # Errors
    ///
    /// `InvalidLanguage` or `InvalidName` when either would not stay a single
    /// path segment under `cache_dir`.
    pub fn variant_path(
        cache_dir: &Path,
        language: &str,
        name: &str,
    ) -> Result<PathBuf, TemplateError> {
        if !is_valid_language(language) {
            return Err(TemplateError::InvalidLanguage(language.to_string()));
        }
        if !is_valid_name(name) {
            return Err(TemplateError::InvalidName(name.to_string()));
        }
        Ok(cache_dir.join(language).join(format!("{}.json", name)))
    }

    /// Stores this template under `cache_dir/<language>/<name>.json`.
    ///
    /// # Returns
    ///
    /// The path written.
    pub fn save(&self, cache_dir: impl AsRef<Path>) -> Result<PathBuf, TemplateError> {
        let path = Self::variant_path(cache_dir.as_ref(), self.language_or_default(), &self.name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        debug!("Saved template '{}' to {}", self.name, path.display());
        Ok(path)
    }

    /// Loads and validates a template stored by [`Template::save`].
    ///
    /// # Errors
    ///
    /// `Io` when the file cannot be read, `Json` when it does not parse, any
    /// validation error, and `IncompatibleVariant` when the stored record's
    /// name or language differs from the path it was found under.
    pub fn load(
        cache_dir: impl AsRef<Path>,
        language: &str,
        name: &str,
    ) -> Result<Self, TemplateError> {
        let path = Self::variant_path(cache_dir.as_ref(), language, name)?;
        let content = fs::read_to_string(&path)?;
        let template: Template = serde_json::from_str(&content)?;

        if template.name != name || template.language_or_default() != language {
            return Err(TemplateError::IncompatibleVariant {
                template: name.to_string(),
                reason: format!(
                    "{} holds '{}' in '{}'",
                    path.display(),
                    template.name,
                    template.language_or_default()
                ),
            });
        }

        template.validate()?;
        debug!("Loaded template '{}' from {}", name, path.display());
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Template {
        Template::new("echo", "Repite la pregunta.")
            .with_input_keys(["question"])
            .with_example(Example::from_iter([
                ("question", json!("¿Qué hora es?")),
                ("output", json!("¿Qué hora es?")),
            ]))
    }

    #[test]
    fn test_new_defaults() {
        let template = Template::new("t", "i");
        assert_eq!(template.output_key, "output");
        assert_eq!(template.output_type, OutputType::Text);
        assert_eq!(template.language_or_default(), "spanish");
        assert!(template.schema().is_none());
    }

    #[test]
    fn test_valid_template() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_empty_instruction_rejected() {
        let template = Template::new("t", "  \n");
        assert!(matches!(
            template.validate(),
            Err(TemplateError::EmptyInstruction(name)) if name == "t"
        ));
    }

    #[test]
    fn test_duplicate_input_key_rejected() {
        let template = Template::new("t", "i").with_input_keys(["a", "a"]);
        assert!(matches!(
            template.validate(),
            Err(TemplateError::DuplicateInputKey { key, .. }) if key == "a"
        ));
    }

    #[test]
    fn test_output_key_as_input_rejected() {
        let template = Template::new("t", "i").with_input_keys(["output"]);
        assert!(matches!(
            template.validate(),
            Err(TemplateError::OutputKeyIsInput { .. })
        ));
    }

    #[test]
    fn test_example_missing_field_rejected() {
        let template = Template::new("t", "i")
            .with_input_keys(["question", "context"])
            .with_example(Example::from_iter([
                ("question", json!("q")),
                ("output", json!("o")),
            ]));
        assert!(matches!(
            template.validate(),
            Err(TemplateError::MissingExampleField { example: 1, field, .. }) if field == "context"
        ));
    }

    #[test]
    fn test_example_extra_field_rejected() {
        let template = sample().with_example(Example::from_iter([
            ("question", json!("q")),
            ("output", json!("o")),
            ("hint", json!("h")),
        ]));
        assert!(matches!(
            template.validate(),
            Err(TemplateError::UnexpectedExampleField { example: 2, field, .. }) if field == "hint"
        ));
    }

    #[test]
    fn test_text_example_output_must_be_string() {
        let template = Template::new("t", "i").with_example(Example::from_iter([(
            "output",
            json!({"a": 1}),
        )]));
        assert!(matches!(
            template.validate(),
            Err(TemplateError::InvalidExampleOutput { .. })
        ));
    }

    #[test]
    fn test_structured_example_output_checked_against_schema() {
        let template = Template::new("t", "i")
            .with_structured_output(OutputSchema::QuestionFilter)
            .with_example(Example::from_iter([(
                "output",
                json!({"feedback": "f", "verdict": 3}),
            )]));
        assert!(matches!(
            template.validate(),
            Err(TemplateError::InvalidExampleOutput { .. })
        ));

        let template = Template::new("t", "i")
            .with_structured_output(OutputSchema::QuestionFilter)
            .with_example(Example::from_iter([(
                "output",
                json!(r#"{"feedback": "f", "verdict": "1"}"#),
            )]));
        assert!(template.validate().is_ok());
    }

    #[test]
    fn test_format_instruction_follows_schema() {
        let template = Template::new("t", "i")
            .with_structured_output(OutputSchema::EvolutionElimination)
            .with_format_instruction();
        let instruction = template.output_format_instruction.unwrap();
        assert!(instruction.contains("\"reason\""));

        let text = Template::new("t", "i").with_format_instruction();
        assert!(text.output_format_instruction.is_none());
    }

    #[test]
    fn test_example_inputs_follow_input_keys() {
        let template = sample();
        let inputs = template.examples[0].inputs(&template);
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs.get("question"), Some(&json!("¿Qué hora es?")));
        assert!(inputs.get("output").is_none());
    }

    #[test]
    fn test_serde_round_trip_keeps_example_order() {
        let template = sample().with_structured_output(OutputSchema::Keyphrases);
        let encoded = serde_json::to_string(&template).unwrap();
        assert!(encoded.contains(r#""output_type":{"kind":"structured","schema":"keyphrases"}"#));
        let decoded: Template = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, template);
        let keys: Vec<_> = decoded.examples[0].fields().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["question", "output"]);
    }

    #[test]
    fn test_save_and_load_variant() {
        let dir = tempfile::tempdir().unwrap();
        let template = sample().with_language("english");
        let path = template.save(dir.path()).unwrap();
        assert!(path.ends_with("english/echo.json"));

        let loaded = Template::load(dir.path(), "english", "echo").unwrap();
        assert_eq!(loaded, template);
    }

    #[test]
    fn test_load_rejects_mismatched_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = Template::variant_path(dir.path(), "spanish", "other").unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, serde_json::to_string(&sample()).unwrap()).unwrap();

        assert!(matches!(
            Template::load(dir.path(), "spanish", "other"),
            Err(TemplateError::IncompatibleVariant { .. })
        ));
    }

    #[test]
    fn test_save_rejects_language_outside_cache_dir() {
        let root = tempfile::tempdir().unwrap();
        let cache = root.path().join("cache");
        let template = sample().with_language("../outside");

        assert!(matches!(
            template.save(&cache),
            Err(TemplateError::InvalidLanguage(ref language)) if language == "../outside"
        ));
        assert!(!root.path().join("outside").exists());
        assert!(!cache.exists());
    }

    #[test]
    fn test_save_rejects_name_outside_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut template = sample();
        template.name = "../escape".to_string();
        assert!(matches!(
            template.save(dir.path()),
            Err(TemplateError::InvalidName(_))
        ));
    }

    #[test]
    fn test_load_rejects_bad_language() {
        let dir = tempfile::tempdir().unwrap();
        for language in ["", "Spanish", "../outside", "es/mx"] {
            assert!(
                matches!(
                    Template::load(dir.path(), language, "echo"),
                    Err(TemplateError::InvalidLanguage(_))
                ),
                "{:?}",
                language
            );
        }
    }

    #[test]
    fn test_language_tags() {
        assert!(is_valid_language("spanish"));
        assert!(!is_valid_language(""));
        assert!(!is_valid_language("Spanish"));
        assert!(!is_valid_language(".."));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Template::load(dir.path(), "spanish", "absent"),
            Err(TemplateError::Io(_))
        ));
    }
}
