//! Output validator.
//!
//! Decodes a raw model response according to the template that produced it.
//! Text templates get the trimmed response back. Structured templates have
//! their JSON located in the response and decoded against the template's
//! schema; anything that fails to decode, including values outside a field's
//! allowed range, is a `MalformedOutput` carrying the raw text so the caller
//! can retry with corrective feedback.

use serde_json::Value;
use tracing::warn;

use crate::error::OutputError;
use crate::prompts::{OutputType, Template};
use crate::schema::{OutputRecord, OutputSchema, StructuredOutput};
use crate::utils::json_extraction::{extract_json_object, JsonExtraction};

/// A validated model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedOutput {
    Text(String),
    Structured(StructuredOutput),
}

impl ParsedOutput {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParsedOutput::Text(text) => Some(text),
            ParsedOutput::Structured(_) => None,
        }
    }

    pub fn into_structured(self) -> Option<StructuredOutput> {
        match self {
            ParsedOutput::Text(_) => None,
            ParsedOutput::Structured(output) => Some(output),
        }
    }
}

fn malformed(template: &Template, raw: &str, reason: String) -> OutputError {
    warn!("Malformed output for template '{}': {}", template.name, reason);
    OutputError::MalformedOutput {
        template: template.name.clone(),
        raw: raw.to_string(),
        reason,
    }
}

/// Locates the JSON object in `raw`.
fn locate_json(template: &Template, raw: &str) -> Result<Value, OutputError> {
    match extract_json_object(raw) {
        JsonExtraction::Found { value, .. } => Ok(value),
        failure => {
            let reason = failure
                .failure_reason()
                .unwrap_or_else(|| "no JSON object found in response".to_string());
            Err(malformed(template, raw, reason))
        }
    }
}

fn decode(
    template: &Template,
    schema: OutputSchema,
    raw: &str,
) -> Result<StructuredOutput, OutputError> {
    let value = locate_json(template, raw)?;
    schema
        .decode_value(value)
        .map_err(|e| malformed(template, raw, format!("does not match {}: {}", schema, e)))
}

/// Validates `raw` against `template`.
///
/// # Errors
///
/// `MalformedOutput` when a structured response holds no JSON object, holds a
/// truncated one, or its fields do not match the schema.
pub fn parse_output(template: &Template, raw: &str) -> Result<ParsedOutput, OutputError> {
    match template.output_type {
        OutputType::Text => Ok(ParsedOutput::Text(raw.trim().to_string())),
        OutputType::Structured(schema) => decode(template, schema, raw).map(ParsedOutput::Structured),
    }
}

/// Validates `raw` against `template` and returns the record as `T`.
///
/// # Errors
///
/// `SchemaMismatch` when the template does not produce `T`, otherwise the
/// errors of [`parse_output`].
///
/// # Examples
///
/// ```
/// use qa_forge::schema::{ContextScoring, Score};
/// use qa_forge::{get_template, parse_structured};
///
/// let template = get_template("score_context").unwrap();
/// let raw = r#"{"clarity": 3, "depth": 2, "structure": 3, "relevance": 3}"#;
/// let scoring: ContextScoring = parse_structured(template, raw).unwrap();
/// assert_eq!(scoring.depth, Score::Medium);
/// ```
pub fn parse_structured<T: OutputRecord>(template: &Template, raw: &str) -> Result<T, OutputError> {
    let mismatch = |actual: String| OutputError::SchemaMismatch {
        template: template.name.clone(),
        requested: T::SCHEMA.name().to_string(),
        actual,
    };

    match template.output_type {
        OutputType::Text => Err(mismatch("string".to_string())),
        OutputType::Structured(schema) if schema != T::SCHEMA => {
            Err(mismatch(schema.name().to_string()))
        }
        OutputType::Structured(schema) => {
            let output = decode(template, schema, raw)?;
            T::from_output(output).ok_or_else(|| mismatch(schema.name().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{QuestionFilter, Verdict};

    fn filter_template() -> Template {
        Template::new("filter_question", "Evalúa.")
            .with_input_keys(["question"])
            .with_structured_output(OutputSchema::QuestionFilter)
    }

    #[test]
    fn test_text_output_is_trimmed() {
        let template = Template::new("compress_question", "Acorta.");
        let parsed = parse_output(&template, "  ¿Qué tan lejos está la Luna?\n").unwrap();
        assert_eq!(parsed.as_text(), Some("¿Qué tan lejos está la Luna?"));
    }

    #[test]
    fn test_structured_output_decoded() {
        let parsed = parse_output(
            &filter_template(),
            "```json\n{\"feedback\": \"Clara.\", \"verdict\": \"1\"}\n```",
        )
        .unwrap();
        let output = parsed.into_structured().unwrap();
        assert_eq!(output.schema(), OutputSchema::QuestionFilter);
    }

    #[test]
    fn test_not_json_is_malformed_and_keeps_raw() {
        let err = parse_output(&filter_template(), "La pregunta es clara.").unwrap_err();
        match err {
            OutputError::MalformedOutput { raw, template, .. } => {
                assert_eq!(raw, "La pregunta es clara.");
                assert_eq!(template, "filter_question");
            }
            other => panic!("expected malformed output, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_verdict_is_malformed() {
        let err = parse_output(&filter_template(), r#"{"feedback": "x", "verdict": 2}"#)
            .unwrap_err();
        assert!(matches!(err, OutputError::MalformedOutput { .. }));
    }

    #[test]
    fn test_float_verdict() {
        let filter: QuestionFilter =
            parse_structured(&filter_template(), r#"{"feedback": "Clara.", "verdict": 1.0}"#)
                .unwrap();
        assert_eq!(filter.verdict, Verdict::Yes);

        let err = parse_output(&filter_template(), r#"{"feedback": "x", "verdict": 0.5}"#)
            .unwrap_err();
        match err {
            OutputError::MalformedOutput { reason, .. } => {
                assert!(reason.contains("expected an integer, got 0.5"), "{}", reason)
            }
            other => panic!("expected malformed output, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_json_is_malformed() {
        let err = parse_output(&filter_template(), r#"{"feedback": "La preg"#).unwrap_err();
        match err {
            OutputError::MalformedOutput { reason, .. } => assert!(reason.contains("truncated")),
            other => panic!("expected malformed output, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_structured_typed() {
        let filter: QuestionFilter =
            parse_structured(&filter_template(), r#"{"feedback": "Vaga.", "verdict": 0}"#)
                .unwrap();
        assert_eq!(filter.verdict, Verdict::No);
    }

    #[test]
    fn test_parse_structured_schema_mismatch() {
        let result = parse_structured::<crate::schema::ContextScoring>(
            &filter_template(),
            r#"{"feedback": "Vaga.", "verdict": 0}"#,
        );
        assert!(matches!(result, Err(OutputError::SchemaMismatch { .. })));

        let text = Template::new("compress_question", "Acorta.");
        let result = parse_structured::<QuestionFilter>(&text, "hola");
        assert!(matches!(
            result,
            Err(OutputError::SchemaMismatch { actual, .. }) if actual == "string"
        ));
    }
}
