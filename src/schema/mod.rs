//! Structured-output schemas for templates that expect JSON answers.
//!
//! Every structured template names one [`OutputSchema`]. The schema knows how
//! to decode a JSON value into its record type and how to describe itself to
//! the model through a format instruction built from its JSON schema.

pub mod records;
pub mod values;

pub use records::{
    AnswerFormulation, ContextScoring, ConversationQuestions, EvolutionElimination, Keyphrases,
    MainTopics, QuestionFilter, RelevantContexts, DEFAULT_CONTEXT_SCORE_THRESHOLD,
};
pub use values::{AnswerVerdict, Score, Verdict};

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Preamble of the format instruction; the JSON schema follows it.
const JSON_FORMAT_PREAMBLE: &str = r#"The output must be a single JSON object that is a valid instance of the JSON schema below.

For example, given the schema {"properties": {"items": {"type": "array", "items": {"type": "string"}}}, "required": ["items"]}
the object {"items": ["a", "b"]} is a valid instance, while {"properties": {"items": ["a", "b"]}} is not.

Output JSON schema:"#;

const JSON_FORMAT_CLOSING: &str =
    "Return only the JSON object wrapped in triple backticks (```), with no preamble or explanation.";

/// Identifies the record shape a structured template produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSchema {
    ContextScoring,
    QuestionFilter,
    EvolutionElimination,
    AnswerFormulation,
    ConversationQuestions,
    Keyphrases,
    MainTopics,
    RelevantContexts,
}

impl OutputSchema {
    pub const ALL: [OutputSchema; 8] = [
        OutputSchema::ContextScoring,
        OutputSchema::QuestionFilter,
        OutputSchema::EvolutionElimination,
        OutputSchema::AnswerFormulation,
        OutputSchema::ConversationQuestions,
        OutputSchema::Keyphrases,
        OutputSchema::MainTopics,
        OutputSchema::RelevantContexts,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OutputSchema::ContextScoring => "context_scoring",
            OutputSchema::QuestionFilter => "question_filter",
            OutputSchema::EvolutionElimination => "evolution_elimination",
            OutputSchema::AnswerFormulation => "answer_formulation",
            OutputSchema::ConversationQuestions => "conversation_questions",
            OutputSchema::Keyphrases => "keyphrases",
            OutputSchema::MainTopics => "main_topics",
            OutputSchema::RelevantContexts => "relevant_contexts",
        }
    }

    /// JSON schema of the record, without the `$schema` meta key.
    pub fn json_schema(self) -> Value {
        match self {
            OutputSchema::ContextScoring => schema_value::<ContextScoring>(),
            OutputSchema::QuestionFilter => schema_value::<QuestionFilter>(),
            OutputSchema::EvolutionElimination => schema_value::<EvolutionElimination>(),
            OutputSchema::AnswerFormulation => schema_value::<AnswerFormulation>(),
            OutputSchema::ConversationQuestions => schema_value::<ConversationQuestions>(),
            OutputSchema::Keyphrases => schema_value::<Keyphrases>(),
            OutputSchema::MainTopics => schema_value::<MainTopics>(),
            OutputSchema::RelevantContexts => schema_value::<RelevantContexts>(),
        }
    }

    /// Instruction text telling the model exactly which JSON to emit.
    pub fn format_instructions(self) -> String {
        let schema = serde_json::to_string(&self.json_schema()).unwrap_or_default();
        format!(
            "{}\n```\n{}\n```\n\n{}",
            JSON_FORMAT_PREAMBLE, schema, JSON_FORMAT_CLOSING
        )
    }

    /// Decodes a JSON value into this schema's record.
    pub fn decode_value(self, value: Value) -> Result<StructuredOutput, serde_json::Error> {
        Ok(match self {
            OutputSchema::ContextScoring => {
                StructuredOutput::ContextScoring(serde_json::from_value(value)?)
            }
            OutputSchema::QuestionFilter => {
                StructuredOutput::QuestionFilter(serde_json::from_value(value)?)
            }
            OutputSchema::EvolutionElimination => {
                StructuredOutput::EvolutionElimination(serde_json::from_value(value)?)
            }
            OutputSchema::AnswerFormulation => {
                StructuredOutput::AnswerFormulation(serde_json::from_value(value)?)
            }
            OutputSchema::ConversationQuestions => {
                StructuredOutput::ConversationQuestions(serde_json::from_value(value)?)
            }
            OutputSchema::Keyphrases => StructuredOutput::Keyphrases(serde_json::from_value(value)?),
            OutputSchema::MainTopics => StructuredOutput::MainTopics(serde_json::from_value(value)?),
            OutputSchema::RelevantContexts => {
                StructuredOutput::RelevantContexts(serde_json::from_value(value)?)
            }
        })
    }

    /// Decodes JSON text into this schema's record.
    pub fn decode_str(self, json: &str) -> Result<StructuredOutput, serde_json::Error> {
        self.decode_value(serde_json::from_str(json)?)
    }
}

impl std::fmt::Display for OutputSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn schema_value<T: JsonSchema>() -> Value {
    let mut value = serde_json::to_value(schemars::schema_for!(T)).unwrap_or_default();
    if let Some(object) = value.as_object_mut() {
        object.remove("$schema");
    }
    value
}

/// A decoded structured response, tagged by schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredOutput {
    ContextScoring(ContextScoring),
    QuestionFilter(QuestionFilter),
    EvolutionElimination(EvolutionElimination),
    AnswerFormulation(AnswerFormulation),
    ConversationQuestions(ConversationQuestions),
    Keyphrases(Keyphrases),
    MainTopics(MainTopics),
    RelevantContexts(RelevantContexts),
}

impl StructuredOutput {
    pub fn schema(&self) -> OutputSchema {
        match self {
            StructuredOutput::ContextScoring(_) => OutputSchema::ContextScoring,
            StructuredOutput::QuestionFilter(_) => OutputSchema::QuestionFilter,
            StructuredOutput::EvolutionElimination(_) => OutputSchema::EvolutionElimination,
            StructuredOutput::AnswerFormulation(_) => OutputSchema::AnswerFormulation,
            StructuredOutput::ConversationQuestions(_) => OutputSchema::ConversationQuestions,
            StructuredOutput::Keyphrases(_) => OutputSchema::Keyphrases,
            StructuredOutput::MainTopics(_) => OutputSchema::MainTopics,
            StructuredOutput::RelevantContexts(_) => OutputSchema::RelevantContexts,
        }
    }

    /// Encodes the record back to JSON.
    pub fn to_value(&self) -> Value {
        let encoded = match self {
            StructuredOutput::ContextScoring(record) => serde_json::to_value(record),
            StructuredOutput::QuestionFilter(record) => serde_json::to_value(record),
            StructuredOutput::EvolutionElimination(record) => serde_json::to_value(record),
            StructuredOutput::AnswerFormulation(record) => serde_json::to_value(record),
            StructuredOutput::ConversationQuestions(record) => serde_json::to_value(record),
            StructuredOutput::Keyphrases(record) => serde_json::to_value(record),
            StructuredOutput::MainTopics(record) => serde_json::to_value(record),
            StructuredOutput::RelevantContexts(record) => serde_json::to_value(record),
        };
        encoded.unwrap_or_default()
    }
}

/// A record type that a structured template can decode into.
pub trait OutputRecord: Serialize + DeserializeOwned + JsonSchema {
    const SCHEMA: OutputSchema;

    /// Unwraps the record from a decoded output of the matching schema.
    fn from_output(output: StructuredOutput) -> Option<Self>;
}

macro_rules! impl_output_record {
    ($($record:ident),+ $(,)?) => {
        $(
            impl OutputRecord for $record {
                const SCHEMA: OutputSchema = OutputSchema::$record;

                fn from_output(output: StructuredOutput) -> Option<Self> {
                    match output {
                        StructuredOutput::$record(record) => Some(record),
                        _ => None,
                    }
                }
            }

            impl From<$record> for StructuredOutput {
                fn from(record: $record) -> Self {
                    StructuredOutput::$record(record)
                }
            }
        )+
    };
}

impl_output_record!(
    ContextScoring,
    QuestionFilter,
    EvolutionElimination,
    AnswerFormulation,
    ConversationQuestions,
    Keyphrases,
    MainTopics,
    RelevantContexts,
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_names_are_unique() {
        let mut names: Vec<_> = OutputSchema::ALL.iter().map(|s| s.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), OutputSchema::ALL.len());
    }

    #[test]
    fn test_serde_name_matches_name() {
        for schema in OutputSchema::ALL {
            assert_eq!(serde_json::to_value(schema).unwrap(), json!(schema.name()));
        }
    }

    #[test]
    fn test_context_scoring_json_schema_fields() {
        let schema = OutputSchema::ContextScoring.json_schema();
        assert!(schema.get("$schema").is_none());
        let properties = schema["properties"].as_object().unwrap();
        for field in ["clarity", "depth", "structure", "relevance"] {
            assert_eq!(properties[field]["enum"], json!([1, 2, 3]), "field {}", field);
        }
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
    }

    #[test]
    fn test_format_instructions_embed_schema() {
        let instructions = OutputSchema::QuestionFilter.format_instructions();
        assert!(instructions.contains("\"feedback\""));
        assert!(instructions.contains("\"verdict\""));
        assert!(instructions.contains("```"));
    }

    #[test]
    fn test_decode_dispatches_on_schema() {
        let output = OutputSchema::EvolutionElimination
            .decode_str(r#"{"reason": "Iguales.", "verdict": 1}"#)
            .unwrap();
        assert_eq!(output.schema(), OutputSchema::EvolutionElimination);
        let record = EvolutionElimination::from_output(output).unwrap();
        assert_eq!(record.verdict, Verdict::Yes);
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        assert!(OutputSchema::Keyphrases
            .decode_value(json!({"topics": ["a"]}))
            .is_err());
        assert!(OutputSchema::QuestionFilter
            .decode_value(json!({"feedback": "x", "verdict": 5}))
            .is_err());
    }

    #[test]
    fn test_from_output_rejects_other_schema() {
        let output = StructuredOutput::from(Keyphrases {
            keyphrases: vec!["Agujero negro".to_string()],
        });
        assert!(MainTopics::from_output(output).is_none());
    }

    #[test]
    fn test_to_value_round_trip() {
        let output = OutputSchema::AnswerFormulation
            .decode_value(json!({"answer": "Sí.", "verdict": "1"}))
            .unwrap();
        let encoded = output.to_value();
        assert_eq!(encoded, json!({"answer": "Sí.", "verdict": 1}));
        assert_eq!(
            OutputSchema::AnswerFormulation.decode_value(encoded).unwrap(),
            output
        );
    }
}
