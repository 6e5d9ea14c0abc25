//! Record shapes decoded from structured model responses.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::values::{AnswerVerdict, Score, Verdict};

/// Mean context score at or above which a context is kept for question generation.
pub const DEFAULT_CONTEXT_SCORE_THRESHOLD: f64 = 1.5;

/// Quality assessment of a source context, one score per criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ContextScoring {
    /// Precision and understandability of the information.
    pub clarity: Score,
    /// Level of detailed examination and insight.
    pub depth: Score,
    /// Organisation and logical flow of the content.
    pub structure: Score,
    /// Focus on the main topic without digressions.
    pub relevance: Score,
}

impl ContextScoring {
    /// Average of the four criteria.
    pub fn mean(&self) -> f64 {
        let total = u32::from(self.clarity.value())
            + u32::from(self.depth.value())
            + u32::from(self.structure.value())
            + u32::from(self.relevance.value());
        f64::from(total) / 4.0
    }

    /// Returns true when the mean score reaches `threshold`.
    pub fn passes(&self, threshold: f64) -> bool {
        self.mean() >= threshold
    }
}

/// Judgment on whether a generated question is self-contained and clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionFilter {
    /// Comments on clarity and answerability, with suggestions.
    pub feedback: String,
    /// 1 when the question is specific, independent and clear.
    pub verdict: Verdict,
}

/// Judgment on whether an evolved question is equivalent to its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EvolutionElimination {
    /// Why the two questions are or are not equivalent.
    pub reason: String,
    /// 1 when both questions share constraints, depth and breadth.
    pub verdict: Verdict,
}

/// Answer drawn from a context, with a flag telling whether it was found there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnswerFormulation {
    pub answer: String,
    /// 1 when the answer is present in the context, -1 otherwise.
    pub verdict: AnswerVerdict,
}

impl AnswerFormulation {
    pub fn is_answered(&self) -> bool {
        self.verdict == AnswerVerdict::Present
    }
}

/// A question split into two conversational follow-ups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConversationQuestions {
    pub first_question: String,
    pub second_question: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Keyphrases {
    pub keyphrases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MainTopics {
    pub topics: Vec<String>,
}

/// Contexts relevant to a question, by 1-based position in the supplied list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RelevantContexts {
    pub relevant_contexts: Vec<u32>,
}

impl RelevantContexts {
    /// Picks the referenced contexts out of `contexts`, skipping indices that
    /// fall outside the list.
    pub fn select<'a, T>(&self, contexts: &'a [T]) -> Vec<&'a T> {
        self.relevant_contexts
            .iter()
            .filter_map(|&index| {
                let position = usize::try_from(index).ok()?.checked_sub(1)?;
                contexts.get(position)
            })
            .collect()
    }
}
