//! Constrained scalar values carried by structured outputs.
//!
//! Models are inconsistent about quoting numbers (`"1"` and `1` both show up
//! in practice, sometimes as `1.0`), so decoding accepts any of those
//! representations as long as the value is integral. The range is
//! strict: a value outside the allowed set fails to decode.

use std::fmt;

use schemars::gen::SchemaGenerator;
use schemars::schema::{InstanceType, Schema, SchemaObject};
use schemars::JsonSchema;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Integral value of a float, so `1.0` decodes like `1`.
fn integral(value: f64) -> Result<i64, String> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= i64::MAX as f64 {
        Ok(value as i64)
    } else {
        Err(format!("expected an integer, got {}", value))
    }
}

/// Integer as emitted by a model: bare, quoted, or written as `1.0`.
struct IntegerVisitor;

impl<'de> de::Visitor<'de> for IntegerVisitor {
    type Value = i64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer or a quoted integer")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
        Ok(value)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
        i64::try_from(value).map_err(|_| E::custom(format!("integer {} is out of range", value)))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<i64, E> {
        integral(value).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, text: &str) -> Result<i64, E> {
        let trimmed = text.trim();
        trimmed
            .parse::<i64>()
            .ok()
            .or_else(|| trimmed.parse::<f64>().ok().and_then(|v| integral(v).ok()))
            .ok_or_else(|| E::custom(format!("expected an integer, got '{}'", text)))
    }
}

/// Decodes a constrained integer, quoted or bare.
fn deserialize_choice<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64, Error = String>,
{
    let value = deserializer.deserialize_any(IntegerVisitor)?;
    T::try_from(value).map_err(de::Error::custom)
}

fn integer_choices(values: &[i64]) -> Schema {
    SchemaObject {
        instance_type: Some(InstanceType::Integer.into()),
        enum_values: Some(values.iter().map(|value| (*value).into()).collect()),
        ..Default::default()
    }
    .into()
}

/// Quality score on the 1 (low) to 3 (high) scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "i64")]
pub enum Score {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Score {
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<i64> for Score {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Score::Low),
            2 => Ok(Score::Medium),
            3 => Ok(Score::High),
            other => Err(format!("score must be 1, 2 or 3, got {}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_choice(deserializer)
    }
}

impl From<Score> for i64 {
    fn from(score: Score) -> Self {
        score as i64
    }
}

impl JsonSchema for Score {
    fn schema_name() -> String {
        "Score".to_owned()
    }

    fn is_referenceable() -> bool {
        false
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        integer_choices(&[1, 2, 3])
    }
}

/// Binary judgment: 1 when the checked property holds, 0 otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "i64")]
pub enum Verdict {
    No = 0,
    Yes = 1,
}

impl Verdict {
    pub fn is_yes(self) -> bool {
        self == Verdict::Yes
    }
}

impl TryFrom<i64> for Verdict {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Verdict::No),
            1 => Ok(Verdict::Yes),
            other => Err(format!("verdict must be 0 or 1, got {}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_choice(deserializer)
    }
}

impl From<Verdict> for i64 {
    fn from(verdict: Verdict) -> Self {
        verdict as i64
    }
}

impl JsonSchema for Verdict {
    fn schema_name() -> String {
        "Verdict".to_owned()
    }

    fn is_referenceable() -> bool {
        false
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        integer_choices(&[0, 1])
    }
}

/// Whether the context contains the answer to a question: 1 present, -1 absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "i64")]
pub enum AnswerVerdict {
    Absent = -1,
    Present = 1,
}

impl TryFrom<i64> for AnswerVerdict {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(AnswerVerdict::Absent),
            1 => Ok(AnswerVerdict::Present),
            other => Err(format!("answer verdict must be 1 or -1, got {}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for AnswerVerdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_choice(deserializer)
    }
}

impl From<AnswerVerdict> for i64 {
    fn from(verdict: AnswerVerdict) -> Self {
        verdict as i64
    }
}

impl JsonSchema for AnswerVerdict {
    fn schema_name() -> String {
        "AnswerVerdict".to_owned()
    }

    fn is_referenceable() -> bool {
        false
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        integer_choices(&[-1, 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_score_accepts_quoted_and_bare_integers() {
        assert_eq!(serde_json::from_value::<Score>(json!(3)).unwrap(), Score::High);
        assert_eq!(serde_json::from_value::<Score>(json!("2")).unwrap(), Score::Medium);
        assert_eq!(serde_json::from_value::<Score>(json!(" 1 ")).unwrap(), Score::Low);
    }

    #[test]
    fn test_score_rejects_out_of_range() {
        assert!(serde_json::from_value::<Score>(json!(0)).is_err());
        assert!(serde_json::from_value::<Score>(json!(4)).is_err());
        assert!(serde_json::from_value::<Score>(json!("alto")).is_err());
    }

    #[test]
    fn test_integral_floats_accepted() {
        assert_eq!(serde_json::from_value::<Verdict>(json!(1.0)).unwrap(), Verdict::Yes);
        assert_eq!(serde_json::from_value::<Score>(json!(2.0)).unwrap(), Score::Medium);
        assert_eq!(serde_json::from_value::<Score>(json!("3.0")).unwrap(), Score::High);
        assert_eq!(
            serde_json::from_value::<AnswerVerdict>(json!(-1.0)).unwrap(),
            AnswerVerdict::Absent
        );
    }

    #[test]
    fn test_fractional_values_rejected_with_reason() {
        let err = serde_json::from_value::<Verdict>(json!(0.5)).unwrap_err();
        assert!(err.to_string().contains("expected an integer, got 0.5"), "{}", err);

        let err = serde_json::from_value::<Score>(json!(4.0)).unwrap_err();
        assert!(err.to_string().contains("score must be 1, 2 or 3, got 4"), "{}", err);

        let err = serde_json::from_value::<Score>(json!(true)).unwrap_err();
        assert!(err.to_string().contains("an integer or a quoted integer"), "{}", err);
    }

    #[test]
    fn test_score_serializes_as_integer() {
        assert_eq!(serde_json::to_value(Score::Medium).unwrap(), json!(2));
        assert_eq!(Score::High.value(), 3);
        assert!(Score::Low < Score::High);
    }

    #[test]
    fn test_verdict_range() {
        assert_eq!(serde_json::from_value::<Verdict>(json!("0")).unwrap(), Verdict::No);
        assert_eq!(serde_json::from_value::<Verdict>(json!(1)).unwrap(), Verdict::Yes);
        assert!(serde_json::from_value::<Verdict>(json!(2)).is_err());
        assert!(serde_json::from_value::<Verdict>(json!(-1)).is_err());
        assert!(Verdict::Yes.is_yes());
    }

    #[test]
    fn test_answer_verdict_range() {
        assert_eq!(
            serde_json::from_value::<AnswerVerdict>(json!("-1")).unwrap(),
            AnswerVerdict::Absent
        );
        assert_eq!(
            serde_json::from_value::<AnswerVerdict>(json!(1)).unwrap(),
            AnswerVerdict::Present
        );
        assert!(serde_json::from_value::<AnswerVerdict>(json!(0)).is_err());
    }

    #[test]
    fn test_schema_lists_allowed_values() {
        let schema = serde_json::to_value(schemars::schema_for!(Score)).unwrap();
        assert_eq!(schema["enum"], json!([1, 2, 3]));
        assert_eq!(schema["type"], json!("integer"));
    }
}
