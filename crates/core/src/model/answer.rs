use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::schema::{QuestionKind, SurveySchema};

/// Separator for flattened multi-select answers. Labels are not escaped.
pub const MULTI_SELECT_DELIMITER: &str = "; ";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("likert score must be between 1 and 5, got {0}")]
    LikertOutOfRange(u8),
    #[error("unknown question: {0}")]
    UnknownQuestion(String),
    #[error("question {key} expects a {expected} answer")]
    KindMismatch { key: String, expected: &'static str },
    #[error("{option:?} is not an option of {key}")]
    UnknownOption { key: String, option: String },
}

//
// ─── LIKERT ───────────────────────────────────────────────────────────────────
//

/// Agreement score on the 1 (strongly disagree) to 5 (strongly agree) scale.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LikertScore(u8);

impl LikertScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// # Errors
    ///
    /// Returns `AnswerError::LikertOutOfRange` outside 1–5.
    pub fn new(value: u8) -> Result<Self, AnswerError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AnswerError::LikertOutOfRange(value))
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Every score on the scale, lowest first.
    pub fn scale() -> impl Iterator<Item = LikertScore> {
        (Self::MIN..=Self::MAX).map(LikertScore)
    }
}

impl TryFrom<u8> for LikertScore {
    type Error = AnswerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LikertScore> for u8 {
    fn from(score: LikertScore) -> Self {
        score.0
    }
}

impl fmt::Debug for LikertScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LikertScore({})", self.0)
    }
}

impl fmt::Display for LikertScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── ANSWER VALUE ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValue {
    Likert(LikertScore),
    Choice(String),
    Selection(Vec<String>),
    Text(String),
}

impl AnswerValue {
    /// Convenience for selections built from string literals.
    #[must_use]
    pub fn selection<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Selection(labels.into_iter().map(Into::into).collect())
    }

    /// Single-cell representation used in the persisted record.
    #[must_use]
    pub fn flatten(&self) -> String {
        match self {
            AnswerValue::Likert(score) => score.to_string(),
            AnswerValue::Choice(label) | AnswerValue::Text(label) => label.clone(),
            AnswerValue::Selection(labels) => labels.join(MULTI_SELECT_DELIMITER),
        }
    }

    fn fits(&self, kind: QuestionKind) -> bool {
        matches!(
            (self, kind),
            (AnswerValue::Likert(_), QuestionKind::Likert)
                | (AnswerValue::Choice(_), QuestionKind::SingleChoice(_))
                | (AnswerValue::Selection(_), QuestionKind::MultiChoice(_))
                | (AnswerValue::Text(_), QuestionKind::FreeText)
        )
    }
}

//
// ─── ANSWER SET ───────────────────────────────────────────────────────────────
//

/// In-progress answers for the image currently on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    values: BTreeMap<&'static str, AnswerValue>,
}

impl AnswerSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite the answer for `key`.
    ///
    /// Selections are reordered into the schema's option order and
    /// de-duplicated, so flattening does not depend on click order.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError` if the key is not in the schema, the value does
    /// not match the question kind, or a choice label is not an option.
    pub fn set(
        &mut self,
        schema: &SurveySchema,
        key: &str,
        value: AnswerValue,
    ) -> Result<(), AnswerError> {
        let question = schema
            .question(key)
            .ok_or_else(|| AnswerError::UnknownQuestion(key.to_owned()))?;

        if !value.fits(question.kind) {
            return Err(AnswerError::KindMismatch {
                key: key.to_owned(),
                expected: question.kind.name(),
            });
        }

        let options = question.kind.options();
        let value = match value {
            AnswerValue::Choice(label) => {
                ensure_option(key, options, &label)?;
                AnswerValue::Choice(label)
            }
            AnswerValue::Selection(labels) => {
                for label in &labels {
                    ensure_option(key, options, label)?;
                }
                let canonical = options
                    .iter()
                    .filter(|option| labels.iter().any(|label| label == *option))
                    .map(|option| (*option).to_owned())
                    .collect();
                AnswerValue::Selection(canonical)
            }
            other => other,
        };

        self.values.insert(question.key, value);
        Ok(())
    }

    /// Drop the answer for `key`, if any.
    pub fn unset(&mut self, key: &str) -> Option<AnswerValue> {
        self.values.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.values.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Flattened cell for `key`; empty when unanswered.
    #[must_use]
    pub fn flattened(&self, key: &str) -> String {
        self.values.get(key).map(AnswerValue::flatten).unwrap_or_default()
    }
}

fn ensure_option(key: &str, options: &[&str], label: &str) -> Result<(), AnswerError> {
    if options.contains(&label) {
        Ok(())
    } else {
        Err(AnswerError::UnknownOption {
            key: key.to_owned(),
            option: label.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn likert_range_is_enforced() {
        assert_eq!(LikertScore::new(1).unwrap().value(), 1);
        assert_eq!(LikertScore::new(5).unwrap().value(), 5);
        assert_eq!(LikertScore::new(0), Err(AnswerError::LikertOutOfRange(0)));
        assert_eq!(LikertScore::new(6), Err(AnswerError::LikertOutOfRange(6)));
        assert_eq!(LikertScore::scale().count(), 5);
    }

    #[test]
    fn selection_flattens_in_option_order() {
        let schema = SurveySchema::panoramic();
        let mut answers = AnswerSet::new();
        answers
            .set(
                &schema,
                "aspects_better",
                AnswerValue::selection(["Contrast", "Sharpness", "Contrast"]),
            )
            .unwrap();
        assert_eq!(answers.flattened("aspects_better"), "Sharpness; Contrast");
    }

    #[test]
    fn set_overwrites_previous_value() {
        let schema = SurveySchema::panoramic();
        let mut answers = AnswerSet::new();
        let four = AnswerValue::Likert(LikertScore::new(4).unwrap());
        let two = AnswerValue::Likert(LikertScore::new(2).unwrap());
        answers.set(&schema, "q1_realistic", four).unwrap();
        answers.set(&schema, "q1_realistic", two).unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.flattened("q1_realistic"), "2");
    }

    #[test]
    fn rejects_unknown_keys_kinds_and_options() {
        let schema = SurveySchema::panoramic();
        let mut answers = AnswerSet::new();

        let err = answers
            .set(&schema, "q99", AnswerValue::Text("x".into()))
            .unwrap_err();
        assert!(matches!(err, AnswerError::UnknownQuestion(_)));

        let err = answers
            .set(&schema, "q1_realistic", AnswerValue::Text("x".into()))
            .unwrap_err();
        assert!(matches!(err, AnswerError::KindMismatch { expected: "likert", .. }));

        let err = answers
            .set(
                &schema,
                "comparative_quality",
                AnswerValue::Choice("Amazing".into()),
            )
            .unwrap_err();
        assert!(matches!(err, AnswerError::UnknownOption { .. }));
        assert!(answers.is_empty());
    }

    #[test]
    fn unanswered_flattens_to_empty_cell() {
        let answers = AnswerSet::new();
        assert_eq!(answers.flattened("strengths"), "");
    }
}
