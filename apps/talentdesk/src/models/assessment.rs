use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::store::repository::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerKey {
    #[default]
    A,
    B,
    C,
    D,
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            AnswerKey::A => "A",
            AnswerKey::B => "B",
            AnswerKey::C => "C",
            AnswerKey::D => "D",
        };
        f.write_str(key)
    }
}

impl FromStr for AnswerKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(AnswerKey::A),
            "B" => Ok(AnswerKey::B),
            "C" => Ok(AnswerKey::C),
            "D" => Ok(AnswerKey::D),
            other => Err(format!("Correct answer must be one of A, B, C, D (got '{other}')")),
        }
    }
}

/// The four choices. Field names on the wire match what the question editor has always written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOptions {
    #[serde(rename = "optionA")]
    pub a: String,
    #[serde(rename = "optionB")]
    pub b: String,
    #[serde(rename = "optionC")]
    pub c: String,
    #[serde(rename = "optionD")]
    pub d: String,
}

impl AnswerOptions {
    pub fn new(
        a: impl Into<String>,
        b: impl Into<String>,
        c: impl Into<String>,
        d: impl Into<String>,
    ) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            c: c.into(),
            d: d.into(),
        }
    }

    pub fn get(&self, key: AnswerKey) -> &str {
        match key {
            AnswerKey::A => &self.a,
            AnswerKey::B => &self.b,
            AnswerKey::C => &self.c,
            AnswerKey::D => &self.d,
        }
    }

    fn trimmed(&self) -> Self {
        Self::new(self.a.trim(), self.b.trim(), self.c.trim(), self.d.trim())
    }
}

pub fn new_question_id() -> String {
    Uuid::new_v4().to_string()
}

/// Stored answers are read leniently: the legacy editor saved `""` when no
/// answer was picked, and such a record must not make the whole list unreadable.
/// Blank or unknown values load as `None` and are written back as `""`.
mod lenient_answer {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<AnswerKey>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(key) => serializer.collect_str(key),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<AnswerKey>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|r| r.parse().ok()))
    }
}

/// One multiple-choice question in a job's ordered question list.
///
/// `id` is stable across reorderings; position in the list is the display order.
/// Questions written by the legacy editor have no id and load with an empty one;
/// [`crate::questions`] assigns and persists ids before handing any out. Empty
/// ids are not serialized, so an untouched legacy list round-trips byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentQuestion {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub question: String,
    pub options: AnswerOptions,
    #[serde(default, with = "lenient_answer")]
    pub correct_answer: Option<AnswerKey>,
}

impl Record for AssessmentQuestion {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Editor input for creating or replacing a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub question: String,
    pub options: AnswerOptions,
    pub correct_answer: AnswerKey,
}

impl QuestionDraft {
    pub fn new(question: impl Into<String>, options: AnswerOptions, correct_answer: AnswerKey) -> Self {
        Self {
            question: question.into(),
            options,
            correct_answer,
        }
    }

    /// Trims every text field.
    pub fn trimmed(&self) -> Self {
        Self {
            question: self.question.trim().to_string(),
            options: self.options.trimmed(),
            correct_answer: self.correct_answer,
        }
    }

    pub fn into_question(self, id: String) -> AssessmentQuestion {
        AssessmentQuestion {
            id,
            question: self.question,
            options: self.options,
            correct_answer: Some(self.correct_answer),
        }
    }
}

/// A question saved without an answer opens in the editor with `A` preselected.
impl From<&AssessmentQuestion> for QuestionDraft {
    fn from(q: &AssessmentQuestion) -> Self {
        Self {
            question: q.question.clone(),
            options: q.options.clone(),
            correct_answer: q.correct_answer.unwrap_or_default(),
        }
    }
}
