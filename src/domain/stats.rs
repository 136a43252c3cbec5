use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded answer value.
///
/// Multi-valued answers (e.g. set-of-strings interactions) are stored
/// structurally rather than as stringified collections, so element-level
/// calculations never have to re-parse serialized text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerValue {
    Text(String),
    Set(Vec<String>),
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Text(s) => write!(f, "{}", s),
            AnswerValue::Set(elements) => write!(f, "[{}]", elements.join(", ")),
        }
    }
}

/// One submitted answer within a recorded batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub value: AnswerValue,
    pub submitted_at: DateTime<Utc>,
}

/// The ordered batch of answers recorded for one state of one exploration
/// version. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateAnswers {
    pub exploration_id: String,
    pub exploration_version: u32,
    pub state_name: String,
    pub answers: Vec<SubmittedAnswer>,
}

/// One (label, count) pair in a calculation output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerFrequencyPair {
    pub answer: String,
    pub frequency: u64,
}

/// Output of one answer calculation over one recorded batch. Produced fresh
/// on every run and handed to the presentation layer; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResult {
    pub exploration_id: String,
    pub exploration_version: u32,
    pub state_name: String,
    pub calculation_id: String,
    pub pairs: Vec<AnswerFrequencyPair>,
}

impl CalculationResult {
    pub fn total_frequency(&self) -> u64 {
        self.pairs.iter().map(|pair| pair.frequency).sum()
    }
}
