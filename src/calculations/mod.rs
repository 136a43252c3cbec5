//! Calculations performed on recorded state answers.
//!
//! Each calculation is a pure reduction of one [`StateAnswers`] batch into a
//! [`CalculationResult`]. Variants are selected by id at configuration time
//! through the [`CalculationRegistry`]; visualization config names the
//! calculation backing each chart.

use std::collections::HashMap;

use crate::common::constants::{TOP_ANSWER_LIMIT, TOP_ELEMENT_LIMIT};
use crate::domain::{AnswerFrequencyPair, AnswerValue, CalculationResult, StateAnswers};

mod registry;

pub use registry::CalculationRegistry;

/// A pure reduction of a recorded answer batch into a frequency summary.
pub trait AnswerCalculation: Send + Sync {
    fn id(&self) -> &'static str;

    fn calculate(&self, answers: &StateAnswers) -> CalculationResult;
}

/// Counts occurrences of each value, preserving first-seen order.
fn count_first_seen<I>(values: I) -> Vec<AnswerFrequencyPair>
where
    I: IntoIterator<Item = String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut pairs: Vec<AnswerFrequencyPair> = Vec::new();
    for value in values {
        match index.get(&value) {
            Some(&at) => pairs[at].frequency += 1,
            None => {
                index.insert(value.clone(), pairs.len());
                pairs.push(AnswerFrequencyPair {
                    answer: value,
                    frequency: 1,
                });
            }
        }
    }
    pairs
}

/// Orders pairs by descending frequency and keeps the first `limit`.
///
/// The sort is stable, so equal counts keep their first-seen order.
fn truncate_to_top(mut pairs: Vec<AnswerFrequencyPair>, limit: usize) -> Vec<AnswerFrequencyPair> {
    pairs.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    pairs.truncate(limit);
    pairs
}

fn result_for(
    answers: &StateAnswers,
    calculation_id: &str,
    pairs: Vec<AnswerFrequencyPair>,
) -> CalculationResult {
    crate::observability::metrics::calculations::run(calculation_id);
    crate::observability::metrics::calculations::batch_size(answers.answers.len());
    CalculationResult {
        exploration_id: answers.exploration_id.clone(),
        exploration_version: answers.exploration_version,
        state_name: answers.state_name.clone(),
        calculation_id: calculation_id.to_string(),
        pairs,
    }
}

/// How often each distinct answer was submitted. No truncation.
pub struct AnswerFrequencies;

impl AnswerCalculation for AnswerFrequencies {
    fn id(&self) -> &'static str {
        "AnswerFrequencies"
    }

    fn calculate(&self, answers: &StateAnswers) -> CalculationResult {
        let pairs = count_first_seen(
            answers
                .answers
                .iter()
                .map(|submitted| submitted.value.to_string()),
        );
        result_for(answers, self.id(), pairs)
    }
}

/// The five most frequently submitted answers.
pub struct Top5AnswerFrequencies;

impl AnswerCalculation for Top5AnswerFrequencies {
    fn id(&self) -> &'static str {
        "Top5AnswerFrequencies"
    }

    fn calculate(&self, answers: &StateAnswers) -> CalculationResult {
        let counts = count_first_seen(
            answers
                .answers
                .iter()
                .map(|submitted| submitted.value.to_string()),
        );
        let pairs = truncate_to_top(counts, TOP_ANSWER_LIMIT);
        result_for(answers, self.id(), pairs)
    }
}

/// The ten most common individual elements across multi-valued answers.
///
/// Set answers contribute each of their elements; a plain text answer
/// contributes itself as a single element.
pub struct FrequencyCommonlySubmittedElements;

impl AnswerCalculation for FrequencyCommonlySubmittedElements {
    fn id(&self) -> &'static str {
        "FrequencyCommonlySubmittedElements"
    }

    fn calculate(&self, answers: &StateAnswers) -> CalculationResult {
        let elements = answers
            .answers
            .iter()
            .flat_map(|submitted| match &submitted.value {
                AnswerValue::Text(text) => vec![text.clone()],
                AnswerValue::Set(elements) => elements.clone(),
            });
        let pairs = truncate_to_top(count_first_seen(elements), TOP_ELEMENT_LIMIT);
        result_for(answers, self.id(), pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SubmittedAnswer;
    use chrono::Utc;

    fn batch_of_texts(values: &[&str]) -> StateAnswers {
        StateAnswers {
            exploration_id: "exp1".to_string(),
            exploration_version: 2,
            state_name: "Introduction".to_string(),
            answers: values
                .iter()
                .map(|value| SubmittedAnswer {
                    value: AnswerValue::Text(value.to_string()),
                    submitted_at: Utc::now(),
                })
                .collect(),
        }
    }

    fn pairs_of(result: &CalculationResult) -> Vec<(String, u64)> {
        result
            .pairs
            .iter()
            .map(|pair| (pair.answer.clone(), pair.frequency))
            .collect()
    }

    #[test]
    fn frequencies_sum_to_batch_size() {
        let batch = batch_of_texts(&["a", "b", "a", "c", "a", "b"]);
        let result = AnswerFrequencies.calculate(&batch);
        assert_eq!(result.total_frequency(), batch.answers.len() as u64);
    }

    #[test]
    fn frequencies_keep_first_seen_order() {
        let batch = batch_of_texts(&["b", "a", "b", "c"]);
        let result = AnswerFrequencies.calculate(&batch);
        assert_eq!(
            pairs_of(&result),
            vec![
                ("b".to_string(), 2),
                ("a".to_string(), 1),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn top5_truncates_and_breaks_ties_by_first_seen_order() {
        let batch = batch_of_texts(&["a", "a", "a", "b", "b", "c", "d", "e", "f"]);
        let result = Top5AnswerFrequencies.calculate(&batch);
        assert_eq!(
            pairs_of(&result),
            vec![
                ("a".to_string(), 3),
                ("b".to_string(), 2),
                ("c".to_string(), 1),
                ("d".to_string(), 1),
                ("e".to_string(), 1)
            ]
        );
    }

    #[test]
    fn common_elements_counts_across_sets() {
        let mut batch = batch_of_texts(&[]);
        for elements in [
            vec!["abc", "www"],
            vec!["abc"],
            vec!["xyz"],
            vec!["xyz", "abc"],
        ] {
            batch.answers.push(SubmittedAnswer {
                value: AnswerValue::Set(elements.into_iter().map(String::from).collect()),
                submitted_at: Utc::now(),
            });
        }
        let result = FrequencyCommonlySubmittedElements.calculate(&batch);
        assert_eq!(
            pairs_of(&result),
            vec![
                ("abc".to_string(), 3),
                ("xyz".to_string(), 2),
                ("www".to_string(), 1)
            ]
        );
    }

    #[test]
    fn common_elements_handles_separator_lookalikes() {
        // Elements containing commas or brackets stay intact because answers
        // are stored structurally, not as stringified sets.
        let mut batch = batch_of_texts(&[]);
        batch.answers.push(SubmittedAnswer {
            value: AnswerValue::Set(vec!["a, b".to_string(), "[c]".to_string()]),
            submitted_at: Utc::now(),
        });
        let result = FrequencyCommonlySubmittedElements.calculate(&batch);
        assert_eq!(
            pairs_of(&result),
            vec![("a, b".to_string(), 1), ("[c]".to_string(), 1)]
        );
    }

    #[test]
    fn common_elements_truncates_to_ten() {
        let mut batch = batch_of_texts(&[]);
        let elements: Vec<String> = (0..15).map(|n| format!("element{n}")).collect();
        batch.answers.push(SubmittedAnswer {
            value: AnswerValue::Set(elements),
            submitted_at: Utc::now(),
        });
        let result = FrequencyCommonlySubmittedElements.calculate(&batch);
        assert_eq!(result.pairs.len(), 10);
    }
}
