use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;

use trailguide::calculations::CalculationRegistry;
use trailguide::domain::{AnswerValue, StateAnswers, SubmittedAnswer};
use trailguide::storage::{InMemoryStorage, Storage};

fn answers(values: Vec<AnswerValue>) -> StateAnswers {
    StateAnswers {
        exploration_id: "exp1".to_string(),
        exploration_version: 3,
        state_name: "Quiz".to_string(),
        answers: values
            .into_iter()
            .map(|value| SubmittedAnswer {
                value,
                submitted_at: Utc::now(),
            })
            .collect(),
    }
}

fn texts(values: &[&str]) -> Vec<AnswerValue> {
    values
        .iter()
        .map(|value| AnswerValue::Text(value.to_string()))
        .collect()
}

#[tokio::test]
async fn calculations_run_over_stored_answer_batches() -> Result<()> {
    let storage = Arc::new(InMemoryStorage::new());
    storage.seed_state_answers(answers(texts(&["a", "a", "a", "b", "b", "c", "d", "e", "f"])));

    let batch = storage
        .get_state_answers("exp1", 3, "Quiz")
        .await?
        .expect("seeded batch");

    let registry = CalculationRegistry::new();
    let result = registry.run("Top5AnswerFrequencies", &batch)?;

    let pairs: Vec<(&str, u64)> = result
        .pairs
        .iter()
        .map(|pair| (pair.answer.as_str(), pair.frequency))
        .collect();
    assert_eq!(
        pairs,
        vec![("a", 3), ("b", 2), ("c", 1), ("d", 1), ("e", 1)]
    );
    Ok(())
}

#[tokio::test]
async fn frequency_totals_match_batch_size_for_every_variant_input() -> Result<()> {
    let registry = CalculationRegistry::new();
    let batch = answers(texts(&["x", "y", "x", "z", "x", "y", "w"]));

    let result = registry.run("AnswerFrequencies", &batch)?;
    assert_eq!(result.total_frequency(), batch.answers.len() as u64);
    Ok(())
}

#[tokio::test]
async fn common_elements_reads_set_answers_structurally() -> Result<()> {
    let registry = CalculationRegistry::new();
    let batch = answers(vec![
        AnswerValue::Set(vec!["red".to_string(), "blue".to_string()]),
        AnswerValue::Set(vec!["red".to_string()]),
        AnswerValue::Text("green, with comma".to_string()),
    ]);

    let result = registry.run("FrequencyCommonlySubmittedElements", &batch)?;
    let pairs: Vec<(&str, u64)> = result
        .pairs
        .iter()
        .map(|pair| (pair.answer.as_str(), pair.frequency))
        .collect();
    assert_eq!(
        pairs,
        vec![("red", 2), ("blue", 1), ("green, with comma", 1)]
    );
    Ok(())
}
