use std::collections::HashMap;

use super::{
    AnswerCalculation, AnswerFrequencies, FrequencyCommonlySubmittedElements,
    Top5AnswerFrequencies,
};
use crate::common::error::{PlatformError, Result};
use crate::domain::{CalculationResult, StateAnswers};

/// Registry of answer calculations, selected by id.
pub struct CalculationRegistry {
    calculations: HashMap<String, Box<dyn AnswerCalculation>>,
}

impl Default for CalculationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculationRegistry {
    /// Create a registry with all built-in calculations registered.
    pub fn new() -> Self {
        let mut registry = Self {
            calculations: HashMap::new(),
        };
        registry.register(Box::new(AnswerFrequencies));
        registry.register(Box::new(Top5AnswerFrequencies));
        registry.register(Box::new(FrequencyCommonlySubmittedElements));
        registry
    }

    pub fn register(&mut self, calculation: Box<dyn AnswerCalculation>) {
        self.calculations
            .insert(calculation.id().to_string(), calculation);
    }

    pub fn get(&self, calculation_id: &str) -> Option<&dyn AnswerCalculation> {
        self.calculations
            .get(calculation_id)
            .map(|calculation| calculation.as_ref())
    }

    /// Run the named calculation over a recorded batch.
    pub fn run(&self, calculation_id: &str, answers: &StateAnswers) -> Result<CalculationResult> {
        let calculation = self.get(calculation_id).ok_or_else(|| {
            PlatformError::Validation(format!(
                "No calculation registered with id '{}'",
                calculation_id
            ))
        })?;
        Ok(calculation.calculate(answers))
    }

    pub fn list_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.calculations.keys().map(|id| id.as_str()).collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnswerValue, SubmittedAnswer};
    use chrono::Utc;

    #[test]
    fn registry_has_built_in_calculations() {
        let registry = CalculationRegistry::new();
        let ids = registry.list_ids();
        assert!(ids.contains(&"AnswerFrequencies"));
        assert!(ids.contains(&"Top5AnswerFrequencies"));
        assert!(ids.contains(&"FrequencyCommonlySubmittedElements"));
    }

    #[test]
    fn registry_returns_error_for_unknown_calculation() {
        let registry = CalculationRegistry::new();
        let batch = StateAnswers {
            exploration_id: "exp1".to_string(),
            exploration_version: 1,
            state_name: "Introduction".to_string(),
            answers: vec![SubmittedAnswer {
                value: AnswerValue::Text("hello".to_string()),
                submitted_at: Utc::now(),
            }],
        };
        assert!(registry.run("NoSuchCalculation", &batch).is_err());
    }

    #[test]
    fn run_tags_result_with_batch_identity() {
        let registry = CalculationRegistry::new();
        let batch = StateAnswers {
            exploration_id: "exp1".to_string(),
            exploration_version: 4,
            state_name: "Quiz".to_string(),
            answers: vec![],
        };
        let result = registry.run("AnswerFrequencies", &batch).unwrap();
        assert_eq!(result.exploration_id, "exp1");
        assert_eq!(result.exploration_version, 4);
        assert_eq!(result.state_name, "Quiz");
        assert_eq!(result.calculation_id, "AnswerFrequencies");
        assert!(result.pairs.is_empty());
    }
}
