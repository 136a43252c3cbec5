use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::constants::CURRENT_STATES_SCHEMA_VERSION;
use crate::common::error::{PlatformError, Result};

/// Language codes the platform accepts for exploration content.
pub const SUPPORTED_LANGUAGE_CODES: &[&str] = &["en", "es", "fr", "de", "pt"];

/// A single named state (card) within an exploration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    /// Rendered HTML content shown to the learner
    pub content: String,
    /// Id of the interaction widget attached to this state, if any
    pub interaction_id: Option<String>,
}

/// A versioned, stateful lesson. The core content entity of the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exploration {
    pub id: String,
    pub title: String,
    pub category: String,
    pub objective: String,
    pub language_code: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Schema version of the states map; upgraded by the migration job
    pub states_schema_version: u32,
    pub init_state_name: String,
    pub states: BTreeMap<String, State>,
    /// Datastore entity version, bumped on every persisted update
    pub version: u32,
    #[serde(default)]
    pub deleted: bool,
    pub created_on: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Exploration {
    /// Checks structural integrity of the exploration.
    ///
    /// Lenient validation covers invariants that must hold for any stored
    /// exploration. Strict validation adds publication-readiness checks and
    /// is applied to public explorations.
    pub fn validate(&self, strict: bool) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(PlatformError::Validation(format!(
                "Exploration {} has no title",
                self.id
            )));
        }
        if self.states.is_empty() {
            return Err(PlatformError::Validation(format!(
                "Exploration {} has no states",
                self.id
            )));
        }
        if !self.states.contains_key(&self.init_state_name) {
            return Err(PlatformError::Validation(format!(
                "Exploration {} has initial state '{}' which is not in its states map",
                self.id, self.init_state_name
            )));
        }
        if !SUPPORTED_LANGUAGE_CODES.contains(&self.language_code.as_str()) {
            return Err(PlatformError::Validation(format!(
                "Exploration {} has unsupported language code '{}'",
                self.id, self.language_code
            )));
        }

        if strict {
            if self.objective.trim().is_empty() {
                return Err(PlatformError::Validation(format!(
                    "Exploration {} must have an objective before publication",
                    self.id
                )));
            }
            if self.category.trim().is_empty() {
                return Err(PlatformError::Validation(format!(
                    "Exploration {} must have a category before publication",
                    self.id
                )));
            }
            for (state_name, state) in &self.states {
                if state.interaction_id.is_none() {
                    return Err(PlatformError::Validation(format!(
                        "State '{}' of exploration {} has no interaction",
                        state_name, self.id
                    )));
                }
            }
        }

        Ok(())
    }

    /// Whether the states map is behind the current schema version.
    pub fn needs_states_schema_migration(&self) -> bool {
        self.states_schema_version < CURRENT_STATES_SCHEMA_VERSION
    }

    /// Upgrades the states map, one schema version at a time, until it is at
    /// `CURRENT_STATES_SCHEMA_VERSION`. Already-current explorations are left
    /// untouched.
    pub fn migrate_states_schema_to_latest(&mut self) -> Result<()> {
        while self.states_schema_version < CURRENT_STATES_SCHEMA_VERSION {
            match self.states_schema_version {
                1 => self.upgrade_states_v1_to_v2(),
                2 => self.upgrade_states_v2_to_v3(),
                other => {
                    return Err(PlatformError::Validation(format!(
                        "Exploration {} has unknown states schema version {}",
                        self.id, other
                    )));
                }
            }
            self.states_schema_version += 1;
        }
        Ok(())
    }

    // v2 dropped the deprecated per-state widget customizations. Entities
    // loaded through the current model carry nothing to rewrite; the bump
    // itself is the migration.
    fn upgrade_states_v1_to_v2(&mut self) {}

    // v3 normalized the absent-interaction representation to None.
    fn upgrade_states_v2_to_v3(&mut self) {
        for state in self.states.values_mut() {
            if matches!(state.interaction_id.as_deref(), Some("")) {
                state.interaction_id = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_exploration() -> Exploration {
        let mut states = BTreeMap::new();
        states.insert(
            "Introduction".to_string(),
            State {
                content: "<p>Welcome.</p>".to_string(),
                interaction_id: Some("TextInput".to_string()),
            },
        );
        Exploration {
            id: "exp1".to_string(),
            title: "Fractions".to_string(),
            category: "Math".to_string(),
            objective: "Learn fractions".to_string(),
            language_code: "en".to_string(),
            tags: vec![],
            states_schema_version: CURRENT_STATES_SCHEMA_VERSION,
            init_state_name: "Introduction".to_string(),
            states,
            version: 1,
            deleted: false,
            created_on: Utc::now(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn valid_exploration_passes_both_modes() {
        let exp = sample_exploration();
        assert!(exp.validate(false).is_ok());
        assert!(exp.validate(true).is_ok());
    }

    #[test]
    fn missing_init_state_fails_lenient_validation() {
        let mut exp = sample_exploration();
        exp.init_state_name = "Nonexistent".to_string();
        assert!(exp.validate(false).is_err());
    }

    #[test]
    fn missing_objective_fails_only_strict_validation() {
        let mut exp = sample_exploration();
        exp.objective = String::new();
        assert!(exp.validate(false).is_ok());
        assert!(exp.validate(true).is_err());
    }

    #[test]
    fn migration_upgrades_to_current_version() {
        let mut exp = sample_exploration();
        exp.states_schema_version = 1;
        exp.migrate_states_schema_to_latest().unwrap();
        assert_eq!(exp.states_schema_version, CURRENT_STATES_SCHEMA_VERSION);
    }

    #[test]
    fn migration_normalizes_empty_interaction_id() {
        let mut exp = sample_exploration();
        exp.states_schema_version = 2;
        exp.states.get_mut("Introduction").unwrap().interaction_id = Some(String::new());
        exp.migrate_states_schema_to_latest().unwrap();
        assert!(exp.states["Introduction"].interaction_id.is_none());
    }
}
