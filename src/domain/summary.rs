use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::exploration::Exploration;
use super::rights::{ActivityStatus, ExplorationRights};

/// Denormalized projection of an exploration and its rights, regenerated by
/// the summaries job and consumed by gallery views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorationSummary {
    pub id: String,
    pub title: String,
    pub category: String,
    pub objective: String,
    pub language_code: String,
    pub tags: Vec<String>,
    pub status: ActivityStatus,
    pub community_owned: bool,
    pub owner_ids: Vec<String>,
    pub editor_ids: Vec<String>,
    pub viewer_ids: Vec<String>,
    pub version: u32,
    pub exploration_created_on: DateTime<Utc>,
    pub exploration_last_updated: DateTime<Utc>,
}

impl ExplorationSummary {
    pub fn from_exploration(exploration: &Exploration, rights: &ExplorationRights) -> Self {
        Self {
            id: exploration.id.clone(),
            title: exploration.title.clone(),
            category: exploration.category.clone(),
            objective: exploration.objective.clone(),
            language_code: exploration.language_code.clone(),
            tags: exploration.tags.clone(),
            status: rights.status,
            community_owned: rights.community_owned,
            owner_ids: rights.owner_ids.clone(),
            editor_ids: rights.editor_ids.clone(),
            viewer_ids: rights.viewer_ids.clone(),
            version: exploration.version,
            exploration_created_on: exploration.created_on,
            exploration_last_updated: exploration.last_updated,
        }
    }
}
