use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication status of an exploration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Private,
    Public,
    /// Featured by a moderator; implies public visibility
    Publicized,
}

impl ActivityStatus {
    pub fn is_publicly_visible(&self) -> bool {
        matches!(self, ActivityStatus::Public | ActivityStatus::Publicized)
    }
}

/// Access-control record for one exploration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorationRights {
    pub exploration_id: String,
    pub status: ActivityStatus,
    #[serde(default)]
    pub owner_ids: Vec<String>,
    #[serde(default)]
    pub editor_ids: Vec<String>,
    #[serde(default)]
    pub viewer_ids: Vec<String>,
    #[serde(default)]
    pub community_owned: bool,
    /// Millisecond timestamp of the first transition to public status,
    /// backfilled by the first-published job
    pub first_published_msec: Option<i64>,
}

/// Immutable audit entry recording the rights state at one version.
///
/// Snapshot ids follow the `<exploration_id>-<version>` convention of the
/// datastore's snapshot models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RightsSnapshot {
    pub snapshot_id: String,
    pub status: ActivityStatus,
    pub created_on: DateTime<Utc>,
}

impl RightsSnapshot {
    /// The exploration id encoded in the snapshot id.
    pub fn exploration_id(&self) -> &str {
        match self.snapshot_id.rsplit_once('-') {
            Some((id, _version)) => id,
            None => &self.snapshot_id,
        }
    }
}
