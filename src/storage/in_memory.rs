use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::Storage;
use crate::common::error::{PlatformError, Result};
use crate::domain::{
    Exploration, ExplorationRights, ExplorationSummary, RightsSnapshot, SentEmailRecord,
    StateAnswers,
};

/// In-memory storage implementation for development/testing
pub struct InMemoryStorage {
    explorations: Arc<Mutex<HashMap<String, Exploration>>>,
    summaries: Arc<Mutex<HashMap<String, ExplorationSummary>>>,
    rights: Arc<Mutex<HashMap<String, ExplorationRights>>>,
    rights_snapshots: Arc<Mutex<Vec<RightsSnapshot>>>,
    // Keyed by (exploration_id, version, state_name)
    state_answers: Arc<Mutex<HashMap<(String, u32, String), StateAnswers>>>,
    sent_emails: Arc<Mutex<HashMap<Uuid, SentEmailRecord>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            explorations: Arc::new(Mutex::new(HashMap::new())),
            summaries: Arc::new(Mutex::new(HashMap::new())),
            rights: Arc::new(Mutex::new(HashMap::new())),
            rights_snapshots: Arc::new(Mutex::new(Vec::new())),
            state_answers: Arc::new(Mutex::new(HashMap::new())),
            sent_emails: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Seeds an exploration without going through `save_exploration`, so the
    /// stored version is exactly what the fixture carries.
    pub fn seed_exploration(&self, exploration: Exploration) {
        let mut explorations = self.explorations.lock().unwrap();
        explorations.insert(exploration.id.clone(), exploration);
    }

    pub fn seed_rights(&self, rights: ExplorationRights) {
        let mut map = self.rights.lock().unwrap();
        map.insert(rights.exploration_id.clone(), rights);
    }

    pub fn seed_rights_snapshot(&self, snapshot: RightsSnapshot) {
        self.rights_snapshots.lock().unwrap().push(snapshot);
    }

    pub fn seed_state_answers(&self, answers: StateAnswers) {
        let key = (
            answers.exploration_id.clone(),
            answers.exploration_version,
            answers.state_name.clone(),
        );
        self.state_answers.lock().unwrap().insert(key, answers);
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn get_exploration(&self, id: &str) -> Result<Option<Exploration>> {
        let explorations = self.explorations.lock().unwrap();
        Ok(explorations.get(id).cloned())
    }

    async fn list_explorations(&self, include_deleted: bool) -> Result<Vec<Exploration>> {
        let explorations = self.explorations.lock().unwrap();
        let mut all: Vec<Exploration> = explorations
            .values()
            .filter(|exp| include_deleted || !exp.deleted)
            .cloned()
            .collect();
        // Sort by id for consistent processing order
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    async fn save_exploration(
        &self,
        exploration: &Exploration,
        committer_id: &str,
        commit_message: &str,
    ) -> Result<()> {
        let mut explorations = self.explorations.lock().unwrap();
        let mut updated = exploration.clone();
        updated.version += 1;
        updated.last_updated = Utc::now();
        explorations.insert(updated.id.clone(), updated);

        debug!(
            "Saved exploration {} (committer: {}): {}",
            exploration.id, committer_id, commit_message
        );
        Ok(())
    }

    async fn upsert_summary(&self, summary: &ExplorationSummary) -> Result<()> {
        let mut summaries = self.summaries.lock().unwrap();
        summaries.insert(summary.id.clone(), summary.clone());

        debug!("Upserted summary for exploration {}", summary.id);
        Ok(())
    }

    async fn get_summary(&self, id: &str) -> Result<Option<ExplorationSummary>> {
        let summaries = self.summaries.lock().unwrap();
        Ok(summaries.get(id).cloned())
    }

    async fn get_rights(&self, exploration_id: &str) -> Result<Option<ExplorationRights>> {
        let rights = self.rights.lock().unwrap();
        Ok(rights.get(exploration_id).cloned())
    }

    async fn save_rights(&self, rights: &ExplorationRights) -> Result<()> {
        let mut map = self.rights.lock().unwrap();
        map.insert(rights.exploration_id.clone(), rights.clone());

        debug!("Saved rights for exploration {}", rights.exploration_id);
        Ok(())
    }

    async fn list_rights_snapshots(&self) -> Result<Vec<RightsSnapshot>> {
        let snapshots = self.rights_snapshots.lock().unwrap();
        Ok(snapshots.clone())
    }

    async fn set_first_published_msec(&self, exploration_id: &str, msec: i64) -> Result<()> {
        let mut map = self.rights.lock().unwrap();
        let rights = map.get_mut(exploration_id).ok_or_else(|| {
            PlatformError::Storage(format!(
                "No rights record for exploration {}",
                exploration_id
            ))
        })?;
        match rights.first_published_msec {
            Some(existing) if existing <= msec => {
                debug!(
                    "Kept earlier first-published time for exploration {}",
                    exploration_id
                );
            }
            _ => {
                rights.first_published_msec = Some(msec);
                debug!(
                    "Set first-published time for exploration {} to {}",
                    exploration_id, msec
                );
            }
        }
        Ok(())
    }

    async fn get_state_answers(
        &self,
        exploration_id: &str,
        exploration_version: u32,
        state_name: &str,
    ) -> Result<Option<StateAnswers>> {
        let answers = self.state_answers.lock().unwrap();
        let key = (
            exploration_id.to_string(),
            exploration_version,
            state_name.to_string(),
        );
        Ok(answers.get(&key).cloned())
    }

    async fn record_sent_email(&self, record: &SentEmailRecord) -> Result<()> {
        // Single locked insert; atomic by construction for this adapter
        let mut sent = self.sent_emails.lock().unwrap();
        sent.insert(record.id, record.clone());

        debug!(
            "Recorded sent email {} to {} (intent: {})",
            record.id, record.recipient_email, record.intent
        );
        Ok(())
    }

    async fn list_sent_emails(&self) -> Result<Vec<SentEmailRecord>> {
        let sent = self.sent_emails.lock().unwrap();
        let mut all: Vec<SentEmailRecord> = sent.values().cloned().collect();
        all.sort_by_key(|record| record.sent_at);
        Ok(all)
    }
}
