use async_trait::async_trait;

use crate::common::error::Result;
use crate::domain::{
    Exploration, ExplorationRights, ExplorationSummary, RightsSnapshot, SentEmailRecord,
    StateAnswers,
};

mod in_memory;

pub use in_memory::InMemoryStorage;

/// Persistence boundary for the backend.
///
/// The production adapter sits on the managed datastore; the in-memory
/// adapter backs development and tests.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_exploration(&self, id: &str) -> Result<Option<Exploration>>;

    async fn list_explorations(&self, include_deleted: bool) -> Result<Vec<Exploration>>;

    /// Persists an updated exploration, bumping its entity version and
    /// recording the committer and commit message.
    async fn save_exploration(
        &self,
        exploration: &Exploration,
        committer_id: &str,
        commit_message: &str,
    ) -> Result<()>;

    async fn upsert_summary(&self, summary: &ExplorationSummary) -> Result<()>;

    async fn get_summary(&self, id: &str) -> Result<Option<ExplorationSummary>>;

    async fn get_rights(&self, exploration_id: &str) -> Result<Option<ExplorationRights>>;

    async fn save_rights(&self, rights: &ExplorationRights) -> Result<()>;

    async fn list_rights_snapshots(&self) -> Result<Vec<RightsSnapshot>>;

    /// Records the first-published time for an exploration. Only ever lowers
    /// an existing value, so backfill re-runs are idempotent.
    async fn set_first_published_msec(&self, exploration_id: &str, msec: i64) -> Result<()>;

    async fn get_state_answers(
        &self,
        exploration_id: &str,
        exploration_version: u32,
        state_name: &str,
    ) -> Result<Option<StateAnswers>>;

    /// Writes the audit record for a successfully sent email.
    ///
    /// This is the transactional boundary of the send-and-record operation:
    /// adapters must apply it atomically. The mail call itself happens before
    /// this write, so delivery is at-least-once relative to the record.
    async fn record_sent_email(&self, record: &SentEmailRecord) -> Result<()>;

    async fn list_sent_emails(&self) -> Result<Vec<SentEmailRecord>>;
}
