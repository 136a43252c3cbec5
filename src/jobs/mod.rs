//! Batch maintenance jobs over stored explorations.
//!
//! Each job is a stateless transformation run once per qualifying entity.
//! Scheduling, parallelism, and retries belong to the external job-execution
//! service; these functions only define the per-entity work and the
//! reduction, and report what they did.

pub mod exploration_jobs;

use std::sync::Arc;

use crate::app::ports::SearchIndexPort;
use crate::storage::Storage;

pub use exploration_jobs::{
    audit_validity, backfill_first_published, index_explorations, migrate_schemas,
    regenerate_summaries, FirstPublishedReport, IndexJobReport, MigrationJobReport,
    SummaryJobReport, ValidationAuditReport,
};

/// Shared handles a job needs to do its work.
#[derive(Clone)]
pub struct JobContext {
    pub storage: Arc<dyn Storage>,
    pub search: Arc<dyn SearchIndexPort>,
}

impl JobContext {
    pub fn new(storage: Arc<dyn Storage>, search: Arc<dyn SearchIndexPort>) -> Self {
        Self { storage, search }
    }
}
