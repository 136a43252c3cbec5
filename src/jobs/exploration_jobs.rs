use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};

use super::JobContext;
use crate::common::constants::{CURRENT_STATES_SCHEMA_VERSION, MIGRATION_BOT_USERNAME};
use crate::common::error::Result;
use crate::domain::{ActivityStatus, ExplorationSummary};
use crate::observability::metrics::jobs as job_metrics;

#[derive(Debug, Default, Serialize)]
pub struct SummaryJobReport {
    pub seen: usize,
    pub regenerated: usize,
    pub missing_rights: usize,
    pub errors: Vec<String>,
}

/// Regenerates the denormalized summary of every non-deleted exploration.
pub async fn regenerate_summaries(ctx: &JobContext) -> Result<SummaryJobReport> {
    let explorations = ctx.storage.list_explorations(false).await?;
    let mut report = SummaryJobReport::default();

    for exploration in &explorations {
        report.seen += 1;
        let rights = match ctx.storage.get_rights(&exploration.id).await {
            Ok(Some(rights)) => rights,
            Ok(None) => {
                warn!(
                    "summaries: exploration {} has no rights record; skipping",
                    exploration.id
                );
                report.missing_rights += 1;
                continue;
            }
            Err(e) => {
                warn!("summaries: rights lookup failed for {}: {}", exploration.id, e);
                report.errors.push(format!("{}: {}", exploration.id, e));
                continue;
            }
        };
        let summary = ExplorationSummary::from_exploration(exploration, &rights);
        if let Err(e) = ctx.storage.upsert_summary(&summary).await {
            warn!("summaries: upsert failed for {}: {}", exploration.id, e);
            report.errors.push(format!("{}: {}", exploration.id, e));
            continue;
        }
        report.regenerated += 1;
    }

    job_metrics::entities_seen("summaries", report.seen);
    job_metrics::entities_updated("summaries", report.regenerated);
    job_metrics::entity_errors("summaries", report.errors.len());
    info!(
        "summaries: regenerated {} of {} exploration summaries",
        report.regenerated, report.seen
    );
    Ok(report)
}

#[derive(Debug, Default, Serialize)]
pub struct IndexJobReport {
    pub indexed: usize,
}

/// Submits every non-deleted exploration to the search index.
pub async fn index_explorations(ctx: &JobContext) -> Result<IndexJobReport> {
    let explorations = ctx.storage.list_explorations(false).await?;
    let ids: Vec<String> = explorations.into_iter().map(|exp| exp.id).collect();
    ctx.search.index_explorations(&ids).await?;

    job_metrics::entities_seen("index", ids.len());
    job_metrics::entities_updated("index", ids.len());
    info!("index: submitted {} exploration(s) to the search index", ids.len());
    Ok(IndexJobReport { indexed: ids.len() })
}

#[derive(Debug, Default, Serialize)]
pub struct ValidationAuditReport {
    pub seen: usize,
    /// (exploration id, validation message) pairs for failing entities
    pub failures: Vec<(String, String)>,
}

/// Validates every non-deleted exploration, strictly when it is publicly
/// visible. Malformed content is collected as (id, message) pairs; this job
/// never fails because of it.
pub async fn audit_validity(ctx: &JobContext) -> Result<ValidationAuditReport> {
    let explorations = ctx.storage.list_explorations(false).await?;
    let mut report = ValidationAuditReport::default();

    for exploration in &explorations {
        report.seen += 1;
        let strict = match ctx.storage.get_rights(&exploration.id).await? {
            Some(rights) => rights.status != ActivityStatus::Private,
            None => false,
        };
        if let Err(e) = exploration.validate(strict) {
            report
                .failures
                .push((exploration.id.clone(), e.to_string()));
        }
    }

    job_metrics::entities_seen("audit", report.seen);
    job_metrics::entity_errors("audit", report.failures.len());
    info!(
        "audit: {} of {} explorations failed validation",
        report.failures.len(),
        report.seen
    );
    Ok(report)
}

#[derive(Debug, Default, Serialize)]
pub struct MigrationJobReport {
    pub seen: usize,
    pub migrated: usize,
    pub already_current: usize,
    pub skipped_invalid: usize,
}

/// Upgrades the states schema of explorations that are behind
/// `CURRENT_STATES_SCHEMA_VERSION`, persisting exactly one update per
/// upgraded entity. Explorations failing lenient validation are skipped and
/// logged; already-current explorations are left untouched.
pub async fn migrate_schemas(ctx: &JobContext) -> Result<MigrationJobReport> {
    let explorations = ctx.storage.list_explorations(false).await?;
    let mut report = MigrationJobReport::default();

    for exploration in &explorations {
        report.seen += 1;

        // Do not upgrade explorations that fail lenient validation
        if let Err(e) = exploration.validate(false) {
            warn!(
                "migration: exploration {} failed lenient validation: {}",
                exploration.id, e
            );
            report.skipped_invalid += 1;
            continue;
        }

        if !exploration.needs_states_schema_migration() {
            report.already_current += 1;
            continue;
        }

        let from_version = exploration.states_schema_version;
        let mut migrated = exploration.clone();
        if let Err(e) = migrated.migrate_states_schema_to_latest() {
            warn!("migration: exploration {} not migratable: {}", exploration.id, e);
            report.skipped_invalid += 1;
            continue;
        }
        let commit_message = format!(
            "Update exploration states from schema version {} to {}.",
            from_version, CURRENT_STATES_SCHEMA_VERSION
        );
        if let Err(e) = ctx
            .storage
            .save_exploration(&migrated, MIGRATION_BOT_USERNAME, &commit_message)
            .await
        {
            warn!("migration: save failed for {}: {}", exploration.id, e);
            report.skipped_invalid += 1;
            continue;
        }
        report.migrated += 1;
    }

    job_metrics::entities_seen("migration", report.seen);
    job_metrics::entities_updated("migration", report.migrated);
    job_metrics::entity_errors("migration", report.skipped_invalid);
    info!(
        "migration: migrated {} of {} explorations ({} current, {} skipped)",
        report.migrated, report.seen, report.already_current, report.skipped_invalid
    );
    Ok(report)
}

#[derive(Debug, Default, Serialize)]
pub struct FirstPublishedReport {
    pub snapshots_seen: usize,
    pub explorations_updated: usize,
    pub errors: Vec<String>,
}

/// Finds the first-published time for every exploration from its rights
/// history: snapshots with public status are mapped to millisecond
/// timestamps and reduced per exploration by minimum.
pub async fn backfill_first_published(ctx: &JobContext) -> Result<FirstPublishedReport> {
    let snapshots = ctx.storage.list_rights_snapshots().await?;
    let mut report = FirstPublishedReport {
        snapshots_seen: snapshots.len(),
        ..Default::default()
    };

    // Map phase: (exploration id, publish time in millis) per public snapshot
    let mut earliest: HashMap<String, i64> = HashMap::new();
    for snapshot in &snapshots {
        if !snapshot.status.is_publicly_visible() {
            continue;
        }
        let msec = snapshot.created_on.timestamp_millis();
        earliest
            .entry(snapshot.exploration_id().to_string())
            .and_modify(|existing| *existing = (*existing).min(msec))
            .or_insert(msec);
    }

    // Reduce phase: persist the minimum per exploration
    for (exploration_id, msec) in earliest {
        match ctx
            .storage
            .set_first_published_msec(&exploration_id, msec)
            .await
        {
            Ok(()) => report.explorations_updated += 1,
            Err(e) => {
                warn!(
                    "first_published: update failed for {}: {}",
                    exploration_id, e
                );
                report.errors.push(format!("{}: {}", exploration_id, e));
            }
        }
    }

    job_metrics::entities_seen("first_published", report.snapshots_seen);
    job_metrics::entities_updated("first_published", report.explorations_updated);
    job_metrics::entity_errors("first_published", report.errors.len());
    info!(
        "first_published: updated {} exploration(s) from {} snapshot(s)",
        report.explorations_updated, report.snapshots_seen
    );
    Ok(report)
}
