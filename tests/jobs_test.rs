use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};

use trailguide::common::constants::CURRENT_STATES_SCHEMA_VERSION;
use trailguide::domain::{
    ActivityStatus, Exploration, ExplorationRights, RightsSnapshot, State,
};
use trailguide::infra::InMemorySearchIndex;
use trailguide::jobs::{self, JobContext};
use trailguide::storage::{InMemoryStorage, Storage};

fn exploration(id: &str) -> Exploration {
    let mut states = BTreeMap::new();
    states.insert(
        "Introduction".to_string(),
        State {
            content: "<p>Welcome.</p>".to_string(),
            interaction_id: Some("TextInput".to_string()),
        },
    );
    Exploration {
        id: id.to_string(),
        title: format!("Exploration {id}"),
        category: "Math".to_string(),
        objective: "Learn things".to_string(),
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

fn rights(id: &str, status: ActivityStatus) -> ExplorationRights {
    ExplorationRights {
        exploration_id: id.to_string(),
        status,
        owner_ids: vec!["owner".to_string()],
        editor_ids: vec![],
        viewer_ids: vec![],
        community_owned: false,
        first_published_msec: None,
    }
}

fn context() -> (Arc<InMemoryStorage>, Arc<InMemorySearchIndex>, JobContext) {
    let storage = Arc::new(InMemoryStorage::new());
    let search = Arc::new(InMemorySearchIndex::new());
    let ctx = JobContext::new(storage.clone(), search.clone());
    (storage, search, ctx)
}

#[tokio::test]
async fn summaries_job_regenerates_for_non_deleted_explorations() -> Result<()> {
    let (storage, _search, ctx) = context();
    storage.seed_exploration(exploration("exp1"));
    storage.seed_rights(rights("exp1", ActivityStatus::Public));
    let mut deleted = exploration("exp2");
    deleted.deleted = true;
    storage.seed_exploration(deleted);
    storage.seed_rights(rights("exp2", ActivityStatus::Private));

    let report = jobs::regenerate_summaries(&ctx).await?;
    assert_eq!(report.seen, 1);
    assert_eq!(report.regenerated, 1);

    let summary = storage.get_summary("exp1").await?.unwrap();
    assert_eq!(summary.title, "Exploration exp1");
    assert_eq!(summary.status, ActivityStatus::Public);
    assert!(storage.get_summary("exp2").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn index_job_submits_all_non_deleted_ids() -> Result<()> {
    let (storage, search, ctx) = context();
    storage.seed_exploration(exploration("exp1"));
    storage.seed_exploration(exploration("exp2"));
    let mut deleted = exploration("exp3");
    deleted.deleted = true;
    storage.seed_exploration(deleted);

    let report = jobs::index_explorations(&ctx).await?;
    assert_eq!(report.indexed, 2);
    assert_eq!(search.indexed_ids(), vec!["exp1".to_string(), "exp2".to_string()]);
    Ok(())
}

#[tokio::test]
async fn audit_job_collects_failures_without_failing() -> Result<()> {
    let (storage, _search, ctx) = context();

    // Structurally broken regardless of status
    let mut broken = exploration("broken");
    broken.title = String::new();
    storage.seed_exploration(broken);
    storage.seed_rights(rights("broken", ActivityStatus::Private));

    // Passes lenient validation but not strict: no interaction on its state
    let mut no_interaction = exploration("incomplete");
    no_interaction
        .states
        .get_mut("Introduction")
        .unwrap()
        .interaction_id = None;
    storage.seed_exploration(no_interaction.clone());
    storage.seed_rights(rights("incomplete", ActivityStatus::Public));

    storage.seed_exploration(exploration("fine"));
    storage.seed_rights(rights("fine", ActivityStatus::Publicized));

    let report = jobs::audit_validity(&ctx).await?;
    assert_eq!(report.seen, 3);
    let failing_ids: Vec<&str> = report.failures.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(failing_ids, vec!["broken", "incomplete"]);

    // The same incomplete exploration passes when private (lenient mode)
    storage.seed_rights(rights("incomplete", ActivityStatus::Private));
    let report = jobs::audit_validity(&ctx).await?;
    let failing_ids: Vec<&str> = report.failures.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(failing_ids, vec!["broken"]);
    Ok(())
}

#[tokio::test]
async fn migration_job_upgrades_stale_schemas_exactly_once() -> Result<()> {
    let (storage, _search, ctx) = context();

    let mut stale = exploration("stale");
    stale.states_schema_version = 1;
    storage.seed_exploration(stale);
    storage.seed_exploration(exploration("current"));

    let report = jobs::migrate_schemas(&ctx).await?;
    assert_eq!(report.migrated, 1);
    assert_eq!(report.already_current, 1);
    assert_eq!(report.skipped_invalid, 0);

    let migrated = storage.get_exploration("stale").await?.unwrap();
    assert_eq!(migrated.states_schema_version, CURRENT_STATES_SCHEMA_VERSION);
    // Exactly one persisted update: the entity version was bumped once
    assert_eq!(migrated.version, 2);

    // Already-current entity saw no write at all
    let untouched = storage.get_exploration("current").await?.unwrap();
    assert_eq!(untouched.version, 1);

    // Re-running leaves both untouched
    let report = jobs::migrate_schemas(&ctx).await?;
    assert_eq!(report.migrated, 0);
    assert_eq!(report.already_current, 2);
    let unchanged = storage.get_exploration("stale").await?.unwrap();
    assert_eq!(unchanged.version, 2);
    Ok(())
}

#[tokio::test]
async fn migration_job_skips_invalid_explorations() -> Result<()> {
    let (storage, _search, ctx) = context();
    let mut invalid = exploration("invalid");
    invalid.states_schema_version = 1;
    invalid.init_state_name = "Missing".to_string();
    storage.seed_exploration(invalid);

    let report = jobs::migrate_schemas(&ctx).await?;
    assert_eq!(report.migrated, 0);
    assert_eq!(report.skipped_invalid, 1);

    let unchanged = storage.get_exploration("invalid").await?.unwrap();
    assert_eq!(unchanged.states_schema_version, 1);
    assert_eq!(unchanged.version, 1);
    Ok(())
}

#[tokio::test]
async fn first_published_backfill_takes_minimum_public_snapshot_time() -> Result<()> {
    let (storage, _search, ctx) = context();
    storage.seed_exploration(exploration("exp1"));
    storage.seed_rights(rights("exp1", ActivityStatus::Public));

    let t = |secs: i64| -> DateTime<Utc> { DateTime::from_timestamp(secs, 0).unwrap() };
    storage.seed_rights_snapshot(RightsSnapshot {
        snapshot_id: "exp1-1".to_string(),
        status: ActivityStatus::Private,
        created_on: t(100),
    });
    storage.seed_rights_snapshot(RightsSnapshot {
        snapshot_id: "exp1-2".to_string(),
        status: ActivityStatus::Public,
        created_on: t(200),
    });
    storage.seed_rights_snapshot(RightsSnapshot {
        snapshot_id: "exp1-3".to_string(),
        status: ActivityStatus::Public,
        created_on: t(150),
    });

    let report = jobs::backfill_first_published(&ctx).await?;
    assert_eq!(report.snapshots_seen, 3);
    assert_eq!(report.explorations_updated, 1);

    let rights = storage.get_rights("exp1").await?.unwrap();
    assert_eq!(rights.first_published_msec, Some(150_000));

    // Re-running never moves the date forward
    let report = jobs::backfill_first_published(&ctx).await?;
    assert_eq!(report.explorations_updated, 1);
    let rights = storage.get_rights("exp1").await?.unwrap();
    assert_eq!(rights.first_published_msec, Some(150_000));
    Ok(())
}
