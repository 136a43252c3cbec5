use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::error;

use trailguide::calculations::CalculationRegistry;
use trailguide::config::PlatformConfig;
use trailguide::domain::{
    EmailIntent, Exploration, ExplorationRights, RightsSnapshot, StateAnswers,
};
use trailguide::email::EmailManager;
use trailguide::infra::{InMemorySearchIndex, LoggingMailer, StaticUserDirectory};
use trailguide::jobs::{self, JobContext};
use trailguide::observability::init_logging;
use trailguide::storage::InMemoryStorage;

#[derive(Parser)]
#[command(name = "trailguide")]
#[command(about = "Trailguide learning platform backend services")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run maintenance jobs over a datastore fixture
    Jobs {
        /// Job to run: summaries, index, audit, migrate, first-published, all
        #[arg(long)]
        job: String,
        /// JSON fixture to seed the in-memory datastore from
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Run an answer calculation over a recorded-answers fixture
    Stats {
        /// Calculation id (see `stats --calculation list`)
        #[arg(long)]
        calculation: String,
        /// JSON file holding one recorded answer batch
        #[arg(long)]
        data: PathBuf,
    },
    /// Print the configured draft body for a moderator-action email
    EmailDraft {
        /// Moderator-action intent (e.g. publicize_exploration)
        #[arg(long)]
        intent: String,
        /// TOML file with admin config overrides
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Shape of the datastore fixture consumed by the jobs subcommand.
#[derive(Debug, Default, Deserialize)]
struct Fixture {
    #[serde(default)]
    explorations: Vec<Exploration>,
    #[serde(default)]
    rights: Vec<ExplorationRights>,
    #[serde(default)]
    rights_snapshots: Vec<RightsSnapshot>,
    #[serde(default)]
    state_answers: Vec<StateAnswers>,
}

fn load_fixture(path: Option<&PathBuf>) -> Result<Fixture, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        }
        None => Ok(Fixture::default()),
    }
}

fn seeded_storage(fixture: Fixture) -> Arc<InMemoryStorage> {
    let storage = Arc::new(InMemoryStorage::new());
    for exploration in fixture.explorations {
        storage.seed_exploration(exploration);
    }
    for rights in fixture.rights {
        storage.seed_rights(rights);
    }
    for snapshot in fixture.rights_snapshots {
        storage.seed_rights_snapshot(snapshot);
    }
    for answers in fixture.state_answers {
        storage.seed_state_answers(answers);
    }
    storage
}

async fn run_job(ctx: &JobContext, job: &str) -> Result<(), Box<dyn std::error::Error>> {
    match job {
        "summaries" => {
            let report = jobs::regenerate_summaries(ctx).await?;
            println!("\n📊 Summary regeneration:");
            println!("   Seen: {}", report.seen);
            println!("   Regenerated: {}", report.regenerated);
            println!("   Missing rights: {}", report.missing_rights);
            println!("   Errors: {}", report.errors.len());
        }
        "index" => {
            let report = jobs::index_explorations(ctx).await?;
            println!("\n🔍 Search indexing:");
            println!("   Indexed: {}", report.indexed);
        }
        "audit" => {
            let report = jobs::audit_validity(ctx).await?;
            println!("\n🧐 Validation audit:");
            println!("   Seen: {}", report.seen);
            println!("   Failures: {}", report.failures.len());
            for (id, message) in &report.failures {
                println!("   - {}: {}", id, message);
            }
        }
        "migrate" => {
            let report = jobs::migrate_schemas(ctx).await?;
            println!("\n🛠  Schema migration:");
            println!("   Seen: {}", report.seen);
            println!("   Migrated: {}", report.migrated);
            println!("   Already current: {}", report.already_current);
            println!("   Skipped (invalid): {}", report.skipped_invalid);
        }
        "first-published" => {
            let report = jobs::backfill_first_published(ctx).await?;
            println!("\n📅 First-published backfill:");
            println!("   Snapshots seen: {}", report.snapshots_seen);
            println!("   Explorations updated: {}", report.explorations_updated);
            println!("   Errors: {}", report.errors.len());
        }
        other => {
            return Err(format!(
                "Unknown job '{}'. Available: summaries, index, audit, migrate, \
                 first-published, all",
                other
            )
            .into());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Jobs { job, data } => {
            let fixture = load_fixture(data.as_ref())?;
            let storage = seeded_storage(fixture);
            let search = Arc::new(InMemorySearchIndex::new());
            let ctx = JobContext::new(storage, search);

            if job == "all" {
                for job in ["summaries", "index", "audit", "migrate", "first-published"] {
                    if let Err(e) = run_job(&ctx, job).await {
                        error!("Job '{}' failed: {}", job, e);
                        println!("❌ Job '{}' failed: {}", job, e);
                    }
                }
            } else {
                run_job(&ctx, &job).await?;
            }
            println!("\n✅ Jobs run complete");
        }
        Commands::Stats { calculation, data } => {
            let registry = CalculationRegistry::new();
            if calculation == "list" {
                println!("Available calculations:");
                for id in registry.list_ids() {
                    println!("   - {}", id);
                }
                return Ok(());
            }

            let contents = std::fs::read_to_string(&data)?;
            let answers: StateAnswers = serde_json::from_str(&contents)?;

            let result = registry.run(&calculation, &answers)?;
            println!(
                "\n📈 {} for {} v{} / '{}':",
                result.calculation_id,
                result.exploration_id,
                result.exploration_version,
                result.state_name
            );
            for pair in &result.pairs {
                println!("   {} × {}", pair.frequency, pair.answer);
            }
        }
        Commands::EmailDraft { intent, config } => {
            let platform_config = match config {
                Some(path) => PlatformConfig::load_toml(&path)?,
                None => PlatformConfig::new(),
            };
            let intent: EmailIntent = intent.parse()?;

            let storage = Arc::new(InMemoryStorage::new());
            let manager = EmailManager::new(
                Arc::new(platform_config),
                storage,
                Arc::new(LoggingMailer::new()),
                Arc::new(StaticUserDirectory::new()),
            );
            match manager.draft_moderator_action_email(intent) {
                Ok(draft) => {
                    println!("\n✉️  Draft body for '{}':\n{}", intent, draft);
                }
                Err(e) => {
                    error!("Could not produce draft: {}", e);
                    println!("❌ {}", e);
                }
            }
        }
    }
    Ok(())
}
