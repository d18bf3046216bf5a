use clap::{Parser, Subcommand};
use jobs_dashboard::{
    config::{BackendKind, DatabaseConfig, Settings},
    db,
    services::{copy_store, entries_from_sections, AuthService, JobService},
};
use std::{path::PathBuf, sync::Arc};

#[derive(Parser)]
#[command(name = "jobs-cli")]
#[command(about = "CLI tool for managing the jobs dashboard database", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a sectioned job export into the recommended catalog
    Import {
        /// JSON file with local_charleston / remote_other / side_gigs arrays
        file: PathBuf,
    },

    /// Print login statistics for every account
    Analytics,

    /// Copy the catalog and applied jobs from one database to another
    Migrate {
        /// Source SQLite URL
        #[arg(long, default_value = "sqlite://jobs.db")]
        from: String,

        /// Target PostgreSQL URL (defaults to DATABASE_URL)
        #[arg(long, env = "DATABASE_URL")]
        to: String,
    },
}

fn backend_for(url: &str) -> Result<BackendKind, String> {
    BackendKind::from_url(url).ok_or_else(|| format!("Unrecognised database URL: {}", url))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobs_dashboard=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import { file } => {
            let settings = Settings::from_env()?;
            let store = db::open_store(&settings.database).await?;
            db::seed_default_users(store.as_ref()).await?;
            let job_service = JobService::new(store);

            let contents = std::fs::read_to_string(&file)?;
            let export: serde_json::Value = serde_json::from_str(&contents)?;
            let entries = entries_from_sections(&export);

            if entries.is_empty() {
                eprintln!("❌ No jobs found in {}", file.display());
                std::process::exit(1);
            }

            println!("📦 Found {} jobs to import...", entries.len());
            match job_service.recommend_batch(entries).await {
                Ok(outcome) => {
                    println!("✅ Success!");
                    println!("   Added: {}", outcome.added);
                    println!("   Skipped: {}", outcome.skipped);
                }
                Err(err) => {
                    eprintln!("❌ Import failed: {}", err);
                    std::process::exit(1);
                }
            }
        }

        Commands::Analytics => {
            let settings = Settings::from_env()?;
            let store = db::open_store(&settings.database).await?;
            let auth_service = AuthService::new(Arc::clone(&store));

            let owner = match store.find_user_by_username("owner").await? {
                Some(owner) => owner,
                None => {
                    eprintln!("❌ Owner account not found");
                    std::process::exit(1);
                }
            };

            match auth_service.login_analytics(owner.id).await {
                Ok(stats) => {
                    println!(
                        "{:<20} {:<25} {:<7} {:<8} {:<25}",
                        "Username", "Display name", "Guest", "Logins", "Last login"
                    );
                    println!("{}", "-".repeat(88));
                    for row in stats {
                        println!(
                            "{:<20} {:<25} {:<7} {:<8} {:<25}",
                            row.username,
                            row.display_name,
                            if row.is_guest { "Yes" } else { "No" },
                            row.login_count,
                            row.last_login_at
                                .map(|ts| ts.to_rfc3339())
                                .unwrap_or_else(|| "never".to_string())
                        );
                    }
                }
                Err(err) => {
                    eprintln!("❌ Failed to load analytics: {}", err);
                    std::process::exit(1);
                }
            }
        }

        Commands::Migrate { from, to } => {
            let source = db::open_store(&DatabaseConfig {
                backend: backend_for(&from)?,
                url: from.clone(),
                max_connections: 1,
                url_configured: true,
            })
            .await?;
            let target = db::open_store(&DatabaseConfig {
                backend: backend_for(&to)?,
                url: to.clone(),
                max_connections: 5,
                url_configured: true,
            })
            .await?;
            db::seed_default_users(target.as_ref()).await?;

            println!("🚀 Copying {} -> {}", source.backend_name(), target.backend_name());
            let report = copy_store(source.as_ref(), target.as_ref()).await?;

            println!(
                "✅ Recommended jobs: {} new, {} existing",
                report.recommended.migrated, report.recommended.skipped
            );
            println!(
                "✅ Applied jobs: {} new, {} existing",
                report.applied.migrated, report.applied.skipped
            );
            for (username, job_id) in &report.unmapped_applied {
                println!("⚠️  No user '{}' in target for {}", username, job_id);
            }
        }
    }

    Ok(())
}
