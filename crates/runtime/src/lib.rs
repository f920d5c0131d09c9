use anyhow::{Context, Result};
use marketplace_config::AppConfig;
use marketplace_database::{initialize_database, seed_defaults, SeedReport};
use sqlx::SqlitePool;
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    /// Install the global subscriber. `RUST_LOG` overrides the default `info` filter.
    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::TRACE)
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
    /// Present when seeding ran during initialisation
    pub seed_report: Option<SeedReport>,
}

impl BackendServices {
    /// Open and migrate the database, then seed it when `seed.enabled` is set
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let db_pool = initialize_database(&config.database)
            .await
            .context("failed to initialise database")?;

        let seed_report = if config.seed.enabled {
            let report = seed_defaults(&db_pool, &config.seed)
                .await
                .context("failed to seed default data")?;
            info!(
                colleges = report.colleges,
                users = report.users,
                products = report.products,
                "seeding complete"
            );
            Some(report)
        } else {
            info!("seeding disabled");
            None
        };

        Ok(Self {
            db_pool,
            seed_report,
        })
    }

    /// Open and migrate the database without seeding
    pub async fn initialise_without_seed(config: &AppConfig) -> Result<Self> {
        let db_pool = initialize_database(&config.database)
            .await
            .context("failed to initialise database")?;

        Ok(Self {
            db_pool,
            seed_report: None,
        })
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
