// src/config.rs

use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{bail, Context};
use sqlx::postgres::PgPoolOptions;

use crate::{
    common::clock::{Clock, SystemClock},
    db::{MemoryStore, PgStore, TrackingStore},
    models::project::UtilizationRule,
    services::{DashboardService, ProjectDeleteMode, ProjectService, ResourceService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub storage: StorageKind,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    pub delete_mode: ProjectDeleteMode,
    pub utilization_rule: UtilizationRule,
}

impl Config {
    /// Reads `.env` (if present) and the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let storage = match get("STORAGE").as_deref().map(str::trim) {
            None | Some("") | Some("postgres") => StorageKind::Postgres,
            Some("memory") => StorageKind::Memory,
            Some(other) => bail!("STORAGE must be 'postgres' or 'memory', got '{other}'"),
        };

        let database_url = get("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if storage == StorageKind::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORAGE=postgres");
        }

        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("invalid DATABASE_MAX_CONNECTIONS '{raw}'"))?,
            None => 5,
        };

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .context("invalid BIND_ADDR")?;

        let delete_mode = match get("PROJECT_DELETE_MODE") {
            Some(raw) => raw
                .parse::<ProjectDeleteMode>()
                .context("invalid PROJECT_DELETE_MODE")?,
            None => ProjectDeleteMode::default(),
        };

        let utilization_rule = match get("UTILIZATION_RULE") {
            Some(raw) => raw
                .parse::<UtilizationRule>()
                .context("invalid UTILIZATION_RULE")?,
            None => UtilizationRule::default(),
        };

        Ok(Self {
            storage,
            database_url,
            max_connections,
            bind_addr,
            delete_mode,
            utilization_rule,
        })
    }
}

// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TrackingStore>,
    pub resource_service: ResourceService,
    pub project_service: ProjectService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    /// Connects the configured store, runs migrations and wires the services.
    pub async fn build(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn TrackingStore> = match config.storage {
            StorageKind::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on shutdown");
                Arc::new(MemoryStore::new())
            }
            StorageKind::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL must be set when STORAGE=postgres")?;

                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(url)
                    .await
                    .context("failed to connect to the database")?;
                tracing::info!("Database connection established");

                sqlx::migrate!()
                    .run(&pool)
                    .await
                    .context("failed to run database migrations")?;
                tracing::info!("Database migrations applied");

                Arc::new(PgStore::new(pool))
            }
        };

        Ok(Self::with_store(
            store,
            Arc::new(SystemClock),
            config.delete_mode,
            config.utilization_rule,
        ))
    }

    pub fn with_store(
        store: Arc<dyn TrackingStore>,
        clock: Arc<dyn Clock>,
        delete_mode: ProjectDeleteMode,
        utilization_rule: UtilizationRule,
    ) -> Self {
        Self {
            resource_service: ResourceService::new(store.clone(), clock.clone()),
            project_service: ProjectService::new(
                store.clone(),
                clock.clone(),
                delete_mode,
                utilization_rule,
            ),
            dashboard_service: DashboardService::new(store.clone(), clock, utilization_rule),
            store,
        }
    }
}
