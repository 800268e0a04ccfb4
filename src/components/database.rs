//! Database connection pool

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{config::DatabaseConfig, lifecycle::Component};

pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect, then bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        anyhow::ensure!(
            matches!(config.driver.as_str(), "postgres" | "postgresql"),
            "unsupported database driver {:?}",
            config.driver
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await
            .context("Failed to connect to database")?;

        tracing::info!("Connected to database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database migrations completed");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Component for Database {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.pool.close().await;
        Ok(())
    }
}
