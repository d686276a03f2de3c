use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Version conflict on {table} record {entity_id}")]
    Conflict { table: &'static str, entity_id: String },

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Owns the PostgreSQL pool used by the repositories
#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// Connect using DATABASE_URL and the pool settings from config
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let connection_string = std::env::var("DATABASE_URL")
            .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let target = Self::describe_target(&connection_string)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&connection_string)
            .await?;

        info!("Connected database pool to {}", target);

        let manager = Self { pool };
        if config.run_migrations {
            manager.migrate().await?;
        }
        Ok(manager)
    }

    pub fn pool(&self) -> PgPool {
        self.pool.clone()
    }

    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    /// host/database for log lines, never the credentials
    fn describe_target(connection_string: &str) -> Result<String, DatabaseError> {
        let url = url::Url::parse(connection_string).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(DatabaseError::InvalidDatabaseUrl);
        }
        let host = url.host_str().unwrap_or("localhost");
        let port = url.port().unwrap_or(5432);
        Ok(format!("{}:{}{}", host, port, url.path()))
    }
}
