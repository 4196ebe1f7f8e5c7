//! Startup check that the store carries the time-tracking schema.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

/// Tables the application cannot run without.
pub const REQUIRED_TABLES: &[&str] = &["users", "categories", "activities", "comments", "quarters"];

#[derive(Debug, Error)]
pub enum DatabaseValidationError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Invalid(String),
}

pub struct DatabaseValidator {
    pool: SqlitePool,
}

impl DatabaseValidator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Reports migration state and any missing tables.
    pub async fn validate(&self) -> Result<ValidationReport, DatabaseValidationError> {
        if !self.table_exists("_sqlx_migrations").await? {
            warn!("Database has no migration history");
            return Ok(ValidationReport {
                migrations_applied: 0,
                latest_migration: None,
                missing_tables: REQUIRED_TABLES.iter().map(|t| t.to_string()).collect(),
            });
        }

        let migrations_applied = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        let latest_migration = sqlx::query_scalar::<_, String>(
            "SELECT description FROM _sqlx_migrations WHERE success = 1 ORDER BY version DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        let mut missing_tables = Vec::new();
        for table in REQUIRED_TABLES {
            if !self.table_exists(table).await? {
                missing_tables.push(table.to_string());
            }
        }

        let report = ValidationReport {
            migrations_applied: migrations_applied as usize,
            latest_migration,
            missing_tables,
        };
        if report.is_ok() {
            info!(
                migrations_applied = report.migrations_applied,
                latest = ?report.latest_migration,
                "Database validation complete"
            );
        } else {
            warn!(missing = ?report.missing_tables, "Database is missing tables");
        }
        Ok(report)
    }

    /// Like [`validate`](Self::validate), but fails unless the schema is complete.
    pub async fn ensure_valid(&self) -> Result<ValidationReport, DatabaseValidationError> {
        let report = self.validate().await?;
        if report.is_ok() {
            Ok(report)
        } else {
            Err(DatabaseValidationError::Invalid(report.summary()))
        }
    }

    async fn table_exists(&self, table: &str) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = $1",
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub migrations_applied: usize,
    pub latest_migration: Option<String>,
    pub missing_tables: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.migrations_applied > 0 && self.missing_tables.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.migrations_applied == 0 {
            "Database not initialized - migrations need to be run".to_string()
        } else if !self.missing_tables.is_empty() {
            format!("Database is missing tables: {}", self.missing_tables.join(", "))
        } else {
            format!("Database OK - {} migrations applied", self.migrations_applied)
        }
    }
}
