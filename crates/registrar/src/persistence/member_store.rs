//! # Member Store
//!
//! SQLite-backed store for member records:
//! - Idempotent schema bootstrap (create-if-absent plus add-missing-columns)
//! - Low-level member queries used by the registry operations
//! - Database health diagnostics
//!
//! Uniqueness of `email`, `phone`, and `membership_code` is enforced by
//! UNIQUE constraints so that concurrent read-then-write operations always
//! have a storage-level backstop.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, FromRow, Sqlite, SqlitePool};
use std::path::Path;
use tracing::{debug, info};

use common::config::DatabaseConfig;

/// A persisted member record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    /// Surrogate key, assigned by the store, never reused
    pub id: i64,
    /// Display name
    pub name: String,
    /// Contact email, unique across all records
    pub email: String,
    /// Contact phone, unique across all records
    pub phone: String,
    /// Generated membership code, unique and immutable
    pub membership_code: String,
    /// Optional department, may be explicitly cleared to ""
    pub department: Option<String>,
    /// Optional registration number, may be explicitly cleared to ""
    pub reg_number: Option<String>,
    /// Optional year, may be explicitly cleared to ""
    pub year: Option<String>,
    /// Creation timestamp, set once at insert
    pub created_at: DateTime<Utc>,
}

/// Input for a new member row; the code and timestamp are supplied separately
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMember {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: Option<String>,
    pub reg_number: Option<String>,
    pub year: Option<String>,
}

/// A persistence probe row written by the database health diagnostic
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HealthProbe {
    pub key: String,
    pub value: Option<String>,
    pub timestamp: i64,
}

/// Member store client
#[derive(Debug, Clone)]
pub struct MemberStore {
    pool: SqlitePool,
}

impl MemberStore {
    /// Create a new member store from configuration
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to member database: {}", config.url);

        if let Some(db_path) = config.url.strip_prefix("sqlite:") {
            if db_path != ":memory:" && !Path::new(db_path).exists() {
                info!("Creating new SQLite database: {}", db_path);
                Sqlite::create_database(&config.url)
                    .await
                    .context("Failed to create SQLite database")?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(&config.url)
            .await
            .context("Failed to connect to SQLite database")?;

        let store = Self { pool };

        if config.run_migrations {
            store.run_migrations().await?;
        }

        Ok(store)
    }

    /// Wrap an existing pool (used by tests and bootstrap tooling)
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get access to the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run the idempotent schema bootstrap
    ///
    /// Creates the tables if absent, then adds any optional columns missing
    /// from databases created by earlier schema revisions. Safe to run any
    /// number of times; not part of the per-request path.
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running member database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS members (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                phone TEXT NOT NULL UNIQUE,
                membership_code TEXT NOT NULL UNIQUE,
                department TEXT,
                reg_number TEXT,
                year TEXT,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create members table")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS health_probes (
                key TEXT PRIMARY KEY,
                value TEXT,
                timestamp INTEGER
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create health_probes table")?;

        self.ensure_optional_columns().await?;

        info!("Member database migrations completed");
        Ok(())
    }

    /// Add optional descriptive columns missing from older databases
    async fn ensure_optional_columns(&self) -> Result<()> {
        let existing: Vec<String> =
            sqlx::query_scalar("SELECT name FROM pragma_table_info('members')")
                .fetch_all(&self.pool)
                .await
                .context("Failed to inspect members table")?;

        // Fixed DDL per column; caller input never reaches these statements.
        let optional_columns = [
            ("department", "ALTER TABLE members ADD COLUMN department TEXT"),
            ("reg_number", "ALTER TABLE members ADD COLUMN reg_number TEXT"),
            ("year", "ALTER TABLE members ADD COLUMN year TEXT"),
        ];

        for (column, ddl) in optional_columns {
            if !existing.iter().any(|c| c == column) {
                info!("Adding missing column to members table: {}", column);
                sqlx::query(ddl)
                    .execute(&self.pool)
                    .await
                    .with_context(|| format!("Failed to add column {column}"))?;
            }
        }

        Ok(())
    }

    /// Find the membership code of any record claiming the given email or phone
    pub async fn find_code_by_contact(
        &self,
        email: &str,
        phone: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT membership_code FROM members WHERE email = ?1 OR phone = ?2",
        )
        .bind(email)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
    }

    /// Check whether a membership code is already claimed
    pub async fn code_exists(&self, code: &str) -> Result<bool, sqlx::Error> {
        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM members WHERE membership_code = ?1")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;
        Ok(existing.is_some())
    }

    /// Insert a new member row with a server-assigned creation timestamp
    ///
    /// The insert is a single statement: either the full row is persisted or
    /// nothing is. Unique-constraint violations surface as database errors
    /// for the registry to classify.
    pub async fn insert_member(&self, member: &NewMember, code: &str) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO members (name, email, phone, membership_code, department, reg_number, year, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&member.name)
        .bind(&member.email)
        .bind(&member.phone)
        .bind(code)
        .bind(&member.department)
        .bind(&member.reg_number)
        .bind(&member.year)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!("Inserted member row {}", result.last_insert_rowid());
        Ok(result.last_insert_rowid())
    }

    /// Fetch the full record matching an identifier (email or phone) and code
    pub async fn find_by_credential(
        &self,
        identifier: &str,
        code: &str,
    ) -> Result<Option<Member>, sqlx::Error> {
        sqlx::query_as::<_, Member>(
            r#"
            SELECT * FROM members
            WHERE (email = ?1 OR phone = ?1) AND membership_code = ?2
            "#,
        )
        .bind(identifier)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
    }

    /// Resolve the row id matching an identifier (email or phone) and code
    pub async fn resolve_credential(
        &self,
        identifier: &str,
        code: &str,
    ) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT id FROM members WHERE (email = ?1 OR phone = ?1) AND membership_code = ?2",
        )
        .bind(identifier)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
    }

    /// Resolve a row by surrogate id and matching code
    pub async fn resolve_by_id(&self, id: i64, code: &str) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT id FROM members WHERE id = ?1 AND membership_code = ?2",
        )
        .bind(id)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
    }

    /// Resolve a row by contact pair (email or phone) and matching code
    pub async fn resolve_by_contact(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
        code: &str,
    ) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT id FROM members WHERE (email = ?1 OR phone = ?2) AND membership_code = ?3",
        )
        .bind(email)
        .bind(phone)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
    }

    /// Fetch a record by surrogate id
    pub async fn get_member(&self, id: i64) -> Result<Option<Member>, sqlx::Error> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Count all member records
    pub async fn count_members(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await
    }

    /// List all member records ordered by display name
    pub async fn list_members(&self) -> Result<Vec<Member>, sqlx::Error> {
        sqlx::query_as::<_, Member>("SELECT * FROM members ORDER BY name")
            .fetch_all(&self.pool)
            .await
    }

    /// Get user table names for diagnostics
    pub async fn table_names(&self) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }

    /// Write a persistence probe and read back the most recent probes
    pub async fn probe_persistence(&self) -> Result<Vec<HealthProbe>, sqlx::Error> {
        let now = Utc::now().timestamp();

        sqlx::query(
            "INSERT OR REPLACE INTO health_probes (key, value, timestamp) VALUES (?1, ?2, ?3)",
        )
        .bind(format!("probe_{now}"))
        .bind(format!("value_{now}"))
        .bind(now)
        .execute(&self.pool)
        .await?;

        sqlx::query_as::<_, HealthProbe>(
            "SELECT key, value, timestamp FROM health_probes ORDER BY timestamp DESC LIMIT 5",
        )
        .fetch_all(&self.pool)
        .await
    }
}
