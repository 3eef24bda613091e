//! SQLite-backed store holding the one persona record.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use super::persona::Persona;

/// The row is pinned to `id = 1`, so the table can never hold a second persona.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS agent (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    name TEXT NOT NULL,
    role TEXT NOT NULL,
    instructions TEXT NOT NULL
);
"#;

#[derive(Debug, sqlx::FromRow)]
struct PersonaRow {
    name: String,
    role: String,
    instructions: String,
}

impl From<PersonaRow> for Persona {
    fn from(row: PersonaRow) -> Self {
        Self {
            name: row.name,
            role: row.role,
            instructions: row.instructions,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PersonaStore {
    pool: SqlitePool,
}

impl PersonaStore {
    /// Connect using a SQLite connection string, creating the database if missing.
    pub async fn open(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("parsing database URL {database_url}"))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("connecting to database")?;

        Self::with_pool(pool).await
    }

    /// In-memory store; a single long-lived connection keeps the data alive.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("parsing in-memory database URL")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("connecting to in-memory database")?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .context("creating agent table")?;
        Ok(Self { pool })
    }

    /// Closes the pool; later queries fail instead of reconnecting.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Returns the stored persona, materializing the default one on first read.
    pub async fn get_or_create(&self) -> Result<Persona> {
        let defaults = Persona::default();
        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO agent (id, name, role, instructions) VALUES (1, ?, ?, ?)",
        )
        .bind(&defaults.name)
        .bind(&defaults.role)
        .bind(&defaults.instructions)
        .execute(&self.pool)
        .await
        .context("materializing default persona")?;

        if inserted.rows_affected() > 0 {
            tracing::info!("no persona stored yet, created the default one");
        }

        sqlx::query_as::<_, PersonaRow>(
            "SELECT name, role, instructions FROM agent WHERE id = 1",
        )
        .fetch_one(&self.pool)
        .await
        .map(Persona::from)
        .context("fetching persona")
    }

    /// Replaces every field of the persona, creating it if absent.
    pub async fn save(&self, persona: &Persona) -> Result<Persona> {
        sqlx::query_as::<_, PersonaRow>(
            r#"
            INSERT INTO agent (id, name, role, instructions)
            VALUES (1, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                role = excluded.role,
                instructions = excluded.instructions
            RETURNING name, role, instructions
            "#,
        )
        .bind(&persona.name)
        .bind(&persona.role)
        .bind(&persona.instructions)
        .fetch_one(&self.pool)
        .await
        .map(Persona::from)
        .context("saving persona")
    }

    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM agent")
            .fetch_one(&self.pool)
            .await
            .context("counting personas")
    }
}
