use crate::config::DEFAULT_STATS_PAGE_SIZE;
use crate::error::StoreError;
use crate::handlers::{StatsSource, VoteStore};
use crate::models::Resident;
use crate::stats::{self, StatsSnapshot};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqlitePool, SqlitePoolOptions},
    Row, Sqlite,
};
use uuid::Uuid;

pub struct Database {
    pool: SqlitePool,
    stats_page_size: u32,
}

impl Database {
    pub async fn new(db_url: &str) -> Result<Self, StoreError> {
        let in_memory = db_url.contains(":memory:");

        // Create database if it doesn't exist
        if !in_memory && !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            Sqlite::create_database(db_url).await?;
        }

        // Every connection to an in-memory database sees its own copy
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .connect(db_url)
            .await?;

        Self::init_schema(&pool).await?;

        Ok(Self {
            pool,
            stats_page_size: DEFAULT_STATS_PAGE_SIZE,
        })
    }

    pub fn with_stats_page_size(mut self, page_size: u32) -> Self {
        self.stats_page_size = page_size.max(1);
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(pool: &SqlitePool) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS residents (
                id TEXT PRIMARY KEY,
                full_name TEXT NOT NULL,
                unit TEXT,
                has_voted BOOLEAN NOT NULL DEFAULT FALSE,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Inserts a resident with a fresh id and returns it.
    pub async fn insert_resident(
        &self,
        full_name: &str,
        unit: Option<&str>,
    ) -> Result<Resident, StoreError> {
        let resident = Resident {
            id: Uuid::new_v4().to_string(),
            full_name: full_name.to_string(),
            unit: unit.map(str::to_string),
            has_voted: false,
        };

        sqlx::query(
            r#"
            INSERT INTO residents (id, full_name, unit, has_voted, updated_at)
            VALUES (?, ?, ?, FALSE, ?)
            "#,
        )
        .bind(&resident.id)
        .bind(&resident.full_name)
        .bind(&resident.unit)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(resident)
    }

    pub async fn list_residents(&self) -> Result<Vec<Resident>, StoreError> {
        let residents = sqlx::query(
            r#"
            SELECT id, full_name, unit, has_voted
            FROM residents
            ORDER BY full_name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|row| Resident {
            id: row.get::<String, _>("id"),
            full_name: row.get::<String, _>("full_name"),
            unit: row.get::<Option<String>, _>("unit"),
            has_voted: row.get::<bool, _>("has_voted"),
        })
        .collect();

        Ok(residents)
    }

    pub async fn set_has_voted(&self, resident_id: &str, has_voted: bool) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE residents
            SET has_voted = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(has_voted)
        .bind(Utc::now().to_rfc3339())
        .bind(resident_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(resident_id.to_string()));
        }
        Ok(())
    }

    /// Reads every `(unit, has_voted)` row page by page and aggregates them.
    /// Stops at the first page shorter than the page size.
    pub async fn voting_stats(&self) -> Result<StatsSnapshot, StoreError> {
        let page_size = i64::from(self.stats_page_size);
        let mut rows: Vec<(Option<String>, bool)> = Vec::new();
        let mut page: i64 = 0;

        loop {
            let batch: Vec<(Option<String>, bool)> = sqlx::query(
                r#"
                SELECT unit, has_voted
                FROM residents
                ORDER BY id
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(page_size)
            .bind(page * page_size)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|row| (row.get::<Option<String>, _>("unit"), row.get::<bool, _>("has_voted")))
            .collect();

            let fetched = batch.len() as i64;
            rows.extend(batch);
            debug!("Stats page {}: fetched {} residents (total {})", page + 1, fetched, rows.len());

            if fetched < page_size {
                break;
            }
            page += 1;
        }

        info!("Recomputed voting stats over {} residents", rows.len());
        Ok(stats::recompute_rows(
            rows.iter().map(|(unit, has_voted)| (unit.as_deref(), *has_voted)),
        ))
    }
}

#[async_trait]
impl VoteStore for Database {
    async fn persist_vote(&self, resident_id: &str, has_voted: bool) -> Result<(), StoreError> {
        self.set_has_voted(resident_id, has_voted).await
    }
}

#[async_trait]
impl StatsSource for Database {
    async fn fetch_voting_stats(&self) -> Result<StatsSnapshot, StoreError> {
        self.voting_stats().await
    }
}
