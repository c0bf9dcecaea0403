//! Record store backed by sqlite.
//!
//! The surface is deliberately narrow: insert, find-all, find-by-range, and
//! delete-by-id over one table per record kind. Rows come back as raw text
//! ([`RecordRow`]); normalization into domain types belongs to the ledger
//! service. Each operation is a single statement; there is no caching and
//! no cross-collection transaction.

use sqlx::sqlite::SqliteRow;
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::RecordKind;

const DEFAULT_DATABASE_URL: &str = "sqlite:ledger.db";
const DATABASE_URL_ENV: &str = "LEDGER_DATABASE_URL";

/// A stored document exactly as persisted, before domain normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRow {
    pub id: String,
    pub description: String,
    pub amount: String,
    pub date: String,
    pub category: String,
    pub created_at: String,
}

/// Field set for a new document. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewRecordRow {
    pub description: String,
    pub amount: String,
    pub date: String,
    pub category: String,
    pub created_at: String,
}

/// Cloneable handle to the record store. Owns the connection pool; every
/// consumer receives this handle explicitly; there is no global.
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if necessary) the database at `url`.
    pub async fn new(url: &str) -> Result<Self, sqlx::Error> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?;
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Open the configured database (env `LEDGER_DATABASE_URL`, falling
    /// back to a file next to the binary).
    pub async fn init() -> Result<Self, sqlx::Error> {
        let url =
            std::env::var(DATABASE_URL_ENV).unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        Self::new(&url).await
    }

    /// Open a uniquely named in-memory database for tests.
    #[cfg(test)]
    pub async fn init_test() -> Result<Self, sqlx::Error> {
        let test_id = Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);
        Self::new(&db_url).await
    }

    /// Create one identically shaped table per record kind. All value
    /// columns are text; the date column holds ISO `yyyy-mm-dd`, which
    /// sorts lexicographically in calendar order.
    async fn setup_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        for kind in RecordKind::ALL {
            sqlx::query(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    id TEXT PRIMARY KEY,
                    description TEXT NOT NULL,
                    amount TEXT NOT NULL,
                    date TEXT NOT NULL,
                    category TEXT NOT NULL,
                    created_at TEXT NOT NULL
                );
                "#,
                kind.collection()
            ))
            .execute(pool)
            .await?;
        }
        Ok(())
    }

    /// Insert a document into the kind's collection; returns the generated id.
    pub async fn insert(&self, kind: RecordKind, row: &NewRecordRow) -> Result<String, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(&format!(
            "INSERT INTO {} (id, description, amount, date, category, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
            kind.collection()
        ))
        .bind(&id)
        .bind(&row.description)
        .bind(&row.amount)
        .bind(&row.date)
        .bind(&row.category)
        .bind(&row.created_at)
        .execute(&*self.pool)
        .await?;
        Ok(id)
    }

    /// All documents of a kind, in unspecified order.
    pub async fn find_all(&self, kind: RecordKind) -> Result<Vec<RecordRow>, sqlx::Error> {
        let rows = sqlx::query(&format!(
            "SELECT id, description, amount, date, category, created_at FROM {}",
            kind.collection()
        ))
        .fetch_all(&*self.pool)
        .await?;
        Ok(rows.iter().map(Self::to_record_row).collect())
    }

    /// Documents whose date falls within `[start, end]` inclusive. The
    /// comparison is lexicographic on the ISO date column.
    pub async fn find_by_range(
        &self,
        kind: RecordKind,
        start: &str,
        end: &str,
    ) -> Result<Vec<RecordRow>, sqlx::Error> {
        let rows = sqlx::query(&format!(
            "SELECT id, description, amount, date, category, created_at FROM {} \
             WHERE date >= ? AND date <= ?",
            kind.collection()
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&*self.pool)
        .await?;
        Ok(rows.iter().map(Self::to_record_row).collect())
    }

    /// Delete a document by id; returns the number of rows removed (0 or 1).
    pub async fn delete_by_id(&self, kind: RecordKind, id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", kind.collection()))
            .bind(id)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    fn to_record_row(row: &SqliteRow) -> RecordRow {
        RecordRow {
            id: row.get("id"),
            description: row.get("description"),
            amount: row.get("amount"),
            date: row.get("date"),
            category: row.get("category"),
            created_at: row.get("created_at"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(date: &str, amount: &str) -> NewRecordRow {
        NewRecordRow {
            description: "sample".to_string(),
            amount: amount.to_string(),
            date: date.to_string(),
            category: "food".to_string(),
            created_at: "2024-03-15T12:00:00+00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_find_all() {
        let db = DbConnection::init_test().await.expect("test database");

        let id = db
            .insert(RecordKind::Expense, &sample_row("2024-03-15", "4.50"))
            .await
            .expect("insert");

        let rows = db.find_all(RecordKind::Expense).await.expect("find_all");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].amount, "4.50");
        assert_eq!(rows[0].date, "2024-03-15");
    }

    #[tokio::test]
    async fn collections_are_independent() {
        let db = DbConnection::init_test().await.expect("test database");

        db.insert(RecordKind::Expense, &sample_row("2024-03-15", "4.50"))
            .await
            .expect("insert expense");

        let income = db.find_all(RecordKind::Income).await.expect("find_all");
        assert!(income.is_empty());
    }

    #[tokio::test]
    async fn find_by_range_is_inclusive_on_both_bounds() {
        let db = DbConnection::init_test().await.expect("test database");

        for date in ["2024-02-29", "2024-03-01", "2024-03-31", "2024-04-01"] {
            db.insert(RecordKind::Expense, &sample_row(date, "1"))
                .await
                .expect("insert");
        }

        let rows = db
            .find_by_range(RecordKind::Expense, "2024-03-01", "2024-03-31")
            .await
            .expect("find_by_range");

        let mut dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
        dates.sort();
        assert_eq!(dates, vec!["2024-03-01", "2024-03-31"]);
    }

    #[tokio::test]
    async fn delete_by_id_reports_zero_for_missing_ids() {
        let db = DbConnection::init_test().await.expect("test database");

        let id = db
            .insert(RecordKind::Income, &sample_row("2024-03-15", "100"))
            .await
            .expect("insert");

        assert_eq!(db.delete_by_id(RecordKind::Income, &id).await.unwrap(), 1);
        assert_eq!(db.delete_by_id(RecordKind::Income, &id).await.unwrap(), 0);
        assert_eq!(
            db.delete_by_id(RecordKind::Income, "no-such-id").await.unwrap(),
            0
        );
    }
}
