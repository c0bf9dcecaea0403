//! Ledger query service.
//!
//! The only component that talks to the record store. Validates input at
//! the boundary, stamps `created_at`, and normalizes raw stored rows into
//! [`Record`]s on the way out. Each operation is one round trip; there is
//! no retry and nothing is ever partially applied.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::db::{DbConnection, NewRecordRow, RecordRow};

use super::models::{Category, Record, RecordKind};
use super::{resolve_selector, DateRange, LedgerError, ValidationError};

/// Command for creating a record. The category arrives as free text and is
/// coerced onto the fixed set; unknown names land in the `other` bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct AddRecord {
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category: String,
}

#[derive(Clone)]
pub struct LedgerService {
    db: DbConnection,
}

impl LedgerService {
    /// Build a service around an injected store handle.
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Validate and persist a new record; returns it with the assigned id.
    pub async fn add_record(
        &self,
        kind: RecordKind,
        command: AddRecord,
    ) -> Result<Record, LedgerError> {
        if command.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription.into());
        }
        if command.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount.into());
        }

        let category = Category::parse(&command.category, kind);
        let created_at = Utc::now();

        let id = self
            .db
            .insert(
                kind,
                &NewRecordRow {
                    description: command.description.clone(),
                    amount: command.amount.to_string(),
                    date: command.date.format("%Y-%m-%d").to_string(),
                    category: category.as_str().to_string(),
                    created_at: created_at.to_rfc3339(),
                },
            )
            .await?;

        info!(
            "added {} record {}: {} on {} ({})",
            kind.as_str(),
            id,
            command.amount,
            command.date,
            category.as_str()
        );

        Ok(Record {
            id,
            description: command.description,
            amount: command.amount,
            date: command.date,
            category,
            created_at,
            kind,
        })
    }

    /// Fetch records of a kind, optionally limited to an inclusive date
    /// range. Ordering is unspecified; callers that need chronological
    /// order sort explicitly.
    pub async fn records(
        &self,
        kind: RecordKind,
        range: Option<&DateRange>,
    ) -> Result<Vec<Record>, LedgerError> {
        let rows = match range {
            Some(range) => {
                self.db
                    .find_by_range(kind, &range.start_iso(), &range.end_iso())
                    .await?
            }
            None => self.db.find_all(kind).await?,
        };
        rows.into_iter().map(|row| Self::normalize(kind, row)).collect()
    }

    /// Resolve a period selector (`yyyy-mm` or `yyyy`; `None` means no
    /// filter) and fetch the matching records.
    pub async fn records_for_selector(
        &self,
        kind: RecordKind,
        selector: Option<&str>,
    ) -> Result<Vec<Record>, LedgerError> {
        let range = resolve_selector(selector)?;
        self.records(kind, range.as_ref()).await
    }

    /// Delete a record by id. Returns `false` when no such record exists;
    /// only a store failure is an error.
    pub async fn delete_record(&self, kind: RecordKind, id: &str) -> Result<bool, LedgerError> {
        let deleted = self.db.delete_by_id(kind, id).await? > 0;
        if deleted {
            info!("deleted {} record {}", kind.as_str(), id);
        } else {
            info!("delete of {} record {}: not found", kind.as_str(), id);
        }
        Ok(deleted)
    }

    /// Turn a raw stored row into a domain record. An unrecognized category
    /// falls back to `Other`; an unreadable amount, date, or timestamp is a
    /// storage fault, never a silent default.
    fn normalize(kind: RecordKind, row: RecordRow) -> Result<Record, LedgerError> {
        let amount = row
            .amount
            .parse::<Decimal>()
            .map_err(|e| LedgerError::CorruptRecord {
                id: row.id.clone(),
                reason: format!("amount '{}': {}", row.amount, e),
            })?;
        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|e| {
            LedgerError::CorruptRecord {
                id: row.id.clone(),
                reason: format!("date '{}': {}", row.date, e),
            }
        })?;
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| LedgerError::CorruptRecord {
                id: row.id.clone(),
                reason: format!("created_at '{}': {}", row.created_at, e),
            })?;

        Ok(Record {
            id: row.id,
            description: row.description,
            amount,
            date,
            category: Category::parse(&row.category, kind),
            created_at,
            kind,
        })
    }
}
