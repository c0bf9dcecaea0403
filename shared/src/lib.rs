//! Shared request/response types for the ledger API.
//!
//! These are the wire shapes exchanged between the backend and any front end.
//! Domain types live in the backend crate; the REST layer maps between the
//! two so the wire format can evolve independently of the domain model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A persisted expense or income record as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDto {
    pub id: String,
    pub description: String,
    /// Always non-negative; the record kind says which side of the ledger
    /// it sits on.
    pub amount: Decimal,
    /// Calendar date of the transaction (no time-of-day semantics).
    pub date: NaiveDate,
    /// Canonical category name (`food`, `salary`, ..., or `other`).
    pub category: String,
    /// Set by the server at insertion; audit only.
    pub created_at: DateTime<Utc>,
    /// `expense` or `income`.
    pub kind: String,
}

/// Body for `POST /api/expenses` and `POST /api/income`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddRecordRequest {
    /// Free-text label; must be non-empty.
    pub description: String,
    /// Must be greater than zero.
    pub amount: Decimal,
    /// ISO `yyyy-mm-dd`.
    pub date: NaiveDate,
    /// Category name; unknown values land in the `other` bucket.
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordListResponse {
    pub records: Vec<RecordDto>,
}

/// Outcome of `DELETE /api/records/{kind}/{id}`.
///
/// `deleted = false` means the id did not exist; that is a normal result,
/// not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRecordResponse {
    pub success: bool,
    pub deleted: bool,
}

/// One slice of the category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotalDto {
    pub category: String,
    /// Human-facing label for the category.
    pub label: String,
    pub total: Decimal,
    /// Share of the grand total, 0-100, rounded to two decimals.
    /// Zero when the grand total is zero.
    pub percentage: Decimal,
}

/// One month of the trend series, labelled `yyyy-mm`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotalDto {
    pub month: String,
    pub total: Decimal,
}

/// One day of activity. Days without records are simply absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotalDto {
    pub date: NaiveDate,
    pub total: Decimal,
}

/// The single largest expense in the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighestExpenseDto {
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// Weekday with the highest summed spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayTotalDto {
    pub weekday: String,
    pub total: Decimal,
}

/// Response for `GET /api/stats/summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummaryDto {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    /// Income minus expenses; negative when the period overspent.
    pub balance: Decimal,
    pub expense_count: usize,
    /// Average expense amount; zero when there are no expenses.
    pub average_expense: Decimal,
    pub highest_expense: Option<HighestExpenseDto>,
    pub busiest_weekday: Option<WeekdayTotalDto>,
}
