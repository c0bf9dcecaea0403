//! Domain layer: month range resolution, the ledger query service, and the
//! aggregation engine. Everything here is independent of the HTTP surface;
//! only the ledger service talks to the store.

pub mod aggregation;
pub mod date_range;
pub mod ledger;
pub mod models;

pub use date_range::{resolve_selector, DateRange, PeriodSelector};
pub use ledger::{AddRecord, LedgerService};

/// Input problems with a core operation. Reported to the immediate caller;
/// nothing is partially applied.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("description cannot be empty")]
    EmptyDescription,
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
}

/// Error taxonomy for ledger operations.
///
/// "Not found" is deliberately absent: deleting a missing id is a normal
/// negative result (`deleted = false`), not an error.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid period selector '{0}': expected yyyy-mm or yyyy")]
    InvalidSelector(String),
    #[error("storage failure: {0}")]
    Persistence(#[from] sqlx::Error),
    /// A stored document whose amount, date, or timestamp column cannot be
    /// read back. Surfaced as a storage fault rather than silently dropped.
    #[error("corrupt record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },
}

impl LedgerError {
    /// Whether the error is the caller's fault (maps to a 4xx response).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            LedgerError::Validation(_) | LedgerError::InvalidSelector(_)
        )
    }
}
