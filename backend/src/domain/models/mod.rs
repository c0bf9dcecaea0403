//! Domain models.
pub mod record;

pub use record::{Category, CategoryInfo, Record, RecordKind};
