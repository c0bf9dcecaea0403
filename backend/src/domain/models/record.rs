//! Domain model for a ledger record.
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Discriminator between the two independent record collections.
///
/// The kind decides which store collection a record lives in and which
/// category set applies to it. It never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Expense,
    Income,
}

impl RecordKind {
    pub const ALL: [RecordKind; 2] = [RecordKind::Expense, RecordKind::Income];

    /// Name of the store collection backing this kind.
    pub fn collection(self) -> &'static str {
        match self {
            RecordKind::Expense => "expenses",
            RecordKind::Income => "income",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Expense => "expense",
            RecordKind::Income => "income",
        }
    }

    /// Parse a kind from a path segment. Accepts the plural collection
    /// names as well since both appear in client URLs.
    pub fn parse(value: &str) -> Option<RecordKind> {
        match value {
            "expense" | "expenses" => Some(RecordKind::Expense),
            "income" => Some(RecordKind::Income),
            _ => None,
        }
    }
}

/// Fixed category set across both record kinds.
///
/// Expense records use `Food` through `Grocery`; income records use
/// `Income` through `Bonus`. `Other` is the fallback bucket: parsing never
/// fails, so records with a missing or unrecognized category still
/// aggregate instead of erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Education,
    Health,
    Transportation,
    Grocery,
    Income,
    Allowance,
    Salary,
    Bonus,
    Other,
}

/// Display metadata for a category. The mapping in [`Category::info`] is
/// total, with an explicit `Other` arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub label: &'static str,
    pub icon: &'static str,
}

impl Category {
    /// Map a stored category name onto the fixed set for the given kind.
    /// Anything outside that kind's set falls back to `Other`.
    pub fn parse(value: &str, kind: RecordKind) -> Category {
        match (kind, value) {
            (RecordKind::Expense, "food") => Category::Food,
            (RecordKind::Expense, "education") => Category::Education,
            (RecordKind::Expense, "health") => Category::Health,
            (RecordKind::Expense, "transportation") => Category::Transportation,
            (RecordKind::Expense, "grocery") => Category::Grocery,
            (RecordKind::Income, "income") => Category::Income,
            (RecordKind::Income, "allowance") => Category::Allowance,
            (RecordKind::Income, "salary") => Category::Salary,
            (RecordKind::Income, "bonus") => Category::Bonus,
            _ => Category::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Education => "education",
            Category::Health => "health",
            Category::Transportation => "transportation",
            Category::Grocery => "grocery",
            Category::Income => "income",
            Category::Allowance => "allowance",
            Category::Salary => "salary",
            Category::Bonus => "bonus",
            Category::Other => "other",
        }
    }

    pub fn info(self) -> CategoryInfo {
        match self {
            Category::Food => CategoryInfo { label: "Food", icon: "utensils" },
            Category::Education => CategoryInfo { label: "Education", icon: "book" },
            Category::Health => CategoryInfo { label: "Health", icon: "first-aid" },
            Category::Transportation => CategoryInfo { label: "Transportation", icon: "bus" },
            Category::Grocery => CategoryInfo { label: "Grocery", icon: "shopping-bag" },
            Category::Income => CategoryInfo { label: "Income", icon: "banknote" },
            Category::Allowance => CategoryInfo { label: "Allowance", icon: "piggy-bank" },
            Category::Salary => CategoryInfo { label: "Salary", icon: "briefcase" },
            Category::Bonus => CategoryInfo { label: "Bonus", icon: "gift" },
            Category::Other => CategoryInfo { label: "Other", icon: "shopping-bag" },
        }
    }
}

/// A single persisted expense or income entry.
///
/// Records are created once and deleted by id; there is no update
/// operation. `created_at` is audit metadata and never drives business
/// logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub description: String,
    /// Non-negative money amount; summed with fixed-point arithmetic.
    pub amount: Decimal,
    /// Calendar date; persisted as ISO `yyyy-mm-dd` text.
    pub date: NaiveDate,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub kind: RecordKind,
}

impl Record {
    /// The `yyyy-mm` grouping label used by the monthly series.
    pub fn month_label(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}
