use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use shared_database::Record;
use shared_models::AppError;

// ==============================================================================
// LEDGER MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Revenue,
    Expense,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Revenue => write!(f, "revenue"),
            EntryKind::Expense => write!(f, "expense"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Consultation,
    Surgery,
    Exam,
    Vaccine,
    Medication,
    Boarding,
    Grooming,
    Supplies,
    Salaries,
    Rent,
    Other,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Consultation,
        Category::Surgery,
        Category::Exam,
        Category::Vaccine,
        Category::Medication,
        Category::Boarding,
        Category::Grooming,
        Category::Supplies,
        Category::Salaries,
        Category::Rent,
        Category::Other,
    ];

    /// Label shown on the finance page.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Consultation => "Consulta",
            Category::Surgery => "Cirurgia",
            Category::Exam => "Exame",
            Category::Vaccine => "Vacina",
            Category::Medication => "Medicamento",
            Category::Boarding => "Hospedagem",
            Category::Grooming => "Banho e Tosa",
            Category::Supplies => "Insumos",
            Category::Salaries => "Salários",
            Category::Rent => "Aluguel",
            Category::Other => "Outros",
        }
    }
}

/// One revenue or expense line. `amount` is always positive; `kind` gives the sign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub kind: EntryKind,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    pub category: Category,
    pub appointment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for LedgerEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl LedgerEntry {
    /// Amount with revenue positive and expense negative.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            EntryKind::Revenue => self.amount,
            EntryKind::Expense => -self.amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    pub kind: EntryKind,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    pub category: Category,
    pub appointment_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEntryRequest {
    pub kind: Option<EntryKind>,
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub appointment_id: Option<Uuid>,
}

impl UpdateEntryRequest {
    pub fn apply(self, entry: &mut LedgerEntry, now: DateTime<Utc>) {
        if let Some(kind) = self.kind {
            entry.kind = kind;
        }
        if let Some(amount) = self.amount {
            entry.amount = amount;
        }
        if let Some(date) = self.date {
            entry.date = date;
        }
        if let Some(description) = self.description {
            entry.description = description;
        }
        if let Some(category) = self.category {
            entry.category = category;
        }
        if let Some(appointment_id) = self.appointment_id {
            entry.appointment_id = Some(appointment_id);
        }
        entry.updated_at = now;
    }
}

// ==============================================================================
// SUMMARY MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialSummary {
    /// Yearly revenue minus yearly expense.
    pub balance: f64,
    pub monthly_revenue: f64,
    pub monthly_expense: f64,
    pub yearly_revenue: f64,
    pub yearly_expense: f64,
    pub recent_entries: Vec<LedgerEntry>,
    pub revenue_by_category: BTreeMap<Category, f64>,
    pub expense_by_category: BTreeMap<Category, f64>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FinanceError {
    #[error("Ledger entry not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<FinanceError> for AppError {
    fn from(err: FinanceError) -> Self {
        match err {
            FinanceError::NotFound => AppError::NotFound(err.to_string()),
            FinanceError::ValidationError(_) => AppError::ValidationError(err.to_string()),
        }
    }
}
