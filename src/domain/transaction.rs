use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{Displayable, Identifiable};
use crate::domain::validation::{optional_text, parse_instant, parse_non_negative, require_text};
use crate::errors::{FinanceError, FinanceResult};
use crate::query::{Filterable, SearchField, SortField, SortKey, Sortable};
use crate::utils::generate_id;

/// Categories offered by the add-transaction form.
pub const SUGGESTED_CATEGORIES: &[&str] = &[
    "Food & Dining",
    "Shopping",
    "Housing",
    "Transportation",
    "Entertainment",
    "Utilities",
    "Health",
    "Travel",
    "Income",
    "Other",
];

/// Direction of a movement of funds.
///
/// `credit` and `debit` are accepted as synonyms of `income` and `expense`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[serde(alias = "credit")]
    Income,
    #[serde(alias = "debit")]
    Expense,
}

impl TransactionKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Applies the direction to a non-negative magnitude.
    pub fn signed(&self, amount: f64) -> f64 {
        match self {
            TransactionKind::Income => amount,
            TransactionKind::Expense => -amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TransactionKind {
    type Err = FinanceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "credit" => Ok(TransactionKind::Income),
            "expense" | "debit" => Ok(TransactionKind::Expense),
            other => Err(FinanceError::validation(
                "type",
                format!("`{}` is not income, expense, credit or debit", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    #[default]
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TransactionStatus {
    type Err = FinanceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "failed" => Ok(TransactionStatus::Failed),
            other => Err(FinanceError::validation(
                "status",
                format!("`{}` is not pending, completed or failed", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Merchant {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Merchant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logo: None,
        }
    }
}

/// A dated, categorised movement of funds against an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: DateTime<Utc>,
    pub description: String,
    /// Non-negative magnitude; the direction lives in `kind`.
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    /// Account id or display name.
    pub account: String,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default)]
    pub flagged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<Merchant>,
}

impl Transaction {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        kind: TransactionKind,
        category: impl Into<String>,
        account: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: generate_id("tx"),
            date,
            description: description.into(),
            amount,
            kind,
            category: category.into(),
            account: account.into(),
            status: TransactionStatus::Completed,
            flagged: false,
            notes: None,
            merchant: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_merchant(mut self, merchant: Merchant) -> Self {
        self.merchant = Some(merchant);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn mark_flagged(mut self) -> Self {
        self.flagged = true;
        self
    }

    /// Signed amount: positive for income, negative for expenses.
    pub fn signed_amount(&self) -> f64 {
        self.kind.signed(self.amount)
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Checks invariants for records that did not come through a draft.
    pub fn validate(&self) -> FinanceResult<()> {
        if self.id.trim().is_empty() {
            return Err(FinanceError::validation("id", "is required"));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(FinanceError::validation("amount", "must be a non-negative number"));
        }
        if self.description.trim().is_empty() {
            return Err(FinanceError::validation("description", "is required"));
        }
        Ok(())
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("{} [{} {}]", self.description, self.kind, self.status)
    }
}

impl Filterable for Transaction {
    fn default_search_fields() -> &'static [SearchField] {
        &[
            SearchField::Description,
            SearchField::Merchant,
            SearchField::Category,
        ]
    }

    fn text_field(&self, field: SearchField) -> Option<&str> {
        match field {
            SearchField::Description => Some(&self.description),
            SearchField::Category => Some(&self.category),
            SearchField::Merchant => self.merchant.as_ref().map(|m| m.name.as_str()),
            SearchField::Name | SearchField::Institution => None,
        }
    }

    fn matches_kind(&self, kind: &str) -> bool {
        kind.parse::<TransactionKind>()
            .map_or(false, |wanted| wanted == self.kind)
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn account_ref(&self) -> Option<&str> {
        Some(&self.account)
    }

    fn status(&self) -> Option<TransactionStatus> {
        Some(self.status)
    }

    fn flagged(&self) -> Option<bool> {
        Some(self.flagged)
    }

    fn occurred_at(&self) -> Option<DateTime<Utc>> {
        Some(self.date)
    }
}

impl Sortable for Transaction {
    const ENTITY: &'static str = "transaction";

    fn sortable_fields() -> &'static [SortField] {
        &[SortField::Date, SortField::Amount, SortField::Description]
    }

    fn sort_key(&self, field: SortField) -> Option<SortKey<'_>> {
        match field {
            SortField::Date => Some(SortKey::Instant(self.date)),
            SortField::Amount => Some(SortKey::Number(self.amount)),
            SortField::Description => Some(SortKey::Text(&self.description)),
            SortField::Name => None,
        }
    }
}

/// Raw add-transaction form input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub description: String,
    pub amount: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub account: String,
    pub date: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub merchant: Option<String>,
}

impl TransactionDraft {
    pub fn into_transaction(self) -> FinanceResult<Transaction> {
        let description = require_text("description", &self.description)?;
        let amount = parse_non_negative("amount", &self.amount)?;
        let kind: TransactionKind = self.kind.parse()?;
        let category = require_text("category", &self.category)?;
        let account = require_text("account", &self.account)?;
        let date = parse_instant("date", &self.date)?;
        let status = match optional_text(self.status.as_deref()) {
            Some(raw) => raw.parse()?,
            None => TransactionStatus::Completed,
        };
        let mut txn = Transaction::new(description, amount, kind, category, account, date)
            .with_status(status);
        txn.notes = optional_text(self.notes.as_deref());
        txn.merchant = optional_text(self.merchant.as_deref()).map(Merchant::new);
        Ok(txn)
    }
}
