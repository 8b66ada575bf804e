use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate;
use crate::currency::CurrencyCode;
use crate::domain::common::*;
use crate::domain::transaction::TransactionKind;
use crate::domain::validation::{optional_text, parse_number, require_text};
use crate::errors::{FinanceError, FinanceResult};
use crate::query::{Filterable, SearchField, SortField, SortKey, Sortable};

/// Represents a named store of funds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    pub balance: f64,
    #[serde(default)]
    pub currency: CurrencyCode,
    /// Masked display string such as `****4582`.
    pub account_number: String,
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transaction: Option<LastTransaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_credit: Option<f64>,
    /// Annual percentage yield, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
}

impl Account {
    pub fn new(
        name: impl Into<String>,
        kind: AccountKind,
        balance: f64,
        institution: impl Into<String>,
    ) -> Self {
        let uuid = Uuid::new_v4();
        Self {
            id: format!("acc-{}", uuid.simple()),
            name: name.into(),
            kind,
            balance,
            currency: CurrencyCode::default(),
            account_number: masked_number(uuid),
            institution: institution.into(),
            color: Some(kind.default_color().to_string()),
            last_transaction: None,
            available_credit: None,
            interest_rate: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_account_number(mut self, number: impl Into<String>) -> Self {
        self.account_number = number.into();
        self
    }

    pub fn with_available_credit(mut self, available: f64) -> Self {
        self.available_credit = Some(available);
        self
    }

    pub fn with_interest_rate(mut self, apy_percent: f64) -> Self {
        self.interest_rate = Some(apy_percent);
        self
    }

    pub fn with_last_transaction(mut self, last: LastTransaction) -> Self {
        self.last_transaction = Some(last);
        self
    }

    /// Share of the credit line in use; only for accounts that report available credit.
    pub fn credit_utilization(&self) -> Option<f64> {
        aggregate::credit_utilization(self.balance, self.available_credit)
    }

    pub fn credit_limit(&self) -> Option<f64> {
        self.available_credit.map(|available| self.balance + available)
    }

    pub fn validate(&self) -> FinanceResult<()> {
        if self.id.trim().is_empty() {
            return Err(FinanceError::validation("id", "is required"));
        }
        if self.name.trim().is_empty() {
            return Err(FinanceError::validation("name", "is required"));
        }
        if !self.balance.is_finite() {
            return Err(FinanceError::validation("balance", "must be a number"));
        }
        if let Some(available) = self.available_credit {
            if !available.is_finite() || available < 0.0 {
                return Err(FinanceError::validation("availableCredit", "must be a non-negative number"));
            }
        }
        if let Some(rate) = self.interest_rate {
            if !rate.is_finite() {
                return Err(FinanceError::validation("interestRate", "must be a number"));
            }
        }
        Ok(())
    }
}

impl Identifiable for Account {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Account {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Account {
    fn display_label(&self) -> String {
        format!("{} ({}, {})", self.name, self.kind, self.account_number)
    }
}

impl Filterable for Account {
    fn default_search_fields() -> &'static [SearchField] {
        &[SearchField::Name, SearchField::Institution]
    }

    fn text_field(&self, field: SearchField) -> Option<&str> {
        match field {
            SearchField::Name => Some(&self.name),
            SearchField::Institution => Some(&self.institution),
            _ => None,
        }
    }

    fn matches_kind(&self, kind: &str) -> bool {
        kind.parse::<AccountKind>()
            .map_or(false, |wanted| wanted == self.kind)
    }
}

impl Sortable for Account {
    const ENTITY: &'static str = "account";

    fn sortable_fields() -> &'static [SortField] {
        &[SortField::Name, SortField::Amount]
    }

    fn sort_key(&self, field: SortField) -> Option<SortKey<'_>> {
        match field {
            SortField::Name => Some(SortKey::Text(&self.name)),
            SortField::Amount => Some(SortKey::Number(self.balance)),
            _ => None,
        }
    }
}

/// Enumerates the supported account classifications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Checking,
    Savings,
    Credit,
    Investment,
}

impl AccountKind {
    pub const ALL: [AccountKind; 4] = [
        AccountKind::Checking,
        AccountKind::Savings,
        AccountKind::Credit,
        AccountKind::Investment,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
            AccountKind::Credit => "credit",
            AccountKind::Investment => "investment",
        }
    }

    /// Display hint used when an account is created without a color.
    pub fn default_color(&self) -> &'static str {
        match self {
            AccountKind::Checking => "#3b82f6",
            AccountKind::Savings => "#10b981",
            AccountKind::Credit => "#ef4444",
            AccountKind::Investment => "#8b5cf6",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AccountKind {
    type Err = FinanceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        AccountKind::ALL
            .into_iter()
            .find(|kind| kind.label() == normalized)
            .ok_or_else(|| {
                FinanceError::validation(
                    "type",
                    format!("`{}` is not checking, savings, credit or investment", normalized),
                )
            })
    }
}

/// Summary of the most recent movement on an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LastTransaction {
    pub amount: f64,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

fn masked_number(seed: Uuid) -> String {
    let digits = 1000 + (seed.as_u128() % 9000) as u32;
    format!("****{}", digits)
}

/// Raw add-account form input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub balance: String,
    pub currency: String,
    #[serde(default)]
    pub account_number: Option<String>,
    pub institution: String,
}

impl AccountDraft {
    pub fn into_account(self) -> FinanceResult<Account> {
        let name = require_text("name", &self.name)?;
        let kind: AccountKind = self.kind.parse()?;
        let balance = parse_number("balance", &self.balance)?;
        let currency = CurrencyCode::parse(&self.currency)?;
        let institution = require_text("institution", &self.institution)?;
        let mut account = Account::new(name, kind, balance, institution).with_currency(currency);
        if let Some(number) = optional_text(self.account_number.as_deref()) {
            account.account_number = number;
        }
        Ok(account)
    }
}
