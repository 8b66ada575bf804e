//! Predicate composition over accounts and transactions.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::Identifiable;
use crate::domain::transaction::TransactionStatus;
use crate::errors::FinanceError;

const DAY_MILLIS: i64 = 86_400_000;

/// Text attributes a search term may be matched against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Name,
    Description,
    Institution,
    Category,
    Merchant,
}

/// Relative window ending at the injected "now".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DateRange {
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
    #[default]
    #[serde(rename = "all")]
    All,
}

impl DateRange {
    pub fn window_days(&self) -> Option<i64> {
        match self {
            DateRange::Last7Days => Some(7),
            DateRange::Last30Days => Some(30),
            DateRange::Last90Days => Some(90),
            DateRange::All => None,
        }
    }

    /// Whole days elapsed between `date` and `now`, floored.
    pub fn days_since(date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        (now - date).num_milliseconds().div_euclid(DAY_MILLIS)
    }

    pub fn contains(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.window_days() {
            None => true,
            Some(bound) => Self::days_since(date, now) <= bound,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateRange::Last7Days => "Last 7 days",
            DateRange::Last30Days => "Last 30 days",
            DateRange::Last90Days => "Last 90 days",
            DateRange::All => "All time",
        }
    }
}

impl FromStr for DateRange {
    type Err = FinanceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "7d" => Ok(DateRange::Last7Days),
            "30d" => Ok(DateRange::Last30Days),
            "90d" => Ok(DateRange::Last90Days),
            "all" => Ok(DateRange::All),
            other => Err(FinanceError::validation(
                "dateRange",
                format!("`{}` is not one of 7d, 30d, 90d, all", other),
            )),
        }
    }
}

/// Tabs offered above the transaction list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionTab {
    #[default]
    All,
    Flagged,
    Pending,
}

impl FromStr for TransactionTab {
    type Err = FinanceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TransactionTab::All),
            "flagged" => Ok(TransactionTab::Flagged),
            "pending" => Ok(TransactionTab::Pending),
            other => Err(FinanceError::validation(
                "tab",
                format!("`{}` is not one of all, flagged, pending", other),
            )),
        }
    }
}

/// Attributes the filter engine can inspect.
///
/// Accessors returning `None` mean the entity does not carry the attribute;
/// an active predicate on a missing attribute never matches.
pub trait Filterable: Identifiable {
    /// Fields searched when the spec does not name its own.
    fn default_search_fields() -> &'static [SearchField];

    fn text_field(&self, field: SearchField) -> Option<&str>;

    /// Case-insensitive comparison against the entity's type label.
    fn matches_kind(&self, kind: &str) -> bool;

    fn category(&self) -> Option<&str> {
        None
    }

    fn account_ref(&self) -> Option<&str> {
        None
    }

    fn status(&self) -> Option<TransactionStatus> {
        None
    }

    fn flagged(&self) -> Option<bool> {
        None
    }

    fn occurred_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Composite set of optional predicates. Unset fields always match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_fields: Option<Vec<SearchField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    #[serde(default)]
    pub flagged_only: bool,
    #[serde(default)]
    pub date_range: DateRange,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn with_search_fields(mut self, fields: Vec<SearchField>) -> Self {
        self.search_fields = Some(fields);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn flagged_only(mut self) -> Self {
        self.flagged_only = true;
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    /// Applies a list tab on top of the existing predicates.
    pub fn with_tab(mut self, tab: TransactionTab) -> Self {
        match tab {
            TransactionTab::All => {}
            TransactionTab::Flagged => self.flagged_only = true,
            TransactionTab::Pending => self.status = Some(TransactionStatus::Pending),
        }
        self
    }

    /// True when no predicate is active.
    pub fn is_unrestricted(&self) -> bool {
        self.search_text.as_deref().map_or(true, str::is_empty)
            && self.category.is_none()
            && self.account.is_none()
            && self.kind.is_none()
            && self.status.is_none()
            && !self.flagged_only
            && self.date_range == DateRange::All
    }

    pub fn matches<T: Filterable>(&self, item: &T, now: DateTime<Utc>) -> bool {
        self.matches_search(item)
            && self.matches_category(item)
            && self.matches_account(item)
            && self.matches_kind(item)
            && self.matches_status(item)
            && self.matches_flag(item)
            && self.matches_date(item, now)
    }

    fn matches_search<T: Filterable>(&self, item: &T) -> bool {
        let Some(term) = self.search_text.as_deref() else {
            return true;
        };
        let needle = term.to_lowercase();
        let fields = self
            .search_fields
            .as_deref()
            .unwrap_or_else(|| T::default_search_fields());
        fields.iter().any(|field| {
            item.text_field(*field)
                .map_or(false, |text| text.to_lowercase().contains(&needle))
        })
    }

    fn matches_category<T: Filterable>(&self, item: &T) -> bool {
        match self.category.as_deref() {
            None => true,
            Some(wanted) => item.category() == Some(wanted),
        }
    }

    fn matches_account<T: Filterable>(&self, item: &T) -> bool {
        match self.account.as_deref() {
            None => true,
            Some(wanted) => item.account_ref() == Some(wanted),
        }
    }

    fn matches_kind<T: Filterable>(&self, item: &T) -> bool {
        self.kind.as_deref().map_or(true, |kind| item.matches_kind(kind))
    }

    fn matches_status<T: Filterable>(&self, item: &T) -> bool {
        match self.status {
            None => true,
            Some(wanted) => item.status() == Some(wanted),
        }
    }

    fn matches_flag<T: Filterable>(&self, item: &T) -> bool {
        !self.flagged_only || item.flagged().unwrap_or(false)
    }

    fn matches_date<T: Filterable>(&self, item: &T, now: DateTime<Utc>) -> bool {
        if self.date_range == DateRange::All {
            return true;
        }
        item.occurred_at()
            .map_or(false, |date| self.date_range.contains(date, now))
    }
}

/// Returns the items matching `spec`, preserving their relative order.
pub fn filter<T>(items: &[T], spec: &FilterSpec, now: DateTime<Utc>) -> Vec<T>
where
    T: Filterable + Clone,
{
    items
        .iter()
        .filter(|item| spec.matches(*item, now))
        .cloned()
        .collect()
}

/// Sorted, de-duplicated categories present in `items`, for populating filter choices.
pub fn distinct_categories<T: Filterable>(items: &[T]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.category())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted, de-duplicated account references present in `items`.
pub fn distinct_accounts<T: Filterable>(items: &[T]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.account_ref())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
