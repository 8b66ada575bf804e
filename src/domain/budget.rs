//! Domain types representing monthly budget categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::aggregate;
use crate::domain::common::*;
use crate::domain::validation::{parse_non_negative, require_text};
use crate::errors::{FinanceError, FinanceResult};
use crate::query::{SortField, SortKey, Sortable};
use crate::utils::generate_id;

/// Health of a budget category, derived from `allocated` and `spent`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetStatus {
    OnTrack,
    Warning,
    OverBudget,
}

impl BudgetStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetStatus::OnTrack => "on-track",
            BudgetStatus::Warning => "warning",
            BudgetStatus::OverBudget => "over-budget",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BudgetStatus {
    type Err = FinanceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "on-track" => Ok(BudgetStatus::OnTrack),
            "warning" => Ok(BudgetStatus::Warning),
            "over-budget" => Ok(BudgetStatus::OverBudget),
            other => Err(FinanceError::validation(
                "status",
                format!("`{}` is not on-track, warning or over-budget", other),
            )),
        }
    }
}

/// A monthly allocation with tracked spend.
///
/// Only the base amounts are stored; `remaining` and `status` are computed on
/// every read so they cannot go stale after an edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetCategory {
    pub id: String,
    pub name: String,
    pub allocated: f64,
    pub spent: f64,
    pub month: String,
}

impl BudgetCategory {
    pub fn new(name: impl Into<String>, allocated: f64, spent: f64, month: impl Into<String>) -> Self {
        Self {
            id: generate_id("budget"),
            name: name.into(),
            allocated,
            spent,
            month: month.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// May be negative when the category is over budget.
    pub fn remaining(&self) -> f64 {
        self.allocated - self.spent
    }

    pub fn status(&self) -> BudgetStatus {
        aggregate::budget_status(self.allocated, self.spent)
    }

    /// Spent as a percentage of the allocation; `None` when nothing is allocated.
    pub fn percent_used(&self) -> Option<f64> {
        if self.allocated > 0.0 {
            Some(self.spent / self.allocated * 100.0)
        } else {
            None
        }
    }

    pub fn validate(&self) -> FinanceResult<()> {
        if self.id.trim().is_empty() {
            return Err(FinanceError::validation("id", "is required"));
        }
        if self.name.trim().is_empty() {
            return Err(FinanceError::validation("name", "is required"));
        }
        if !self.allocated.is_finite() || self.allocated < 0.0 {
            return Err(FinanceError::validation("allocated", "must be a non-negative number"));
        }
        if !self.spent.is_finite() || self.spent < 0.0 {
            return Err(FinanceError::validation("spent", "must be a non-negative number"));
        }
        Ok(())
    }
}

impl Identifiable for BudgetCategory {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for BudgetCategory {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for BudgetCategory {
    fn display_label(&self) -> String {
        format!("{} ({}, {})", self.name, self.month, self.status())
    }
}

impl Sortable for BudgetCategory {
    const ENTITY: &'static str = "budget";

    fn sortable_fields() -> &'static [SortField] {
        &[SortField::Name, SortField::Amount]
    }

    fn sort_key(&self, field: SortField) -> Option<SortKey<'_>> {
        match field {
            SortField::Name => Some(SortKey::Text(&self.name)),
            SortField::Amount => Some(SortKey::Number(self.allocated)),
            _ => None,
        }
    }
}

/// Raw add/edit-budget form input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetDraft {
    pub name: String,
    pub allocated: String,
    /// Blank means nothing spent yet; anything else must parse.
    #[serde(default)]
    pub spent: Option<String>,
    pub month: String,
}

impl BudgetDraft {
    pub fn into_budget(self) -> FinanceResult<BudgetCategory> {
        let name = require_text("name", &self.name)?;
        let allocated = parse_non_negative("allocated", &self.allocated)?;
        let spent = match self.spent.as_deref().map(str::trim) {
            None | Some("") => 0.0,
            Some(raw) => parse_non_negative("spent", raw)?,
        };
        let month = require_text("month", &self.month)?;
        Ok(BudgetCategory::new(name, allocated, spent, month))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_remaining_follow_edits() {
        let mut budget = BudgetCategory::new("Groceries", 500.0, 320.0, "May 2023");
        assert_eq!(budget.status(), BudgetStatus::OnTrack);
        assert_eq!(budget.remaining(), 180.0);

        budget.spent = 480.0;
        assert_eq!(budget.status(), BudgetStatus::Warning);

        budget.spent = 550.0;
        assert_eq!(budget.status(), BudgetStatus::OverBudget);
        assert_eq!(budget.remaining(), -50.0);
    }

    #[test]
    fn serialized_budget_has_no_stored_status() {
        let budget = BudgetCategory::new("Dining", 300.0, 350.0, "May 2023").with_id("b1");
        let json = serde_json::to_value(&budget).unwrap();
        assert!(json.get("status").is_none());
        assert!(json.get("remaining").is_none());
        assert_eq!(
            serde_json::to_value(budget.status()).unwrap(),
            serde_json::json!("over-budget")
        );
    }

    #[test]
    fn draft_treats_blank_spent_as_nothing_spent() {
        let draft = BudgetDraft {
            name: "Travel".into(),
            allocated: "400".into(),
            spent: Some(" ".into()),
            month: "June 2023".into(),
        };
        let budget = draft.into_budget().unwrap();
        assert_eq!(budget.spent, 0.0);
    }

    #[test]
    fn draft_rejects_non_numeric_allocation() {
        let draft = BudgetDraft {
            name: "Travel".into(),
            allocated: "four hundred".into(),
            spent: None,
            month: "June 2023".into(),
        };
        assert_eq!(draft.into_budget().unwrap_err().field(), Some("allocated"));
    }

    #[test]
    fn percent_used_requires_allocation() {
        assert_eq!(BudgetCategory::new("x", 0.0, 10.0, "m").percent_used(), None);
        assert_eq!(BudgetCategory::new("x", 200.0, 50.0, "m").percent_used(), Some(25.0));
    }
}
