use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate;
use crate::domain::common::*;
use crate::domain::validation::{optional_text, parse_date, parse_non_negative, parse_positive, require_text};
use crate::errors::{FinanceError, FinanceResult};
use crate::query::{SortField, SortKey, Sortable};

const GOAL_COLORS: [&str; 6] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899",
];
const EARLIEST_DEADLINE_YEAR: i32 = 1970;
const LATEST_DEADLINE_YEAR: i32 = 2200;

/// A target savings amount with a deadline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: NaiveDate,
    pub color: String,
}

impl Goal {
    pub fn new(name: impl Into<String>, target_amount: f64, current_amount: f64, deadline: NaiveDate) -> Self {
        let uuid = Uuid::new_v4();
        Self {
            id: format!("g-{}", uuid.simple()),
            name: name.into(),
            target_amount,
            current_amount,
            deadline,
            color: palette_color(uuid).to_string(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn progress_ratio(&self) -> FinanceResult<f64> {
        aggregate::progress_ratio(self.current_amount, self.target_amount)
    }

    pub fn progress_percent(&self) -> FinanceResult<u32> {
        aggregate::progress_percent(self.current_amount, self.target_amount)
    }

    /// Negative when the deadline has passed.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        aggregate::days_until(self.deadline, now)
    }

    pub fn amount_left(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }

    pub fn validate(&self) -> FinanceResult<()> {
        if self.id.trim().is_empty() {
            return Err(FinanceError::validation("id", "is required"));
        }
        if self.name.trim().is_empty() {
            return Err(FinanceError::validation("name", "is required"));
        }
        if !self.target_amount.is_finite() || self.target_amount <= 0.0 {
            return Err(FinanceError::validation("targetAmount", "must be greater than zero"));
        }
        if !self.current_amount.is_finite() || self.current_amount < 0.0 {
            return Err(FinanceError::validation("currentAmount", "must be a non-negative number"));
        }
        Ok(())
    }
}

impl Identifiable for Goal {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Goal {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Goal {
    fn display_label(&self) -> String {
        format!("{} (due {})", self.name, self.deadline)
    }
}

impl Sortable for Goal {
    const ENTITY: &'static str = "goal";

    fn sortable_fields() -> &'static [SortField] {
        &[SortField::Name, SortField::Amount, SortField::Date]
    }

    fn sort_key(&self, field: SortField) -> Option<SortKey<'_>> {
        match field {
            SortField::Name => Some(SortKey::Text(&self.name)),
            SortField::Amount => Some(SortKey::Number(self.target_amount)),
            SortField::Date => Some(SortKey::Day(self.deadline)),
            SortField::Description => None,
        }
    }
}

fn palette_color(seed: Uuid) -> &'static str {
    GOAL_COLORS[(seed.as_u128() % GOAL_COLORS.len() as u128) as usize]
}

/// Raw add/edit-goal form input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDraft {
    pub name: String,
    pub target_amount: String,
    pub current_amount: String,
    pub deadline: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl GoalDraft {
    pub fn into_goal(self) -> FinanceResult<Goal> {
        let name = require_text("name", &self.name)?;
        let target = parse_positive("targetAmount", &self.target_amount)?;
        let current = parse_non_negative("currentAmount", &self.current_amount)?;
        let deadline = parse_date("deadline", &self.deadline)?;
        if !(EARLIEST_DEADLINE_YEAR..=LATEST_DEADLINE_YEAR).contains(&deadline.year()) {
            return Err(FinanceError::validation("deadline", "is out of range"));
        }
        let mut goal = Goal::new(name, target, current, deadline);
        if let Some(color) = optional_text(self.color.as_deref()) {
            goal.color = color;
        }
        Ok(goal)
    }

    /// Applies an edit, keeping the goal's id and, unless the form names one,
    /// its color.
    pub fn apply_to(self, goal: &mut Goal) -> FinanceResult<()> {
        let explicit_color = optional_text(self.color.as_deref());
        let mut updated = self.into_goal()?;
        updated.id = goal.id.clone();
        updated.color = explicit_color.unwrap_or_else(|| goal.color.clone());
        *goal = updated;
        Ok(())
    }
}
