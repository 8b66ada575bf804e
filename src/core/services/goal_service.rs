use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::domain::{Goal, GoalDraft};
use crate::query::{self, SortSpec};
use crate::store::FinanceStore;

use super::ServiceResult;

/// A goal with its derived progress at a given instant.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal: Goal,
    pub percent: u32,
    pub days_remaining: i64,
    pub amount_left: f64,
}

impl GoalProgress {
    pub fn is_complete(&self) -> bool {
        self.percent >= 100
    }

    pub fn is_overdue(&self) -> bool {
        self.days_remaining < 0 && !self.is_complete()
    }
}

pub struct GoalService;

impl GoalService {
    pub fn list(store: &FinanceStore, order: SortSpec) -> ServiceResult<Vec<Goal>> {
        Ok(query::sort(&store.goals(), order)?)
    }

    /// Derived progress for every goal.
    pub fn progress(store: &FinanceStore, now: DateTime<Utc>) -> ServiceResult<Vec<GoalProgress>> {
        store
            .goals()
            .iter()
            .map(|goal| -> ServiceResult<GoalProgress> {
                Ok(GoalProgress {
                    percent: goal.progress_percent()?,
                    days_remaining: goal.days_remaining(now),
                    amount_left: goal.amount_left(),
                    goal: goal.clone(),
                })
            })
            .collect()
    }

    pub fn add(store: &FinanceStore, draft: GoalDraft) -> ServiceResult<Goal> {
        store.add_goal(draft).map_err(|err| {
            warn!(%err, "goal rejected");
            err.into()
        })
    }

    pub fn edit(store: &FinanceStore, id: &str, draft: GoalDraft) -> ServiceResult<Goal> {
        store.edit_goal(id, draft).map_err(|err| {
            warn!(id, %err, "goal edit rejected");
            err.into()
        })
    }

    pub fn delete(store: &FinanceStore, id: &str) -> ServiceResult<Goal> {
        Ok(store.delete_goal(id)?)
    }
}
