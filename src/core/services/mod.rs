//! Per-entity facades combining the shared store with the query engine.

pub mod account_service;
pub mod budget_service;
pub mod goal_service;
pub mod notification_service;
pub mod summary_service;
pub mod transaction_service;

pub use account_service::AccountService;
pub use budget_service::BudgetService;
pub use goal_service::{GoalProgress, GoalService};
pub use notification_service::NotificationService;
pub use summary_service::{DashboardSummary, SummaryService};
pub use transaction_service::TransactionService;

use crate::errors::FinanceError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Finance(#[from] FinanceError),
}

impl ServiceError {
    /// Input field to highlight, when the failure came from form validation.
    pub fn field(&self) -> Option<&str> {
        match self {
            ServiceError::Finance(err) => err.field(),
        }
    }
}
