pub mod account;
pub mod budget;
pub mod common;
pub mod goal;
pub mod notification;
pub mod transaction;
pub mod validation;

pub use account::{Account, AccountDraft, AccountKind, LastTransaction};
pub use budget::{BudgetCategory, BudgetDraft, BudgetStatus};
pub use common::{Displayable, Identifiable, NamedEntity};
pub use goal::{Goal, GoalDraft};
pub use notification::{Notification, NotificationFilter, NotificationKind};
pub use transaction::{Merchant, Transaction, TransactionDraft, TransactionKind, TransactionStatus};
