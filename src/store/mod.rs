//! Canonical in-memory owner of every entity collection.
//!
//! Readers receive [`Snapshot`]s: shared, immutable vectors. Writers copy the
//! current vector, mutate the copy and swap it in under the write lock, so a
//! snapshot being iterated never observes a partial write. A failed mutation
//! leaves the collection untouched.

pub mod seed;

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::domain::{
    Account, AccountDraft, BudgetCategory, BudgetDraft, Goal, GoalDraft, Identifiable,
    Notification, Transaction, TransactionDraft,
};
use crate::domain::validation::parse_number;
use crate::errors::{FinanceError, FinanceResult};

pub type Snapshot<T> = Arc<Vec<T>>;

struct Collection<T> {
    entity: &'static str,
    items: RwLock<Snapshot<T>>,
}

impl<T: Clone + Identifiable> Collection<T> {
    fn new(entity: &'static str) -> Self {
        Self {
            entity,
            items: RwLock::new(Arc::new(Vec::new())),
        }
    }

    fn from_vec(entity: &'static str, items: Vec<T>) -> FinanceResult<Self> {
        let duplicate = {
            let mut seen = HashSet::new();
            items
                .iter()
                .find(|item| !seen.insert(item.id()))
                .map(|item| item.id().to_string())
        };
        if let Some(id) = duplicate {
            return Err(FinanceError::validation(
                "id",
                format!("{} `{}` already exists", entity, id),
            ));
        }
        Ok(Self {
            entity,
            items: RwLock::new(Arc::new(items)),
        })
    }

    fn snapshot(&self) -> Snapshot<T> {
        let guard = self.items.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    fn update<R>(&self, mutate: impl FnOnce(&mut Vec<T>) -> FinanceResult<R>) -> FinanceResult<R> {
        let mut guard = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = guard.as_ref().clone();
        let out = mutate(&mut next)?;
        *guard = Arc::new(next);
        Ok(out)
    }

    fn insert(&self, item: T) -> FinanceResult<T> {
        self.insert_checked(item, |_| Ok(()))
    }

    /// Inserts after `check` accepts the current items, under the same write lock.
    fn insert_checked(
        &self,
        item: T,
        check: impl FnOnce(&[T]) -> FinanceResult<()>,
    ) -> FinanceResult<T> {
        let entity = self.entity;
        self.update(|items| {
            check(items)?;
            if items.iter().any(|existing| existing.id() == item.id()) {
                return Err(FinanceError::validation(
                    "id",
                    format!("{} `{}` already exists", entity, item.id()),
                ));
            }
            items.push(item.clone());
            Ok(item)
        })
    }

    fn modify<R>(&self, id: &str, mutate: impl FnOnce(&mut T) -> FinanceResult<R>) -> FinanceResult<R> {
        let entity = self.entity;
        self.update(|items| {
            let item = items
                .iter_mut()
                .find(|item| item.id() == id)
                .ok_or_else(|| FinanceError::not_found(entity, id))?;
            mutate(item)
        })
    }

    fn remove(&self, id: &str) -> FinanceResult<T> {
        let entity = self.entity;
        self.update(|items| {
            let index = items
                .iter()
                .position(|item| item.id() == id)
                .ok_or_else(|| FinanceError::not_found(entity, id))?;
            Ok(items.remove(index))
        })
    }
}

/// Shared, injectable data provider.
pub struct FinanceStore {
    accounts: Collection<Account>,
    transactions: Collection<Transaction>,
    budgets: Collection<BudgetCategory>,
    goals: Collection<Goal>,
    notifications: Collection<Notification>,
    revision: AtomicU64,
}

impl Default for FinanceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FinanceStore {
    pub fn new() -> Self {
        Self {
            accounts: Collection::new("Account"),
            transactions: Collection::new("Transaction"),
            budgets: Collection::new("Budget"),
            goals: Collection::new("Goal"),
            notifications: Collection::new("Notification"),
            revision: AtomicU64::new(0),
        }
    }

    /// Builds a store from complete collections, rejecting duplicate ids and
    /// entities that break their own invariants.
    pub fn from_parts(
        accounts: Vec<Account>,
        transactions: Vec<Transaction>,
        budgets: Vec<BudgetCategory>,
        goals: Vec<Goal>,
        notifications: Vec<Notification>,
    ) -> FinanceResult<Self> {
        accounts.iter().try_for_each(Account::validate)?;
        transactions.iter().try_for_each(Transaction::validate)?;
        budgets.iter().try_for_each(BudgetCategory::validate)?;
        goals.iter().try_for_each(Goal::validate)?;
        let store = Self {
            accounts: Collection::from_vec("Account", accounts)?,
            transactions: Collection::from_vec("Transaction", transactions)?,
            budgets: Collection::from_vec("Budget", budgets)?,
            goals: Collection::from_vec("Goal", goals)?,
            notifications: Collection::from_vec("Notification", notifications)?,
            revision: AtomicU64::new(0),
        };
        info!(
            accounts = store.accounts().len(),
            transactions = store.transactions().len(),
            budgets = store.budgets().len(),
            goals = store.goals().len(),
            notifications = store.notifications().len(),
            "store loaded"
        );
        Ok(store)
    }

    /// Incremented after every successful write.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    fn touch(&self) {
        self.revision.fetch_add(1, Ordering::AcqRel);
    }

    pub fn accounts(&self) -> Snapshot<Account> {
        self.accounts.snapshot()
    }

    pub fn transactions(&self) -> Snapshot<Transaction> {
        self.transactions.snapshot()
    }

    pub fn budgets(&self) -> Snapshot<BudgetCategory> {
        self.budgets.snapshot()
    }

    pub fn goals(&self) -> Snapshot<Goal> {
        self.goals.snapshot()
    }

    pub fn notifications(&self) -> Snapshot<Notification> {
        self.notifications.snapshot()
    }

    pub fn account(&self, id: &str) -> Option<Account> {
        self.accounts().iter().find(|account| account.id == id).cloned()
    }

    pub fn goal(&self, id: &str) -> Option<Goal> {
        self.goals().iter().find(|goal| goal.id == id).cloned()
    }

    // ---- accounts ----

    pub fn insert_account(&self, account: Account) -> FinanceResult<Account> {
        account.validate()?;
        let account = self.accounts.insert(account)?;
        self.touch();
        info!(id = %account.id, name = %account.name, "account added");
        Ok(account)
    }

    /// Adds an account from form input; names are unique, ignoring case.
    pub fn add_account(&self, draft: AccountDraft) -> FinanceResult<Account> {
        let account = draft.into_account()?;
        account.validate()?;
        let name = normalize(&account.name);
        let account = self.accounts.insert_checked(account, |items| {
            if items.iter().any(|existing| normalize(&existing.name) == name) {
                return Err(FinanceError::validation("name", "an account with this name already exists"));
            }
            Ok(())
        })?;
        self.touch();
        info!(id = %account.id, name = %account.name, "account added");
        Ok(account)
    }

    /// Replaces an account balance from raw form input.
    pub fn set_account_balance(&self, id: &str, raw_balance: &str) -> FinanceResult<Account> {
        let balance = parse_number("balance", raw_balance)?;
        let account = self.accounts.modify(id, |account| {
            account.balance = balance;
            Ok(account.clone())
        })?;
        self.touch();
        info!(id, balance, "account balance updated");
        Ok(account)
    }

    // ---- transactions ----

    pub fn insert_transaction(&self, transaction: Transaction) -> FinanceResult<Transaction> {
        transaction.validate()?;
        let transaction = self.transactions.insert(transaction)?;
        self.touch();
        info!(id = %transaction.id, amount = transaction.amount, kind = %transaction.kind, "transaction added");
        Ok(transaction)
    }

    pub fn add_transaction(&self, draft: TransactionDraft) -> FinanceResult<Transaction> {
        self.insert_transaction(draft.into_transaction()?)
    }

    /// Flips the flag in a single write, so concurrent toggles never cancel silently.
    pub fn toggle_transaction_flag(&self, id: &str) -> FinanceResult<Transaction> {
        let transaction = self.transactions.modify(id, |txn| {
            txn.flagged = !txn.flagged;
            Ok(txn.clone())
        })?;
        self.touch();
        debug!(id, flagged = transaction.flagged, "transaction flag toggled");
        Ok(transaction)
    }

    pub fn set_transaction_flag(&self, id: &str, flagged: bool) -> FinanceResult<Transaction> {
        let transaction = self.transactions.modify(id, |txn| {
            txn.flagged = flagged;
            Ok(txn.clone())
        })?;
        self.touch();
        debug!(id, flagged, "transaction flag changed");
        Ok(transaction)
    }

    // ---- budgets ----

    pub fn insert_budget(&self, budget: BudgetCategory) -> FinanceResult<BudgetCategory> {
        budget.validate()?;
        let budget = self.budgets.insert(budget)?;
        self.touch();
        info!(id = %budget.id, name = %budget.name, "budget added");
        Ok(budget)
    }

    /// Adds a budget from form input; a name appears at most once per month.
    pub fn add_budget(&self, draft: BudgetDraft) -> FinanceResult<BudgetCategory> {
        let budget = draft.into_budget()?;
        budget.validate()?;
        let budget = self
            .budgets
            .insert_checked(budget.clone(), |items| ensure_unique_budget(items, None, &budget))?;
        self.touch();
        info!(id = %budget.id, name = %budget.name, "budget added");
        Ok(budget)
    }

    /// Replaces name, amounts and month; status is re-derived on the next read.
    pub fn edit_budget(&self, id: &str, draft: BudgetDraft) -> FinanceResult<BudgetCategory> {
        let updated = draft.into_budget()?;
        updated.validate()?;
        let budget = self.budgets.update(|items| {
            ensure_unique_budget(items, Some(id), &updated)?;
            let budget = items
                .iter_mut()
                .find(|budget| budget.id == id)
                .ok_or_else(|| FinanceError::not_found("Budget", id))?;
            budget.name = updated.name;
            budget.allocated = updated.allocated;
            budget.spent = updated.spent;
            budget.month = updated.month;
            Ok(budget.clone())
        })?;
        self.touch();
        info!(id, status = %budget.status(), "budget edited");
        Ok(budget)
    }

    // ---- goals ----

    pub fn insert_goal(&self, goal: Goal) -> FinanceResult<Goal> {
        goal.validate()?;
        let goal = self.goals.insert(goal)?;
        self.touch();
        info!(id = %goal.id, name = %goal.name, "goal added");
        Ok(goal)
    }

    pub fn add_goal(&self, draft: GoalDraft) -> FinanceResult<Goal> {
        self.insert_goal(draft.into_goal()?)
    }

    pub fn edit_goal(&self, id: &str, draft: GoalDraft) -> FinanceResult<Goal> {
        let goal = self.goals.modify(id, |goal| {
            draft.apply_to(goal)?;
            goal.validate()?;
            Ok(goal.clone())
        })?;
        self.touch();
        info!(id, "goal edited");
        Ok(goal)
    }

    pub fn delete_goal(&self, id: &str) -> FinanceResult<Goal> {
        let goal = self.goals.remove(id)?;
        self.touch();
        info!(id, "goal deleted");
        Ok(goal)
    }

    // ---- notifications ----

    pub fn push_notification(&self, notification: Notification) -> FinanceResult<Notification> {
        let notification = self.notifications.insert(notification)?;
        self.touch();
        debug!(id = %notification.id, kind = %notification.kind, "notification pushed");
        Ok(notification)
    }

    pub fn mark_notification_read(&self, id: &str) -> FinanceResult<()> {
        self.notifications.modify(id, |notification| {
            notification.read = true;
            Ok(())
        })?;
        self.touch();
        debug!(id, "notification marked read");
        Ok(())
    }

    /// Returns how many notifications changed state.
    pub fn mark_all_notifications_read(&self) -> usize {
        let changed = self
            .notifications
            .update(|items| {
                let mut changed = 0;
                for notification in items.iter_mut().filter(|n| !n.read) {
                    notification.read = true;
                    changed += 1;
                }
                Ok(changed)
            })
            .unwrap_or(0);
        self.touch();
        debug!(changed, "notifications marked read");
        changed
    }

    pub fn delete_notification(&self, id: &str) -> FinanceResult<Notification> {
        let notification = self.notifications.remove(id)?;
        self.touch();
        debug!(id, "notification deleted");
        Ok(notification)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn ensure_unique_budget(
    items: &[BudgetCategory],
    exclude: Option<&str>,
    candidate: &BudgetCategory,
) -> FinanceResult<()> {
    let name = normalize(&candidate.name);
    let taken = items.iter().any(|budget| {
        normalize(&budget.name) == name
            && budget.month.trim() == candidate.month.trim()
            && exclude.map_or(true, |id| budget.id != id)
    });
    if taken {
        return Err(FinanceError::validation(
            "name",
            format!("a budget with this name already exists for {}", candidate.month.trim()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountKind, BudgetStatus, NotificationKind, TransactionKind};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn budget_draft(spent: &str) -> BudgetDraft {
        BudgetDraft {
            name: "Dining".into(),
            allocated: "300".into(),
            spent: Some(spent.into()),
            month: "May 2023".into(),
        }
    }

    #[test]
    fn snapshots_are_isolated_from_later_writes() {
        let store = FinanceStore::new();
        store
            .insert_account(Account::new("Main", AccountKind::Checking, 10.0, "Chase").with_id("a1"))
            .unwrap();
        let before = store.accounts();
        store
            .insert_account(Account::new("Card", AccountKind::Credit, 5.0, "Amex").with_id("a2"))
            .unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(store.accounts().len(), 2);
    }

    #[test]
    fn from_parts_rejects_duplicate_ids() {
        let account = Account::new("Main", AccountKind::Checking, 10.0, "Chase").with_id("a1");
        let result = FinanceStore::from_parts(
            vec![account.clone(), account],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        assert!(matches!(result, Err(FinanceError::Validation { .. })));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let store = FinanceStore::new();
        let account = Account::new("Main", AccountKind::Checking, 10.0, "Chase").with_id("a1");
        store.insert_account(account.clone()).unwrap();
        let err = store.insert_account(account).unwrap_err();
        assert_eq!(err.field(), Some("id"));
    }

    #[test]
    fn invalid_balance_edit_leaves_account_untouched() {
        let store = FinanceStore::new();
        store
            .insert_account(Account::new("Main", AccountKind::Checking, 10.0, "Chase").with_id("a1"))
            .unwrap();
        let revision = store.revision();
        assert!(store.set_account_balance("a1", "abc").is_err());
        assert_eq!(store.account("a1").unwrap().balance, 10.0);
        assert_eq!(store.revision(), revision);

        store.set_account_balance("a1", "42.5").unwrap();
        assert_eq!(store.account("a1").unwrap().balance, 42.5);
        assert!(matches!(
            store.set_account_balance("missing", "1"),
            Err(FinanceError::NotFound { .. })
        ));
    }

    #[test]
    fn budget_status_tracks_edits() {
        let store = FinanceStore::new();
        let budget = store.add_budget(budget_draft("100")).unwrap();
        assert_eq!(budget.status(), BudgetStatus::OnTrack);
        let edited = store.edit_budget(&budget.id, budget_draft("320")).unwrap();
        assert_eq!(edited.id, budget.id);
        assert_eq!(store.budgets()[0].status(), BudgetStatus::OverBudget);
    }

    #[test]
    fn goal_lifecycle() {
        let store = FinanceStore::new();
        let goal = store
            .add_goal(GoalDraft {
                name: "Vacation".into(),
                target_amount: "3000".into(),
                current_amount: "1200".into(),
                deadline: "2023-08-15".into(),
                color: None,
            })
            .unwrap();
        let edited = store
            .edit_goal(
                &goal.id,
                GoalDraft {
                    name: "Vacation".into(),
                    target_amount: "3000".into(),
                    current_amount: "1800".into(),
                    deadline: "2023-08-15".into(),
                    color: None,
                },
            )
            .unwrap();
        assert_eq!(edited.current_amount, 1800.0);
        store.delete_goal(&goal.id).unwrap();
        assert!(store.goals().is_empty());
        assert!(store.delete_goal(&goal.id).is_err());
    }

    #[test]
    fn notifications_change_only_through_explicit_actions() {
        let store = FinanceStore::new();
        for (id, kind) in [("n1", NotificationKind::Alert), ("n2", NotificationKind::Payment)] {
            store
                .push_notification(Notification::new("t", "m", kind, "Today").with_id(id))
                .unwrap();
        }
        store.mark_notification_read("n1").unwrap();
        assert_eq!(store.mark_all_notifications_read(), 1);
        assert!(store.notifications().iter().all(|n| n.read));
        store.delete_notification("n2").unwrap();
        assert_eq!(store.notifications().len(), 1);
    }

    #[test]
    fn entities_breaking_invariants_are_rejected() {
        let store = FinanceStore::new();
        let err = store
            .insert_budget(BudgetCategory::new("Bad", -50.0, 10.0, "May 2023"))
            .unwrap_err();
        assert_eq!(err.field(), Some("allocated"));
        let err = store
            .insert_budget(BudgetCategory::new("Bad", 50.0, f64::NAN, "May 2023"))
            .unwrap_err();
        assert_eq!(err.field(), Some("spent"));

        let deadline = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let err = store.insert_goal(Goal::new("G", -1.0, 0.0, deadline)).unwrap_err();
        assert_eq!(err.field(), Some("targetAmount"));
        let err = store.insert_goal(Goal::new("G", 100.0, f64::NAN, deadline)).unwrap_err();
        assert_eq!(err.field(), Some("currentAmount"));

        let err = store
            .insert_account(Account::new("Main", AccountKind::Checking, f64::INFINITY, "Chase"))
            .unwrap_err();
        assert_eq!(err.field(), Some("balance"));

        assert!(store.budgets().is_empty());
        assert!(store.goals().is_empty());
        assert!(store.accounts().is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn from_parts_rejects_invalid_budgets() {
        let result = FinanceStore::from_parts(
            Vec::new(),
            Vec::new(),
            vec![BudgetCategory::new("Bad", -50.0, 0.0, "May 2023")],
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(result.err().and_then(|err| err.field().map(str::to_string)), Some("allocated".to_string()));
    }

    #[test]
    fn toggling_a_flag_flips_stored_state() {
        let store = FinanceStore::new();
        let date = Utc.with_ymd_and_hms(2023, 5, 28, 12, 0, 0).unwrap();
        store
            .insert_transaction(
                Transaction::new("Lunch", 12.0, TransactionKind::Expense, "Food", "Main", date).with_id("t1"),
            )
            .unwrap();
        assert!(store.toggle_transaction_flag("t1").unwrap().flagged);
        assert!(!store.toggle_transaction_flag("t1").unwrap().flagged);
        assert!(store.set_transaction_flag("t1", true).unwrap().flagged);
        assert!(matches!(
            store.toggle_transaction_flag("missing"),
            Err(FinanceError::NotFound { .. })
        ));
    }

    #[test]
    fn concurrent_toggles_are_never_lost() {
        let store = Arc::new(FinanceStore::new());
        let date = Utc.with_ymd_and_hms(2023, 5, 28, 12, 0, 0).unwrap();
        store
            .insert_transaction(
                Transaction::new("Lunch", 12.0, TransactionKind::Expense, "Food", "Main", date).with_id("t1"),
            )
            .unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store.toggle_transaction_flag("t1").unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(!store.transactions()[0].flagged);
    }

    #[test]
    fn account_names_are_unique_ignoring_case() {
        let store = FinanceStore::new();
        let draft = |name: &str| AccountDraft {
            name: name.into(),
            kind: "checking".into(),
            balance: "10".into(),
            currency: "USD".into(),
            account_number: None,
            institution: "Chase".into(),
        };
        store.add_account(draft("Main")).unwrap();
        let err = store.add_account(draft(" MAIN ")).unwrap_err();
        assert_eq!(err.field(), Some("name"));
        assert_eq!(store.accounts().len(), 1);
    }

    #[test]
    fn budget_names_are_unique_per_month() {
        let store = FinanceStore::new();
        let first = store.add_budget(budget_draft("10")).unwrap();
        assert_eq!(store.add_budget(budget_draft("20")).unwrap_err().field(), Some("name"));

        let mut june = budget_draft("20");
        june.month = "June 2023".into();
        let second = store.add_budget(june.clone()).unwrap();

        june.month = "May 2023".into();
        assert_eq!(store.edit_budget(&second.id, june).unwrap_err().field(), Some("name"));
        assert!(store.edit_budget(&first.id, budget_draft("30")).is_ok());
    }
}
