use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::{Transaction, TransactionDraft};
use crate::query::{self, FilterSpec, SortField, SortSpec};
use crate::store::FinanceStore;

use super::ServiceResult;

pub struct TransactionService;

impl TransactionService {
    /// Filters then sorts the current transaction snapshot.
    pub fn list(
        store: &FinanceStore,
        spec: &FilterSpec,
        order: SortSpec,
        now: DateTime<Utc>,
    ) -> ServiceResult<Vec<Transaction>> {
        let snapshot = store.transactions();
        let rows = query::run(&snapshot, spec, order, now)?;
        debug!(
            total = snapshot.len(),
            matched = rows.len(),
            field = %order.field,
            "transactions queried"
        );
        Ok(rows)
    }

    /// Newest first, at most `limit` rows.
    pub fn recent(store: &FinanceStore, limit: usize) -> ServiceResult<Vec<Transaction>> {
        let mut rows = query::sort(&store.transactions(), SortSpec::desc(SortField::Date))?;
        rows.truncate(limit);
        Ok(rows)
    }

    pub fn add(store: &FinanceStore, draft: TransactionDraft) -> ServiceResult<Transaction> {
        store.add_transaction(draft).map_err(|err| {
            warn!(%err, "transaction rejected");
            err.into()
        })
    }

    pub fn toggle_flag(store: &FinanceStore, id: &str) -> ServiceResult<Transaction> {
        Ok(store.toggle_transaction_flag(id)?)
    }

    /// Choices for the category filter dropdown.
    pub fn categories(store: &FinanceStore) -> Vec<String> {
        query::distinct_categories(&store.transactions())
    }

    /// Choices for the account filter dropdown.
    pub fn accounts(store: &FinanceStore) -> Vec<String> {
        query::distinct_accounts(&store.transactions())
    }
}
