use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::aggregate;
use crate::domain::{Account, AccountDraft};
use crate::query::{self, FilterSpec, SortSpec};
use crate::store::FinanceStore;

use super::ServiceResult;

pub struct AccountService;

impl AccountService {
    pub fn list(
        store: &FinanceStore,
        spec: &FilterSpec,
        order: SortSpec,
        now: DateTime<Utc>,
    ) -> ServiceResult<Vec<Account>> {
        let snapshot = store.accounts();
        let rows = query::run(&snapshot, spec, order, now)?;
        debug!(total = snapshot.len(), matched = rows.len(), "accounts queried");
        Ok(rows)
    }

    pub fn add(store: &FinanceStore, draft: AccountDraft) -> ServiceResult<Account> {
        store.add_account(draft).map_err(|err| {
            warn!(%err, "account rejected");
            err.into()
        })
    }

    /// Balance edit from the account details form.
    pub fn update_balance(store: &FinanceStore, id: &str, raw_balance: &str) -> ServiceResult<Account> {
        Ok(store.set_account_balance(id, raw_balance)?)
    }

    pub fn total_balance(store: &FinanceStore) -> f64 {
        aggregate::total_balance(&store.accounts())
    }

    pub fn net_worth(store: &FinanceStore) -> f64 {
        aggregate::net_worth(&store.accounts())
    }
}
