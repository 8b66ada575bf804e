use tracing::{debug, warn};

use crate::aggregate::{self, BudgetOverview};
use crate::domain::{BudgetCategory, BudgetDraft, BudgetStatus};
use crate::query::{self, SortSpec};
use crate::store::FinanceStore;

use super::ServiceResult;

pub struct BudgetService;

impl BudgetService {
    /// Categories for the budget tracker tabs, optionally narrowed to one status.
    pub fn list(
        store: &FinanceStore,
        status: Option<BudgetStatus>,
        order: Option<SortSpec>,
    ) -> ServiceResult<Vec<BudgetCategory>> {
        let rows = aggregate::filter_budgets_by_status(&store.budgets(), status);
        let rows = match order {
            Some(order) => query::sort(&rows, order)?,
            None => rows,
        };
        debug!(matched = rows.len(), ?status, "budgets queried");
        Ok(rows)
    }

    pub fn add(store: &FinanceStore, draft: BudgetDraft) -> ServiceResult<BudgetCategory> {
        store.add_budget(draft).map_err(|err| {
            warn!(%err, "budget rejected");
            err.into()
        })
    }

    pub fn edit(store: &FinanceStore, id: &str, draft: BudgetDraft) -> ServiceResult<BudgetCategory> {
        store.edit_budget(id, draft).map_err(|err| {
            warn!(id, %err, "budget edit rejected");
            err.into()
        })
    }

    pub fn overview(store: &FinanceStore) -> BudgetOverview {
        aggregate::budget_overview(&store.budgets())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortField;
    use crate::store::seed;
    use chrono::{TimeZone, Utc};

    fn store() -> FinanceStore {
        seed::demo(Utc.with_ymd_and_hms(2023, 5, 28, 18, 0, 0).unwrap()).unwrap()
    }

    fn draft(name: &str, allocated: &str, spent: &str) -> BudgetDraft {
        BudgetDraft {
            name: name.into(),
            allocated: allocated.into(),
            spent: Some(spent.into()),
            month: "May 2023".into(),
        }
    }

    #[test]
    fn status_tabs_filter_categories() {
        let store = store();
        let over = BudgetService::list(&store, Some(BudgetStatus::OverBudget), None).unwrap();
        assert_eq!(over.len(), 1);
        assert_eq!(over[0].name, "Transportation");

        let by_name = BudgetService::list(&store, None, Some(SortSpec::asc(SortField::Name))).unwrap();
        assert_eq!(by_name[0].name, "Entertainment");
    }

    #[test]
    fn overview_totals_seed() {
        let overview = BudgetService::overview(&store());
        assert_eq!(overview.total_allocated, 3200.0);
        assert_eq!(overview.total_spent, 3050.0);
        assert_eq!(overview.remaining(), 150.0);
    }

    #[test]
    fn edit_reclassifies_and_rejects_duplicates() {
        let store = store();
        let edited = BudgetService::edit(&store, "transportation", draft("Transportation", "500", "450")).unwrap();
        assert_eq!(edited.status(), BudgetStatus::OnTrack);

        let err = BudgetService::add(&store, draft("housing", "100", "")).unwrap_err();
        assert_eq!(err.field(), Some("name"));

        let err = BudgetService::edit(&store, "food", draft("Housing", "600", "100")).unwrap_err();
        assert_eq!(err.field(), Some("name"));
        assert_eq!(store.budgets().iter().find(|b| b.id == "food").unwrap().name, "Food & Dining");

        let err = BudgetService::add(&store, draft("Travel", "abc", "")).unwrap_err();
        assert_eq!(err.field(), Some("allocated"));
    }
}
