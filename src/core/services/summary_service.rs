use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::aggregate::{self, BudgetOverview, CategoryTotal, Cashflow, MonthlyCashflow};
use crate::query::{self, DateRange, FilterSpec};
use crate::store::FinanceStore;

/// Figures behind the dashboard cards and charts.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub range: DateRange,
    pub total_balance: f64,
    pub net_worth: f64,
    pub cashflow: Cashflow,
    pub savings_rate: Option<f64>,
    pub spending_by_category: Vec<CategoryTotal>,
    pub monthly: Vec<MonthlyCashflow>,
    pub budgets: BudgetOverview,
}

pub struct SummaryService;

impl SummaryService {
    /// Summarizes the transactions inside `range` alongside account and
    /// budget totals.
    pub fn dashboard(store: &FinanceStore, range: DateRange, now: DateTime<Utc>) -> DashboardSummary {
        let accounts = store.accounts();
        let window = query::filter(
            &store.transactions(),
            &FilterSpec::new().with_date_range(range),
            now,
        );
        let cashflow = aggregate::cashflow(&window);
        debug!(transactions = window.len(), range = range.label(), "dashboard summarized");
        DashboardSummary {
            range,
            total_balance: aggregate::total_balance(&accounts),
            net_worth: aggregate::net_worth(&accounts),
            savings_rate: cashflow.savings_rate(),
            cashflow,
            spending_by_category: aggregate::spending_by_category(&window),
            monthly: aggregate::monthly_cashflow(&window),
            budgets: aggregate::budget_overview(&store.budgets()),
        }
    }

    pub fn cashflow(store: &FinanceStore, range: DateRange, now: DateTime<Utc>) -> Cashflow {
        let window = query::filter(
            &store.transactions(),
            &FilterSpec::new().with_date_range(range),
            now,
        );
        aggregate::cashflow(&window)
    }
}
