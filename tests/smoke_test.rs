mod common;

use finance_core::{
    core::services::{SummaryService, TransactionService},
    init,
    query::{DateRange, FilterSpec, SortSpec},
};

#[test]
fn demo_dashboard_smoke() {
    init();

    let store = common::demo_store();
    let rows = TransactionService::list(&store, &FilterSpec::new(), SortSpec::default(), common::now())
        .expect("default query succeeds");
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0].id, "tx1");

    let summary = SummaryService::dashboard(&store, DateRange::Last30Days, common::now());
    assert!(summary.cashflow.net() > 0.0);
    assert!(summary.savings_rate.is_some());
}
