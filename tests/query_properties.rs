mod common;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use finance_core::{
    aggregate::{budget_status, days_until, progress_ratio, total_by},
    domain::{BudgetStatus, Transaction, TransactionKind},
    errors::FinanceError,
    query::{filter, run, sort, DateRange, FilterSpec, SortField, SortSpec},
};

use common::{now, txn};

fn sample() -> Vec<Transaction> {
    vec![
        txn("a", 120.5, TransactionKind::Expense, "Food & Dining", 0),
        txn("b", 2500.0, TransactionKind::Income, "Income", 5),
        txn("c", 42.0, TransactionKind::Expense, "Shopping", 12),
        txn("d", 18.25, TransactionKind::Expense, "Food & Dining", 45),
        txn("e", 999.0, TransactionKind::Expense, "Housing", 400),
    ]
}

#[test]
fn unset_spec_is_identity() {
    let items = sample();
    assert_eq!(filter(&items, &FilterSpec::new(), now()), items);
    assert!(filter::<Transaction>(&[], &FilterSpec::new(), now()).is_empty());
}

#[test]
fn all_range_admits_any_date() {
    let mut items = sample();
    items.push(
        Transaction::new(
            "Ancient",
            1.0,
            TransactionKind::Expense,
            "Other",
            "Main Checking",
            Utc.with_ymd_and_hms(1971, 1, 1, 0, 0, 0).unwrap(),
        )
        .with_id("old"),
    );
    items.push(
        Transaction::new(
            "Scheduled",
            1.0,
            TransactionKind::Expense,
            "Other",
            "Main Checking",
            now() + Duration::days(30),
        )
        .with_id("future"),
    );
    let spec = FilterSpec::new().with_date_range(DateRange::All);
    assert_eq!(filter(&items, &spec, now()).len(), items.len());
}

#[test]
fn relative_windows_are_inclusive() {
    let items = vec![
        txn("edge", 1.0, TransactionKind::Expense, "Other", 7),
        txn("out", 1.0, TransactionKind::Expense, "Other", 8),
    ];
    let hits = filter(&items, &FilterSpec::new().with_date_range(DateRange::Last7Days), now());
    let ids: Vec<&str> = hits.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["edge"]);
}

#[test]
fn category_filter_is_sound_and_complete() {
    let items = sample();
    let spec = FilterSpec::new().with_category("Food & Dining");
    let hits = filter(&items, &spec, now());
    assert!(hits.iter().all(|t| t.category == "Food & Dining"));
    let expected = items.iter().filter(|t| t.category == "Food & Dining").count();
    assert_eq!(hits.len(), expected);

    let unknown = FilterSpec::new().with_category("Nonexistent");
    assert!(filter(&items, &unknown, now()).is_empty());
}

#[test]
fn ascending_reversed_equals_descending() {
    let items = sample();
    let mut asc = sort(&items, SortSpec::asc(SortField::Amount)).unwrap();
    asc.reverse();
    let desc = sort(&items, SortSpec::desc(SortField::Amount)).unwrap();
    assert_eq!(asc, desc);
}

#[test]
fn equal_keys_break_ties_deterministically() {
    let items = vec![
        txn("z", 10.0, TransactionKind::Expense, "Other", 1),
        txn("a", 10.0, TransactionKind::Expense, "Other", 2),
        txn("m", 10.0, TransactionKind::Expense, "Other", 3),
    ];
    let first = sort(&items, SortSpec::asc(SortField::Amount)).unwrap();
    let second = sort(&first, SortSpec::asc(SortField::Amount)).unwrap();
    let ids: Vec<&str> = first.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "m", "z"]);
    assert_eq!(first, second);
}

#[test]
fn unknown_sort_field_fails_fast() {
    let err = sort(&sample(), SortSpec::asc(SortField::Name)).unwrap_err();
    assert!(matches!(err, FinanceError::UnknownField { .. }));
    assert!(matches!(
        "color".parse::<SortField>(),
        Err(FinanceError::UnknownField { .. })
    ));
}

#[test]
fn budget_thresholds() {
    assert_eq!(budget_status(100.0, 101.0), BudgetStatus::OverBudget);
    assert_eq!(budget_status(100.0, 91.0), BudgetStatus::Warning);
    assert_eq!(budget_status(100.0, 50.0), BudgetStatus::OnTrack);
    assert_eq!(budget_status(100.0, 90.0), BudgetStatus::OnTrack);
    assert_eq!(budget_status(100.0, 100.0), BudgetStatus::Warning);
}

#[test]
fn progress_ratio_values() {
    assert_eq!(progress_ratio(6500.0, 10000.0).unwrap(), 0.65);
    assert_eq!(progress_ratio(12000.0, 10000.0).unwrap(), 1.0);
    assert!(matches!(
        progress_ratio(5.0, 0.0),
        Err(FinanceError::InvalidTarget(_))
    ));
    assert!(progress_ratio(5.0, -1.0).is_err());
}

#[test]
fn days_until_today_and_yesterday() {
    let today = now().date_naive();
    let midnight = today.and_hms_opt(0, 0, 0).unwrap().and_utc();
    assert_eq!(days_until(today, midnight), 0);
    assert_eq!(days_until(today - Duration::days(1), midnight), -1);
    assert_eq!(days_until(NaiveDate::from_ymd_opt(2023, 5, 29).unwrap(), now()), 1);
}

#[test]
fn filter_is_idempotent_after_sort() {
    let items = sample();
    let spec = FilterSpec::new()
        .with_kind("expense")
        .with_date_range(DateRange::Last90Days);
    let once = filter(&items, &spec, now());
    let sorted = sort(&once, SortSpec::desc(SortField::Description)).unwrap();
    let again = filter(&sorted, &spec, now());

    let mut once_ids: Vec<&str> = once.iter().map(|t| t.id.as_str()).collect();
    let mut again_ids: Vec<&str> = again.iter().map(|t| t.id.as_str()).collect();
    once_ids.sort();
    again_ids.sort();
    assert_eq!(once_ids, again_ids);
}

#[test]
fn credit_debit_scenario() {
    let items = vec![
        Transaction::new("Lunch", 120.50, TransactionKind::Expense, "Food & Dining", "Main Checking", now())
            .with_id("t0"),
        Transaction::new("Salary", 2500.0, TransactionKind::Income, "Income", "Main Checking", now() - Duration::days(5))
            .with_id("t1"),
    ];
    let credits = filter(&items, &FilterSpec::new().with_kind("credit"), now());
    assert_eq!(credits.len(), 1);
    assert_eq!(credits[0].id, "t1");

    let debit: TransactionKind = "debit".parse().unwrap();
    assert_eq!(total_by(&items, |t| t.kind == debit), 120.50);

    let pipeline = run(
        &items,
        &FilterSpec::new().with_kind("debit"),
        SortSpec::default(),
        now(),
    )
    .unwrap();
    assert_eq!(pipeline.len(), 1);
    assert_eq!(pipeline[0].id, "t0");
}
