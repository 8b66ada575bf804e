//! Demo data for the CLI and tests, dated relative to an injected clock.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};

use crate::domain::{
    Account, AccountKind, BudgetCategory, Goal, LastTransaction, Merchant, Notification,
    NotificationKind, Transaction, TransactionKind, TransactionStatus,
};
use crate::errors::FinanceResult;

use super::FinanceStore;

/// A store populated with the demo collections.
pub fn demo(now: DateTime<Utc>) -> FinanceResult<FinanceStore> {
    FinanceStore::from_parts(
        accounts(now),
        transactions(now),
        budgets(now),
        goals(now),
        notifications(),
    )
}

fn at(now: DateTime<Utc>, days_ago: i64, hour: u32, minute: u32) -> DateTime<Utc> {
    let day = (now - Duration::days(days_ago)).date_naive();
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
    day.and_time(time).and_utc()
}

fn accounts(now: DateTime<Utc>) -> Vec<Account> {
    let last = |amount, days_ago, kind| LastTransaction {
        amount,
        date: at(now, days_ago, 12, 0),
        kind,
    };
    vec![
        Account::new("Main Checking", AccountKind::Checking, 5280.42, "Chase Bank")
            .with_id("acc-checking")
            .with_account_number("****4567")
            .with_last_transaction(last(120.5, 0, TransactionKind::Expense)),
        Account::new("Savings Account", AccountKind::Savings, 12750.8, "Bank of America")
            .with_id("acc-savings")
            .with_account_number("****7890")
            .with_interest_rate(4.25)
            .with_last_transaction(last(1000.0, 8, TransactionKind::Income)),
        Account::new("Credit Card", AccountKind::Credit, 1240.3, "American Express")
            .with_id("acc-credit")
            .with_account_number("****1234")
            .with_available_credit(8759.7)
            .with_last_transaction(last(85.2, 3, TransactionKind::Expense)),
        Account::new("Investment Portfolio", AccountKind::Investment, 28450.75, "Fidelity")
            .with_id("acc-investment")
            .with_account_number("****5678")
            .with_last_transaction(last(1500.0, 13, TransactionKind::Income)),
    ]
}

fn transactions(now: DateTime<Utc>) -> Vec<Transaction> {
    use TransactionKind::{Expense, Income};

    let rows: [(&str, i64, u32, u32, &str, f64, TransactionKind, &str, &str, &str); 10] = [
        ("tx1", 0, 10, 30, "Grocery Shopping", 78.52, Expense, "Food & Dining", "Main Checking", "Whole Foods Market"),
        ("tx2", 1, 14, 15, "Monthly Salary", 3500.0, Income, "Income", "Main Checking", "Acme Corp"),
        ("tx3", 2, 20, 45, "Dinner with Friends", 62.35, Expense, "Food & Dining", "Credit Card", "Olive Garden"),
        ("tx4", 3, 9, 20, "Uber Ride", 24.99, Expense, "Transportation", "Credit Card", "Uber"),
        ("tx5", 4, 16, 30, "Amazon Purchase", 49.99, Expense, "Shopping", "Credit Card", "Amazon"),
        ("tx6", 5, 11, 45, "Monthly Rent", 1500.0, Expense, "Housing", "Main Checking", "Sunshine Apartments"),
        ("tx7", 6, 13, 15, "Freelance Payment", 750.0, Income, "Income", "Savings Account", "Design Client"),
        ("tx8", 7, 8, 30, "Coffee Shop", 5.75, Expense, "Food & Dining", "Credit Card", "Starbucks"),
        ("tx9", 8, 19, 20, "Gas Station", 45.82, Expense, "Transportation", "Credit Card", "Shell"),
        ("tx10", 9, 15, 10, "Phone Bill", 85.0, Expense, "Utilities", "Main Checking", "Verizon"),
    ];

    rows.into_iter()
        .map(|(id, days_ago, hour, minute, description, amount, kind, category, account, merchant)| {
            let txn = Transaction::new(description, amount, kind, category, account, at(now, days_ago, hour, minute))
                .with_id(id)
                .with_merchant(Merchant::new(merchant));
            if id == "tx10" {
                txn.with_status(TransactionStatus::Pending).mark_flagged()
            } else {
                txn
            }
        })
        .collect()
}

fn budgets(now: DateTime<Utc>) -> Vec<BudgetCategory> {
    let month = now.format("%B %Y").to_string();
    [
        ("housing", "Housing", 1500.0, 1450.0),
        ("food", "Food & Dining", 600.0, 580.0),
        ("transportation", "Transportation", 400.0, 450.0),
        ("entertainment", "Entertainment", 300.0, 220.0),
        ("shopping", "Shopping", 400.0, 350.0),
    ]
    .into_iter()
    .map(|(id, name, allocated, spent)| BudgetCategory::new(name, allocated, spent, month.as_str()).with_id(id))
    .collect()
}

fn goals(now: DateTime<Utc>) -> Vec<Goal> {
    let today = now.date_naive();
    let year_end = today
        .with_month(12)
        .and_then(|date| date.with_day(31))
        .unwrap_or(today + Duration::days(180));
    vec![
        Goal::new("Emergency Fund", 10000.0, 6500.0, year_end)
            .with_id("g1")
            .with_color("#3b82f6"),
        Goal::new("Vacation", 3000.0, 1200.0, today + Duration::days(80))
            .with_id("g2")
            .with_color("#10b981"),
        Goal::new("New Laptop", 2000.0, 1800.0, today + Duration::days(34))
            .with_id("g3")
            .with_color("#8b5cf6"),
    ]
}

fn notifications() -> Vec<Notification> {
    use NotificationKind::{Alert, Budget, Payment, Savings};

    let rows = [
        ("1", "Unusual Spending Detected", "A $450 purchase at Electronics Store is outside your normal spending pattern.", Alert, "2 hours ago", false),
        ("2", "Upcoming Bill", "Your monthly rent payment of $1,200 is due in 3 days.", Payment, "1 day ago", false),
        ("3", "Budget Alert", "You've reached 85% of your Dining budget for this month.", Budget, "2 days ago", true),
        ("4", "Savings Goal Achieved", "You've reached your savings goal of $5,000 for your vacation fund.", Savings, "3 days ago", true),
        ("5", "New Account Feature", "Track your recurring subscriptions from the accounts page.", Alert, "5 days ago", true),
        ("6", "Credit Card Payment", "Your credit card payment of $350 was successfully processed.", Payment, "1 week ago", true),
    ];

    rows.into_iter()
        .map(|(id, title, message, kind, date, read)| {
            let mut notification = Notification::new(title, message, kind, date).with_id(id);
            notification.read = read;
            notification
        })
        .collect()
}
