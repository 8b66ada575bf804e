//! Derived summary values for charts and summary cards.
//!
//! Every function is pure: the same data and the same injected `now` always
//! produce the same result.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::account::{Account, AccountKind};
use crate::domain::budget::{BudgetCategory, BudgetStatus};
use crate::domain::transaction::Transaction;
use crate::errors::{FinanceError, FinanceResult};

/// Spent/allocated ratio above which a category is flagged.
pub const WARNING_RATIO: f64 = 0.9;

const DAY_MILLIS: i64 = 86_400_000;

/// Classifies a budget: over when `spent > allocated`, warning when the ratio
/// is strictly above [`WARNING_RATIO`], otherwise on track.
pub fn budget_status(allocated: f64, spent: f64) -> BudgetStatus {
    if spent > allocated {
        BudgetStatus::OverBudget
    } else if allocated > 0.0 && spent / allocated > WARNING_RATIO {
        BudgetStatus::Warning
    } else {
        BudgetStatus::OnTrack
    }
}

/// Sum of `amount` over the transactions matching `predicate`.
pub fn total_by<F>(transactions: &[Transaction], predicate: F) -> f64
where
    F: Fn(&Transaction) -> bool,
{
    transactions
        .iter()
        .filter(|txn| predicate(*txn))
        .map(|txn| txn.amount)
        .sum()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Cashflow {
    pub income: f64,
    pub expenses: f64,
}

impl Cashflow {
    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }

    pub fn savings_rate(&self) -> Option<f64> {
        savings_rate(self.income, self.expenses)
    }
}

pub fn cashflow(transactions: &[Transaction]) -> Cashflow {
    Cashflow {
        income: total_by(transactions, Transaction::is_income),
        expenses: total_by(transactions, Transaction::is_expense),
    }
}

/// Share of income kept, `(income - expenses) / income`. `None` without income.
pub fn savings_rate(income: f64, expenses: f64) -> Option<f64> {
    if income > 0.0 {
        Some((income - expenses) / income)
    } else {
        None
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    /// Fraction of all spending, in `[0, 1]`.
    pub share: f64,
}

/// Expense totals per category, largest first (ties by name).
pub fn spending_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for txn in transactions.iter().filter(|txn| txn.is_expense()) {
        *totals.entry(txn.category.as_str()).or_default() += txn.amount;
    }
    let grand_total: f64 = totals.values().sum();
    let mut out: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
            share: if grand_total > 0.0 { total / grand_total } else { 0.0 },
        })
        .collect();
    out.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    out
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MonthlyCashflow {
    pub year: i32,
    pub month: u32,
    pub income: f64,
    pub expenses: f64,
}

impl MonthlyCashflow {
    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }

    pub fn savings_rate(&self) -> Option<f64> {
        savings_rate(self.income, self.expenses)
    }
}

/// Income and expenses bucketed by calendar month (UTC), oldest first.
pub fn monthly_cashflow(transactions: &[Transaction]) -> Vec<MonthlyCashflow> {
    let mut buckets: BTreeMap<(i32, u32), Cashflow> = BTreeMap::new();
    for txn in transactions {
        let bucket = buckets
            .entry((txn.date.year(), txn.date.month()))
            .or_default();
        if txn.is_income() {
            bucket.income += txn.amount;
        } else {
            bucket.expenses += txn.amount;
        }
    }
    buckets
        .into_iter()
        .map(|((year, month), flow)| MonthlyCashflow {
            year,
            month,
            income: flow.income,
            expenses: flow.expenses,
        })
        .collect()
}

/// `min(current / target, 1)`, clamped into `[0, 1]`.
pub fn progress_ratio(current: f64, target: f64) -> FinanceResult<f64> {
    if target.is_nan() || target <= 0.0 {
        return Err(FinanceError::InvalidTarget(target));
    }
    Ok((current / target).clamp(0.0, 1.0))
}

/// Rounded whole percent, capped at 100.
pub fn progress_percent(current: f64, target: f64) -> FinanceResult<u32> {
    if target.is_nan() || target <= 0.0 {
        return Err(FinanceError::InvalidTarget(target));
    }
    Ok((current / target * 100.0).round().clamp(0.0, 100.0) as u32)
}

/// `balance / (balance + available)`, only when available credit is known and
/// the credit line is non-zero.
pub fn credit_utilization(balance: f64, available_credit: Option<f64>) -> Option<f64> {
    let available = available_credit?;
    let limit = balance + available;
    if limit == 0.0 || !limit.is_finite() {
        return None;
    }
    Some(balance / limit)
}

/// Whole days from `now` until the start of `deadline` (UTC), rounded up.
/// Negative values mean the deadline has passed.
pub fn days_until(deadline: NaiveDate, now: DateTime<Utc>) -> i64 {
    let target = deadline.and_time(chrono::NaiveTime::MIN).and_utc();
    let millis = (target - now).num_milliseconds();
    -(-millis).div_euclid(DAY_MILLIS)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct BudgetOverview {
    pub total_allocated: f64,
    pub total_spent: f64,
}

impl BudgetOverview {
    pub fn remaining(&self) -> f64 {
        self.total_allocated - self.total_spent
    }

    pub fn percent_used(&self) -> Option<f64> {
        if self.total_allocated > 0.0 {
            Some(self.total_spent / self.total_allocated * 100.0)
        } else {
            None
        }
    }

    pub fn status(&self) -> BudgetStatus {
        budget_status(self.total_allocated, self.total_spent)
    }
}

pub fn budget_overview(categories: &[BudgetCategory]) -> BudgetOverview {
    categories
        .iter()
        .fold(BudgetOverview::default(), |mut acc, category| {
            acc.total_allocated += category.allocated;
            acc.total_spent += category.spent;
            acc
        })
}

/// Categories with the given derived status; `None` keeps all of them.
pub fn filter_budgets_by_status(
    categories: &[BudgetCategory],
    status: Option<BudgetStatus>,
) -> Vec<BudgetCategory> {
    categories
        .iter()
        .filter(|category| status.map_or(true, |wanted| category.status() == wanted))
        .cloned()
        .collect()
}

/// Simple interest earned on `balance` at `apy_percent` over `years`.
pub fn estimated_interest(balance: f64, apy_percent: f64, years: f64) -> f64 {
    balance * (apy_percent / 100.0) * years
}

/// Plain sum of balances, as shown on the account cards.
pub fn total_balance(accounts: &[Account]) -> f64 {
    accounts.iter().map(|account| account.balance).sum()
}

/// Assets minus credit balances owed.
pub fn net_worth(accounts: &[Account]) -> f64 {
    accounts
        .iter()
        .map(|account| match account.kind {
            AccountKind::Credit => -account.balance,
            _ => account.balance,
        })
        .sum()
}
