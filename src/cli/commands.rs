use tracing::info;

use crate::cli::output;
use crate::cli::table::{Cell, Table, TableColumn, Tone};
use crate::cli::{ConfigAction, OrderArgs, QueryArgs, Session};
use crate::core::services::{
    AccountService, BudgetService, GoalService, NotificationService, ServiceResult,
    SummaryService, TransactionService,
};
use crate::currency::{format_currency, format_date, format_number, format_relative, CurrencyCode};
use crate::domain::{BudgetStatus, Displayable, NotificationFilter, TransactionStatus};
use crate::errors::FinanceError;
use crate::query::{DateRange, SortDirection, SortField, SortSpec};

fn money(session: &Session, amount: f64, code: &CurrencyCode) -> String {
    format_currency(amount, code, &session.config.locale)
}

fn percent(session: &Session, ratio: f64) -> String {
    format!("{}%", format_number(&session.config.locale, ratio * 100.0, 1))
}

fn status_tone(status: BudgetStatus) -> Tone {
    match status {
        BudgetStatus::OnTrack => Tone::Positive,
        BudgetStatus::Warning => Tone::Caution,
        BudgetStatus::OverBudget => Tone::Negative,
    }
}

pub fn accounts(session: &Session, query: &QueryArgs) -> ServiceResult<()> {
    let spec = query.filter_spec(DateRange::All)?;
    let order = query.order.resolve(SortSpec::asc(SortField::Name))?;
    let rows = AccountService::list(&session.store, &spec, order, session.now)?;

    output::section("Accounts");
    let mut table = Table::new(vec![
        TableColumn::left("Name").max_width(24),
        TableColumn::left("Type"),
        TableColumn::left("Number"),
        TableColumn::left("Institution").max_width(20),
        TableColumn::right("Balance"),
        TableColumn::right("Utilization"),
    ]);
    for account in &rows {
        let utilization = account
            .credit_utilization()
            .map(|ratio| percent(session, ratio))
            .unwrap_or_default();
        table.push(vec![
            Cell::new(account.name.as_str()),
            Cell::new(account.kind.label()),
            Cell::new(account.account_number.as_str()),
            Cell::new(account.institution.as_str()),
            Cell::new(money(session, account.balance, &account.currency)),
            Cell::new(utilization),
        ]);
    }
    output::info(table.render());
    output::info(format!(
        "{} account(s), total balance {}",
        rows.len(),
        money(session, AccountService::total_balance(&session.store), &session.config.currency)
    ));
    Ok(())
}

pub fn transactions(session: &Session, query: &QueryArgs, limit: Option<usize>) -> ServiceResult<()> {
    let spec = query.filter_spec(session.config.default_range)?;
    let order = query.order.resolve(session.config.default_sort)?;
    let mut rows = TransactionService::list(&session.store, &spec, order, session.now)?;
    let matched = rows.len();
    if let Some(limit) = limit {
        rows.truncate(limit);
    }

    output::section(format!(
        "Transactions ({}, {} {})",
        spec.date_range.label(),
        order.field,
        match order.direction {
            SortDirection::Asc => "ascending",
            SortDirection::Desc => "descending",
        }
    ));
    let mut table = Table::new(vec![
        TableColumn::left("Date"),
        TableColumn::left("Description").max_width(28),
        TableColumn::left("Category").max_width(18),
        TableColumn::left("Account").max_width(18),
        TableColumn::right("Amount"),
        TableColumn::left("Status"),
        TableColumn::left("Flag"),
    ]);
    for txn in &rows {
        let amount_tone = if txn.is_income() { Tone::Positive } else { Tone::Negative };
        let status_tone = match txn.status {
            TransactionStatus::Completed => Tone::Plain,
            TransactionStatus::Pending => Tone::Caution,
            TransactionStatus::Failed => Tone::Negative,
        };
        table.push(vec![
            Cell::new(format_relative(&session.config.locale, txn.date, session.now)),
            Cell::new(txn.description.as_str()),
            Cell::new(txn.category.as_str()),
            Cell::new(txn.account.as_str()),
            Cell::toned(money(session, txn.signed_amount(), &session.config.currency), amount_tone),
            Cell::toned(txn.status.label(), status_tone),
            Cell::new(if txn.flagged { "flagged" } else { "" }),
        ]);
    }
    output::info(table.render());
    if matched == 0 {
        output::warning("No transactions match the current filters");
    } else {
        output::info(format!("Showing {} of {} matching transaction(s)", rows.len(), matched));
    }
    Ok(())
}

pub fn budgets(session: &Session, status: Option<BudgetStatus>, order: &OrderArgs) -> ServiceResult<()> {
    let order = if order.is_set() {
        Some(order.resolve(SortSpec::asc(SortField::Name))?)
    } else {
        None
    };
    let rows = BudgetService::list(&session.store, status, order)?;
    let currency = &session.config.currency;

    output::section("Budgets");
    let mut table = Table::new(vec![
        TableColumn::left("Category").max_width(24),
        TableColumn::left("Month"),
        TableColumn::right("Allocated"),
        TableColumn::right("Spent"),
        TableColumn::right("Remaining"),
        TableColumn::left("Status"),
    ]);
    for budget in &rows {
        let status = budget.status();
        table.push(vec![
            Cell::new(budget.name.as_str()),
            Cell::new(budget.month.as_str()),
            Cell::new(money(session, budget.allocated, currency)),
            Cell::new(money(session, budget.spent, currency)),
            Cell::new(money(session, budget.remaining(), currency)),
            Cell::toned(status.label(), status_tone(status)),
        ]);
    }
    output::info(table.render());

    let overview = BudgetService::overview(&session.store);
    output::info(format!(
        "Total {} of {} spent, {} remaining",
        money(session, overview.total_spent, currency),
        money(session, overview.total_allocated, currency),
        money(session, overview.remaining(), currency)
    ));
    Ok(())
}

pub fn goals(session: &Session, order: &OrderArgs) -> ServiceResult<()> {
    let order = order.resolve(SortSpec::asc(SortField::Date))?;
    let sorted = GoalService::list(&session.store, order)?;
    let progress = GoalService::progress(&session.store, session.now)?;
    let currency = &session.config.currency;

    output::section("Goals");
    let mut table = Table::new(vec![
        TableColumn::left("Goal").max_width(24),
        TableColumn::right("Saved"),
        TableColumn::right("Target"),
        TableColumn::right("Progress"),
        TableColumn::left("Deadline"),
        TableColumn::right("Days left"),
    ]);
    for goal in &sorted {
        let Some(entry) = progress.iter().find(|entry| entry.goal.id == goal.id) else {
            continue;
        };
        let tone = if entry.is_complete() {
            Tone::Positive
        } else if entry.is_overdue() {
            Tone::Negative
        } else {
            Tone::Plain
        };
        table.push(vec![
            Cell::new(goal.name.as_str()),
            Cell::new(money(session, goal.current_amount, currency)),
            Cell::new(money(session, goal.target_amount, currency)),
            Cell::toned(format!("{}%", entry.percent), tone),
            Cell::new(format_date(&session.config.locale, goal.deadline)),
            Cell::new(entry.days_remaining.to_string()),
        ]);
    }
    output::info(table.render());
    Ok(())
}

pub fn notifications(session: &Session, filter: NotificationFilter) -> ServiceResult<()> {
    let rows = NotificationService::list(&session.store, filter);
    output::section(format!(
        "Notifications ({} unread)",
        NotificationService::unread_count(&session.store)
    ));
    if rows.is_empty() {
        output::info("No notifications");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Notification").max_width(36),
        TableColumn::left("When"),
        TableColumn::left("Message").max_width(60),
    ]);
    for notification in &rows {
        let tone = if notification.read { Tone::Muted } else { Tone::Plain };
        table.push(vec![
            Cell::toned(notification.display_label(), tone),
            Cell::toned(notification.date.as_str(), tone),
            Cell::toned(notification.message.as_str(), tone),
        ]);
    }
    output::info(table.render());
    Ok(())
}

pub fn summary(session: &Session, range: DateRange) -> ServiceResult<()> {
    let summary = SummaryService::dashboard(&session.store, range, session.now);
    let currency = &session.config.currency;

    output::section(format!("Summary ({})", range.label()));
    output::info(format!("Total balance:  {}", money(session, summary.total_balance, currency)));
    output::info(format!("Net worth:      {}", money(session, summary.net_worth, currency)));
    output::info(format!("Income:         {}", money(session, summary.cashflow.income, currency)));
    output::info(format!("Expenses:       {}", money(session, summary.cashflow.expenses, currency)));
    output::info(format!("Net:            {}", money(session, summary.cashflow.net(), currency)));
    output::info(format!(
        "Savings rate:   {}",
        summary
            .savings_rate
            .map(|rate| percent(session, rate))
            .unwrap_or_else(|| "n/a".to_string())
    ));

    output::section("Spending by category");
    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("Spent"),
        TableColumn::right("Share"),
    ]);
    for entry in &summary.spending_by_category {
        table.push(vec![
            Cell::new(entry.category.as_str()),
            Cell::new(money(session, entry.total, currency)),
            Cell::new(percent(session, entry.share)),
        ]);
    }
    output::info(table.render());

    output::section("Monthly cashflow");
    let mut table = Table::new(vec![
        TableColumn::left("Month"),
        TableColumn::right("Income"),
        TableColumn::right("Expenses"),
        TableColumn::right("Net"),
    ]);
    for month in &summary.monthly {
        let net = month.net();
        table.push(vec![
            Cell::new(format!("{}-{:02}", month.year, month.month)),
            Cell::new(money(session, month.income, currency)),
            Cell::new(money(session, month.expenses, currency)),
            Cell::toned(money(session, net, currency), if net < 0.0 { Tone::Negative } else { Tone::Positive }),
        ]);
    }
    output::info(table.render());

    output::section("Budgets");
    let status = summary.budgets.status();
    output::info(format!(
        "{} of {} spent ({})",
        money(session, summary.budgets.total_spent, currency),
        money(session, summary.budgets.total_allocated, currency),
        status.label()
    ));
    Ok(())
}

pub fn configure(session: &Session, action: ConfigAction) -> ServiceResult<()> {
    match action {
        ConfigAction::Show => {
            let json = serde_json::to_string_pretty(&session.config)
                .map_err(FinanceError::from)?;
            output::info(json);
        }
        ConfigAction::Set {
            currency,
            range,
            sort,
            direction,
        } => {
            let currency = currency.map(|raw| CurrencyCode::parse(&raw)).transpose()?;
            let range = range.map(|raw| raw.parse::<DateRange>()).transpose()?;
            let order = OrderArgs { sort, direction };
            let default_sort = if order.is_set() {
                Some(order.resolve(session.config.default_sort)?)
            } else {
                None
            };
            let updated = session.config_manager.update(|config| {
                if let Some(code) = currency {
                    config.currency = code;
                }
                if let Some(range) = range {
                    config.default_range = range;
                }
                if let Some(sort) = default_sort {
                    config.default_sort = sort;
                }
            })?;
            info!(path = %session.config_manager.path().display(), "preferences updated");
            output::success(format!(
                "Preferences saved: {}, {}, sort by {}",
                updated.currency,
                updated.default_range.label(),
                updated.default_sort.field
            ));
        }
    }
    Ok(())
}
