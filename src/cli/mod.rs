//! Command-line front end over the demo data set.

pub mod commands;
pub mod output;
pub mod table;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use crate::config::{Config, ConfigManager};
use crate::core::services::ServiceResult;
use crate::domain::validation::parse_instant;
use crate::domain::{BudgetStatus, NotificationFilter, TransactionStatus};
use crate::query::{DateRange, FilterSpec, SortDirection, SortField, SortSpec, TransactionTab};
use crate::store::{seed, FinanceStore};

#[derive(Parser, Debug)]
#[command(name = "finance_core_cli", version, about = "Query the finance dashboard demo data")]
pub struct Cli {
    /// Reference instant for relative date windows (RFC 3339 or YYYY-MM-DD)
    #[arg(long, global = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List accounts
    Accounts {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// List transactions
    Transactions {
        #[command(flatten)]
        query: QueryArgs,

        /// Print at most this many rows
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show budget categories and their status
    Budgets {
        /// on-track, warning or over-budget
        #[arg(long)]
        status: Option<String>,

        #[command(flatten)]
        order: OrderArgs,
    },
    /// Show savings goals and progress
    Goals {
        #[command(flatten)]
        order: OrderArgs,
    },
    /// Show the notification center
    Notifications {
        /// all, unread, alert, payment, budget or savings
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// Dashboard totals, spending by category and monthly cashflow
    Summary {
        /// 7d, 30d, 90d or all
        #[arg(long)]
        range: Option<String>,
    },
    /// Show or change stored preferences
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the current preferences as JSON
    Show,
    /// Update one or more preferences
    Set {
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        range: Option<String>,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        direction: Option<String>,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct OrderArgs {
    /// date, amount, description or name
    #[arg(long)]
    pub sort: Option<String>,

    /// asc or desc
    #[arg(long)]
    pub direction: Option<String>,
}

impl OrderArgs {
    /// Resolves against `fallback`; a bare `--direction` keeps the fallback field.
    pub fn resolve(&self, fallback: SortSpec) -> ServiceResult<SortSpec> {
        let field = match self.sort.as_deref() {
            Some(raw) => raw.parse::<SortField>()?,
            None => fallback.field,
        };
        let direction = match self.direction.as_deref() {
            Some(raw) => raw.parse::<SortDirection>()?,
            None if self.sort.is_some() => SortDirection::Asc,
            None => fallback.direction,
        };
        Ok(SortSpec::new(field, direction))
    }

    pub fn is_set(&self) -> bool {
        self.sort.is_some() || self.direction.is_some()
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct QueryArgs {
    /// Case-insensitive text search
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub account: Option<String>,

    /// income/expense (credit/debit) or an account type
    #[arg(long = "type")]
    pub kind: Option<String>,

    /// pending, completed or failed
    #[arg(long)]
    pub status: Option<String>,

    /// 7d, 30d, 90d or all
    #[arg(long)]
    pub range: Option<String>,

    /// all, flagged or pending
    #[arg(long)]
    pub tab: Option<String>,

    /// Only flagged rows
    #[arg(long)]
    pub flagged: bool,

    #[command(flatten)]
    pub order: OrderArgs,
}

impl QueryArgs {
    pub fn filter_spec(&self, default_range: DateRange) -> ServiceResult<FilterSpec> {
        let mut spec = FilterSpec::new();
        if let Some(text) = &self.search {
            spec = spec.with_search(text.clone());
        }
        if let Some(category) = &self.category {
            spec = spec.with_category(category.clone());
        }
        if let Some(account) = &self.account {
            spec = spec.with_account(account.clone());
        }
        if let Some(kind) = &self.kind {
            spec = spec.with_kind(kind.clone());
        }
        if let Some(status) = &self.status {
            spec = spec.with_status(status.parse::<TransactionStatus>()?);
        }
        let range = match &self.range {
            Some(raw) => raw.parse::<DateRange>()?,
            None => default_range,
        };
        spec = spec.with_date_range(range);
        if let Some(tab) = &self.tab {
            spec = spec.with_tab(tab.parse::<TransactionTab>()?);
        }
        if self.flagged {
            spec = spec.flagged_only();
        }
        Ok(spec)
    }
}

/// Everything a command handler needs.
pub struct Session {
    pub store: FinanceStore,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub now: DateTime<Utc>,
}

impl Session {
    pub fn open(now: DateTime<Utc>) -> ServiceResult<Self> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let store = seed::demo(now)?;
        Ok(Self {
            store,
            config,
            config_manager,
            now,
        })
    }
}

pub fn run_cli() -> ServiceResult<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> ServiceResult<()> {
    let now = match cli.now.as_deref() {
        Some(raw) => parse_instant("now", raw)?,
        None => Utc::now(),
    };
    let session = Session::open(now)?;

    match cli.command {
        Command::Accounts { query } => commands::accounts(&session, &query),
        Command::Transactions { query, limit } => commands::transactions(&session, &query, limit),
        Command::Budgets { status, order } => {
            let status = status.map(|raw| raw.parse::<BudgetStatus>()).transpose()?;
            commands::budgets(&session, status, &order)
        }
        Command::Goals { order } => commands::goals(&session, &order),
        Command::Notifications { filter } => {
            commands::notifications(&session, filter.parse::<NotificationFilter>()?)
        }
        Command::Summary { range } => {
            let range = match range {
                Some(raw) => raw.parse::<DateRange>()?,
                None => session.config.default_range,
            };
            commands::summary(&session, range)
        }
        Command::Config { action } => commands::configure(&session, action),
    }
}
