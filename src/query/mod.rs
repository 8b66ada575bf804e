//! Filter and sort engine over immutable entity snapshots.

pub mod filter;
pub mod sort;

pub use filter::{
    distinct_accounts, distinct_categories, filter, DateRange, FilterSpec, Filterable,
    SearchField, TransactionTab,
};
pub use sort::{sort, SortDirection, SortField, SortKey, SortSpec, Sortable};

use chrono::{DateTime, Utc};

use crate::errors::FinanceResult;

/// Filters then sorts `items` in one call.
pub fn run<T>(
    items: &[T],
    spec: &FilterSpec,
    order: SortSpec,
    now: DateTime<Utc>,
) -> FinanceResult<Vec<T>>
where
    T: Filterable + Sortable + Clone,
{
    let filtered = filter(items, spec, now);
    sort(&filtered, order)
}
