//! Field and direction ordering with a deterministic tie-break.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::Identifiable;
use crate::errors::{FinanceError, FinanceResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Date,
    Amount,
    Description,
    Name,
}

impl SortField {
    pub fn label(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Amount => "amount",
            SortField::Description => "description",
            SortField::Name => "name",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortField {
    type Err = FinanceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortField::Date),
            "amount" => Ok(SortField::Amount),
            "description" => Ok(SortField::Description),
            "name" => Ok(SortField::Name),
            other => Err(FinanceError::unknown_field("sort", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = FinanceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(FinanceError::validation(
                "direction",
                format!("`{}` is not one of asc, desc", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::Date,
            direction: SortDirection::Desc,
        }
    }
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn asc(field: SortField) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: SortField) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Column-header behaviour: the active field flips direction, a new field
    /// starts ascending.
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            Self::new(field, self.direction.flipped())
        } else {
            Self::asc(field)
        }
    }
}

/// Comparable value extracted from an entity for one [`SortField`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortKey<'a> {
    Instant(DateTime<Utc>),
    Day(NaiveDate),
    Number(f64),
    Text(&'a str),
}

impl SortKey<'_> {
    fn compare(&self, other: &SortKey<'_>) -> Ordering {
        match (self, other) {
            (SortKey::Instant(a), SortKey::Instant(b)) => a.cmp(b),
            (SortKey::Day(a), SortKey::Day(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => compare_text(a, b),
            _ => Ordering::Equal,
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

pub trait Sortable: Identifiable {
    /// Entity name used in [`FinanceError::UnknownField`].
    const ENTITY: &'static str;

    fn sortable_fields() -> &'static [SortField];

    /// Key for `field`; only called for fields listed by [`Sortable::sortable_fields`].
    fn sort_key(&self, field: SortField) -> Option<SortKey<'_>>;
}

/// Returns a new ordered vector; `items` is left untouched.
///
/// Equal primary keys fall back to the id, in the same direction, so an
/// ascending sort reversed is exactly the descending sort.
pub fn sort<T>(items: &[T], spec: SortSpec) -> FinanceResult<Vec<T>>
where
    T: Sortable + Clone,
{
    if !T::sortable_fields().contains(&spec.field) {
        return Err(FinanceError::unknown_field(T::ENTITY, spec.field.label()));
    }
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| {
        let primary = match (a.sort_key(spec.field), b.sort_key(spec.field)) {
            (Some(left), Some(right)) => left.compare(&right),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        let ordering = primary.then_with(|| a.id().cmp(b.id()));
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    Ok(sorted)
}
