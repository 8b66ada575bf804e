use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::common::*;
use crate::errors::FinanceError;
use crate::utils::generate_id;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Alert,
    Payment,
    Budget,
    Savings,
}

impl NotificationKind {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::Alert => "alert",
            NotificationKind::Payment => "payment",
            NotificationKind::Budget => "budget",
            NotificationKind::Savings => "savings",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NotificationKind {
    type Err = FinanceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "alert" => Ok(NotificationKind::Alert),
            "payment" => Ok(NotificationKind::Payment),
            "budget" => Ok(NotificationKind::Budget),
            "savings" => Ok(NotificationKind::Savings),
            other => Err(FinanceError::validation(
                "type",
                format!("`{}` is not alert, payment, budget or savings", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Display string, e.g. "2 days ago".
    pub date: String,
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_id("n"),
            title: title.into(),
            message: message.into(),
            kind,
            date: date.into(),
            read: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl Identifiable for Notification {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Notification {
    fn display_label(&self) -> String {
        let marker = if self.read { " " } else { "*" };
        format!("{}{} [{}]", marker, self.title, self.kind)
    }
}

/// Tabs offered by the notification center.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum NotificationFilter {
    #[default]
    All,
    Unread,
    Kind(NotificationKind),
}

impl NotificationFilter {
    pub fn matches(&self, notification: &Notification) -> bool {
        match self {
            NotificationFilter::All => true,
            NotificationFilter::Unread => !notification.read,
            NotificationFilter::Kind(kind) => notification.kind == *kind,
        }
    }
}

impl FromStr for NotificationFilter {
    type Err = FinanceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(NotificationFilter::All),
            "unread" => Ok(NotificationFilter::Unread),
            other => other.parse().map(NotificationFilter::Kind),
        }
    }
}

/// Notifications passing `filter`, in their original order.
pub fn filter_notifications(items: &[Notification], filter: NotificationFilter) -> Vec<Notification> {
    items
        .iter()
        .filter(|notification| filter.matches(notification))
        .cloned()
        .collect()
}

pub fn unread_count(items: &[Notification]) -> usize {
    items.iter().filter(|notification| !notification.read).count()
}
