use tracing::debug;

use crate::domain::notification::{filter_notifications, unread_count};
use crate::domain::{Notification, NotificationFilter};
use crate::store::FinanceStore;

use super::ServiceResult;

pub struct NotificationService;

impl NotificationService {
    pub fn list(store: &FinanceStore, filter: NotificationFilter) -> Vec<Notification> {
        let rows = filter_notifications(&store.notifications(), filter);
        debug!(matched = rows.len(), ?filter, "notifications queried");
        rows
    }

    /// Badge count shown on the bell icon.
    pub fn unread_count(store: &FinanceStore) -> usize {
        unread_count(&store.notifications())
    }

    pub fn mark_read(store: &FinanceStore, id: &str) -> ServiceResult<()> {
        Ok(store.mark_notification_read(id)?)
    }

    pub fn mark_all_read(store: &FinanceStore) -> usize {
        store.mark_all_notifications_read()
    }

    pub fn delete(store: &FinanceStore, id: &str) -> ServiceResult<Notification> {
        Ok(store.delete_notification(id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NotificationKind;
    use crate::store::seed;
    use chrono::{TimeZone, Utc};

    fn store() -> FinanceStore {
        seed::demo(Utc.with_ymd_and_hms(2023, 5, 28, 18, 0, 0).unwrap()).unwrap()
    }

    #[test]
    fn badge_follows_read_actions() {
        let store = store();
        assert_eq!(NotificationService::unread_count(&store), 2);
        NotificationService::mark_read(&store, "1").unwrap();
        assert_eq!(NotificationService::unread_count(&store), 1);
        assert_eq!(NotificationService::mark_all_read(&store), 1);
        assert_eq!(NotificationService::unread_count(&store), 0);
    }

    #[test]
    fn kind_tab_and_delete() {
        let store = store();
        let payments = NotificationService::list(&store, NotificationFilter::Kind(NotificationKind::Payment));
        assert_eq!(payments.len(), 2);
        NotificationService::delete(&store, "2").unwrap();
        assert_eq!(
            NotificationService::list(&store, NotificationFilter::Kind(NotificationKind::Payment)).len(),
            1
        );
        assert!(NotificationService::mark_read(&store, "2").is_err());
    }
}
