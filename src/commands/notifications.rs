use crate::{
    models::{NewNotification, Notification},
    AppState,
};

use super::{list, require_session};

/// Newest first.
pub async fn get_notifications(state: &AppState) -> Result<Vec<Notification>, String> {
    let mut notifications: Vec<Notification> = list(state)?;
    notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(notifications)
}

pub async fn get_unread_count(state: &AppState) -> Result<usize, String> {
    require_session(state)?;
    Ok(state
        .store
        .snapshot()
        .notifications
        .iter()
        .filter(|notification| !notification.read)
        .count())
}

pub async fn push_notification(
    state: &AppState,
    input: NewNotification,
) -> Result<Notification, String> {
    require_session(state)?;
    let id = state.store.add_notification(input);
    state
        .store
        .get::<Notification>(&id)
        .ok_or_else(|| format!("Notification {id} vanished"))
}

pub async fn mark_notification_read(state: &AppState, id: String) -> Result<(), String> {
    require_session(state)?;
    state.store.mark_notification_as_read(&id);
    Ok(())
}

pub async fn delete_notification(state: &AppState, id: String) -> Result<(), String> {
    require_session(state)?;
    state.store.delete_notification(&id);
    Ok(())
}

pub async fn clear_notifications(state: &AppState) -> Result<(), String> {
    require_session(state)?;
    state.store.clear_notifications();
    Ok(())
}
