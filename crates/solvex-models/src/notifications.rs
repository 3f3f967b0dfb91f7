//! In-app notifications.
//!
//! A notification is addressed to an `(id, role)` pair, since ids are only
//! unique within one account table.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Info => "info",
            NotificationType::Success => "success",
            NotificationType::Warning => "warning",
            NotificationType::Error => "error",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: i64,
    pub recipient_id: i64,
    pub recipient_role: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub notification_type: String,
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct NotificationQuery {
    /// Only return unread notifications
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_as_str() {
        assert_eq!(NotificationType::Success.as_str(), "success");
        assert_eq!(NotificationType::Info.to_string(), "info");
    }

    #[test]
    fn test_notification_type_key() {
        let n = Notification {
            id: 1,
            recipient_id: 2,
            recipient_role: "student".to_string(),
            title: "Hi".to_string(),
            message: "Hello".to_string(),
            notification_type: "info".to_string(),
            read: false,
            read_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["type"], "info");
        assert_eq!(value["read"], false);
    }
}
