//! Admin notification model

use serde::{Deserialize, Serialize};

/// Notification kind tag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewOrder,
}

impl NotificationKind {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "new_order" => Some(Self::NewOrder),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::NewOrder => "new_order",
        }
    }
}

/// Admin notification (at most one `new_order` per order)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub order_id: String,
    pub is_read: bool,
    pub created_at: i64,
}

/// Create notification payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationCreate {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub order_id: String,
}

/// Latest notifications plus unread counter (admin bell)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
}
