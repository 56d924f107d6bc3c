use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::enums::define_string_enum;
use crate::models::common::pagination::deserialize_optional_bool;
use crate::models::common::{PaginatedResponse, PaginationQuery};

define_string_enum! {
    pub enum NotificationType {
        Grade => "grade",
        Attendance => "attendance",
        Enrollment => "enrollment",
        Announcement => "announcement",
        System => "system",
    }
}

define_string_enum! {
    pub enum NotificationPriority {
        Low => "low",
        Normal => "normal",
        High => "high",
        Urgent => "urgent",
    }
}

/// 站内通知
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// 存储层写入的通知
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_read: Option<bool>,
    pub notification_type: Option<NotificationType>,
}

/// 教师或管理员发送通知，`user_id` 与 `course_id` 二选一
#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    pub user_id: Option<i64>,
    pub course_id: Option<i64>,
    #[serde(default = "default_notification_type")]
    pub notification_type: NotificationType,
    #[serde(default = "default_priority")]
    pub priority: NotificationPriority,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
}

fn default_notification_type() -> NotificationType {
    NotificationType::Announcement
}

fn default_priority() -> NotificationPriority {
    NotificationPriority::Normal
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread_count: u64,
}

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub marked_count: u64,
}

#[derive(Debug, Serialize)]
pub struct SendNotificationResponse {
    pub sent: usize,
}

pub type NotificationListResponse = PaginatedResponse<Notification>;
