use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::enums::define_string_enum;
use crate::models::common::pagination::{deserialize_optional_bool, deserialize_optional_i64};
use crate::models::common::{PaginatedResponse, PaginationQuery};

define_string_enum! {
    pub enum SecurityEventType {
        LoginFailed => "login_failed",
        BruteForce => "brute_force",
        AccessDenied => "access_denied",
        RateLimited => "rate_limited",
        InvalidToken => "invalid_token",
    }
}

define_string_enum! {
    pub enum Severity {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

/// 安全审计事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub id: i64,
    pub event_type: SecurityEventType,
    pub severity: Severity,
    pub user_id: Option<i64>,
    pub ip_address: Option<String>,
    pub request_path: Option<String>,
    pub description: String,
    pub is_resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSecurityEvent {
    pub event_type: SecurityEventType,
    pub severity: Severity,
    pub user_id: Option<i64>,
    pub ip_address: Option<String>,
    pub request_path: Option<String>,
    pub description: String,
}

impl NewSecurityEvent {
    pub fn new(event_type: SecurityEventType, severity: Severity, description: String) -> Self {
        Self {
            event_type,
            severity,
            user_id: None,
            ip_address: None,
            request_path: None,
            description,
        }
    }

    pub fn with_user(mut self, user_id: Option<i64>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_request(mut self, ip_address: Option<String>, request_path: &str) -> Self {
        self.ip_address = ip_address;
        self.request_path = Some(request_path.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityEventListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub event_type: Option<SecurityEventType>,
    pub severity: Option<Severity>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_resolved: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub user_id: Option<i64>,
    pub ip_address: Option<String>,
}

/// 安全看板汇总
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecuritySummary {
    pub total_events: u64,
    pub unresolved_events: u64,
    pub events_last_24h: u64,
    pub by_severity: BTreeMap<String, u64>,
    pub by_type: BTreeMap<String, u64>,
}

pub type SecurityEventListResponse = PaginatedResponse<SecurityEvent>;
