use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 管理员系统概览
#[derive(Debug, Clone, Serialize)]
pub struct SystemOverview {
    pub system_name: String,
    pub environment: String,
    pub users_by_role: BTreeMap<String, u64>,
    pub total_students: u64,
    pub total_courses: u64,
    pub active_enrollments: u64,
    pub unresolved_security_events: u64,
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: i64,
}

/// 存储层统计结果
#[derive(Debug, Clone, Default)]
pub struct SystemCounts {
    pub users_by_role: BTreeMap<String, u64>,
    pub total_students: u64,
    pub total_courses: u64,
    pub active_enrollments: u64,
    pub unresolved_security_events: u64,
}
