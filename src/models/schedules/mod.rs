use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::pagination::deserialize_optional_i64;
use crate::scheduler::{ScheduleReport, ScheduledSession, SchedulingRequest, TimeSlot};

/// 已保存的排课结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: i64,
    pub semester_id: i64,
    pub course_id: i64,
    pub teacher_id: i64,
    pub slot: TimeSlot,
    pub room_type: Option<String>,
    pub room_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewScheduleEntry {
    pub semester_id: i64,
    pub course_id: i64,
    pub teacher_id: i64,
    pub slot: TimeSlot,
    pub room_type: Option<String>,
    pub room_id: Option<i64>,
}

impl NewScheduleEntry {
    pub fn from_session(semester_id: i64, session: &ScheduledSession) -> Self {
        Self {
            semester_id,
            course_id: session.course_id,
            teacher_id: session.teacher_id,
            slot: session.slot,
            room_type: session.room_type.clone(),
            room_id: session.room_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateScheduleRequest {
    pub semester_id: i64,
    pub requests: Vec<SchedulingRequest>,
    /// 为真时用本次结果替换该学期已保存的排课
    #[serde(default)]
    pub persist: bool,
}

#[derive(Debug, Serialize)]
pub struct GenerateScheduleResponse {
    pub semester_id: i64,
    pub persisted: bool,
    #[serde(flatten)]
    pub report: ScheduleReport,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleListParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub semester_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub teacher_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleListResponse {
    pub items: Vec<ScheduleEntry>,
}
