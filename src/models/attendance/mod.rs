pub mod rules;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::enums::define_string_enum;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::models::common::{PaginatedResponse, PaginationQuery};

define_string_enum! {
    pub enum SessionType {
        Lecture => "lecture",
        Lab => "lab",
        Tutorial => "tutorial",
        Seminar => "seminar",
        Exam => "exam",
        Event => "event",
        Other => "other",
    }
}

define_string_enum! {
    /// 考勤场次状态
    pub enum SessionStatus {
        Scheduled => "scheduled",
        Active => "active",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

define_string_enum! {
    pub enum AttendanceStatus {
        Present => "present",
        Late => "late",
        Absent => "absent",
        Excused => "excused",
    }
}

define_string_enum! {
    pub enum AttendanceMethod {
        QrCode => "qr_code",
        Manual => "manual",
    }
}

define_string_enum! {
    pub enum QrCodeStatus {
        Active => "active",
        Expired => "expired",
        Used => "used",
        Disabled => "disabled",
    }
}

/// 考勤场次
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSession {
    pub id: i64,
    pub course_id: i64,
    pub instructor_id: i64,
    pub title: String,
    pub session_type: SessionType,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
    pub actual_start: Option<DateTime<Utc>>,
    pub actual_end: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub attendance_window_minutes: i32,
    pub late_threshold_minutes: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_meters: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 签到二维码，`code` 为客户端渲染的载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceQrCode {
    pub id: i64,
    pub session_id: i64,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub max_usage: Option<i32>,
    pub usage_count: i32,
    pub status: QrCodeStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub session_id: i64,
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub method: AttendanceMethod,
    pub arrival_time: Option<DateTime<Utc>>,
    pub points: f64,
    pub notes: Option<String>,
    pub qr_code_id: Option<i64>,
    pub recorded_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub instructor_id: Option<i64>,
    pub status: Option<SessionStatus>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub course_id: i64,
    pub title: String,
    #[serde(default = "default_session_type")]
    pub session_type: SessionType,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
    pub attendance_window_minutes: Option<i32>,
    pub late_threshold_minutes: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_meters: Option<i32>,
}

fn default_session_type() -> SessionType {
    SessionType::Lecture
}

/// 存储层使用的新场次，默认值已由服务层填充
#[derive(Debug, Clone)]
pub struct NewAttendanceSession {
    pub course_id: i64,
    pub instructor_id: i64,
    pub title: String,
    pub session_type: SessionType,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
    pub attendance_window_minutes: i32,
    pub late_threshold_minutes: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_meters: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateQrCodeRequest {
    /// 有效期（分钟），缺省取配置
    pub validity_minutes: Option<i64>,
    pub max_usage: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ManualRecordRequest {
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

/// 存储层写入的考勤记录
#[derive(Debug, Clone)]
pub struct NewAttendanceRecord {
    pub session_id: i64,
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub method: AttendanceMethod,
    pub arrival_time: Option<DateTime<Utc>>,
    pub points: f64,
    pub notes: Option<String>,
    pub qr_code_id: Option<i64>,
    pub recorded_by: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<AttendanceStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentSummaryParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceStats {
    pub total: u64,
    pub present: u64,
    pub late: u64,
    pub absent: u64,
    pub excused: u64,
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentAttendanceSummary {
    pub student_id: i64,
    pub course_id: Option<i64>,
    pub stats: AttendanceStats,
    pub total_points: f64,
}

#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub record: AttendanceRecord,
    pub session_title: String,
}

/// 结束场次的结果，附带自动补记的缺勤数
#[derive(Debug, Serialize)]
pub struct EndSessionResponse {
    pub session: AttendanceSession,
    pub absent_marked: u64,
}

#[derive(Debug, Serialize)]
pub struct SessionStatsResponse {
    pub session_id: i64,
    pub stats: AttendanceStats,
}

pub type SessionListResponse = PaginatedResponse<AttendanceSession>;
pub type RecordListResponse = PaginatedResponse<AttendanceRecord>;
