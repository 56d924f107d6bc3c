pub mod attendance;
pub mod auth;
pub mod common;
pub mod courses;
pub mod departments;
pub mod devices;
pub mod enrollments;
pub mod finance;
pub mod grades;
pub mod insights;
pub mod notifications;
pub mod schedules;
pub mod security;
pub mod semesters;
pub mod staff;
pub mod students;
pub mod system;
pub mod users;

mod error_code;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};
pub use error_code::ErrorCode;

/// 进程启动时间，用于计算运行时长
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// Unix 秒转换为 UTC 时间，非法值回退到纪元
pub(crate) fn from_timestamp(ts: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::<chrono::Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
