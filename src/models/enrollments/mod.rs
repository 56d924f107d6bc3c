use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::enums::define_string_enum;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::models::common::{PaginatedResponse, PaginationQuery};
use crate::models::grades::{Grade, GradeSummary};

define_string_enum! {
    /// 选课状态
    pub enum EnrollmentStatus {
        Enrolled => "enrolled",
        Dropped => "dropped",
        Completed => "completed",
        Failed => "failed",
    }
}

impl EnrollmentStatus {
    /// 已出最终成绩，计入 GPA
    pub fn is_graded(&self) -> bool {
        matches!(self, EnrollmentStatus::Completed | EnrollmentStatus::Failed)
    }

    /// 占用课程名额
    pub fn occupies_seat(&self) -> bool {
        !matches!(self, EnrollmentStatus::Dropped)
    }
}

/// 学生在某学期选修某门课
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub semester_id: i64,
    pub status: EnrollmentStatus,
    pub final_score: Option<f64>,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrollmentListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub semester_id: Option<i64>,
    pub status: Option<EnrollmentStatus>,
}

/// 学生自助选课时 student_id 省略
#[derive(Debug, Deserialize)]
pub struct CreateEnrollmentRequest {
    pub student_id: Option<i64>,
    pub course_id: i64,
    pub semester_id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateEnrollmentRequest {
    pub status: Option<EnrollmentStatus>,
    pub final_score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct EnrollmentGradesResponse {
    pub enrollment: Enrollment,
    pub grades: Vec<Grade>,
    pub summary: GradeSummary,
}

pub type EnrollmentListResponse = PaginatedResponse<Enrollment>;

pub fn validate_final_score(score: f64) -> Result<(), &'static str> {
    if score.is_finite() && (0.0..=100.0).contains(&score) {
        Ok(())
    } else {
        Err("Final score must be between 0 and 100")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_helpers() {
        assert!(EnrollmentStatus::Completed.is_graded());
        assert!(EnrollmentStatus::Failed.is_graded());
        assert!(!EnrollmentStatus::Enrolled.is_graded());
        assert!(!EnrollmentStatus::Dropped.occupies_seat());
    }

    #[test]
    fn test_final_score_range() {
        assert!(validate_final_score(0.0).is_ok());
        assert!(validate_final_score(100.0).is_ok());
        assert!(validate_final_score(100.5).is_err());
        assert!(validate_final_score(-0.1).is_err());
    }
}
