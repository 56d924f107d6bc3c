use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::pagination::deserialize_optional_i64;
use crate::models::common::{PaginatedResponse, PaginationQuery};
use crate::models::enrollments::EnrollmentStatus;
use crate::models::students::Student;

pub const MIN_CREDIT_HOURS: i32 = 1;
pub const MAX_CREDIT_HOURS: i32 = 12;

/// 课程
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub department_id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub credit_hours: i32,
    pub teacher_id: Option<i64>,
    pub max_students: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// 课程教师或管理员可以管理课程下的成绩与考勤
    pub fn is_managed_by(&self, user: &crate::models::users::entities::User) -> bool {
        user.is_admin() || self.teacher_id == Some(user.id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub department_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub teacher_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub department_id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub credit_hours: i32,
    pub teacher_id: Option<i64>,
    #[serde(default = "default_max_students")]
    pub max_students: i32,
}

fn default_max_students() -> i32 {
    50
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCourseRequest {
    pub department_id: Option<i64>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub credit_hours: Option<i32>,
    pub teacher_id: Option<i64>,
    pub max_students: Option<i32>,
}

/// 课程花名册中的一行
#[derive(Debug, Clone, Serialize)]
pub struct CourseStudent {
    pub enrollment_id: i64,
    pub semester_id: i64,
    pub status: EnrollmentStatus,
    pub student: Student,
}

pub type CourseListResponse = PaginatedResponse<Course>;

/// 花名册查询，可按学期过滤
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseStudentsParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub semester_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CourseStudentsResponse {
    pub course_id: i64,
    pub items: Vec<CourseStudent>,
}

/// 学分范围校验
pub fn validate_credit_hours(credit_hours: i32) -> Result<(), String> {
    if (MIN_CREDIT_HOURS..=MAX_CREDIT_HOURS).contains(&credit_hours) {
        Ok(())
    } else {
        Err(format!(
            "Credit hours must be between {MIN_CREDIT_HOURS} and {MAX_CREDIT_HOURS}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_hours_bounds() {
        assert!(validate_credit_hours(1).is_ok());
        assert!(validate_credit_hours(12).is_ok());
        assert!(validate_credit_hours(0).is_err());
        assert!(validate_credit_hours(13).is_err());
    }
}
