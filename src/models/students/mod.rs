use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::enums::define_string_enum;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::models::common::{PaginatedResponse, PaginationQuery};
use crate::models::enrollments::EnrollmentStatus;

define_string_enum! {
    /// 学籍状态
    pub enum StudentStatus {
        Active => "active",
        Graduated => "graduated",
        Suspended => "suspended",
        Withdrawn => "withdrawn",
    }
}

/// 学生档案，一个用户至多一个
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub user_id: i64,
    pub student_number: String,
    pub department_id: i64,
    pub enrollment_year: i32,
    pub status: StudentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub department_id: Option<i64>,
    pub status: Option<StudentStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub enrollment_year: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    pub user_id: i64,
    pub student_number: String,
    pub department_id: i64,
    pub enrollment_year: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateStudentRequest {
    pub student_number: Option<String>,
    pub department_id: Option<i64>,
    pub enrollment_year: Option<i32>,
    pub status: Option<StudentStatus>,
}

pub type StudentListResponse = PaginatedResponse<Student>;

/// 成绩单中的一门课
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptCourse {
    pub enrollment_id: i64,
    pub course_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub credit_hours: i32,
    pub status: EnrollmentStatus,
    pub final_score: Option<f64>,
    pub letter: Option<String>,
    pub grade_points: Option<f64>,
}

/// 成绩单中的一个学期
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSemester {
    pub semester_id: i64,
    pub semester_name: String,
    pub courses: Vec<TranscriptCourse>,
    pub gpa: f64,
    pub earned_credits: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub student: Student,
    pub semesters: Vec<TranscriptSemester>,
    pub cumulative_gpa: f64,
    pub earned_credits: i32,
}
