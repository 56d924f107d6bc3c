use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use super::{EnrollmentService, course_full};
use crate::models::enrollments::CreateEnrollmentRequest;
use crate::models::students::{Student, StudentStatus};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::own_student;
use crate::services::{current_user, forbidden, storage_failure};
use crate::storage::Storage;

pub async fn create_enrollment(
    service: &EnrollmentService,
    req: CreateEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    // 1. 确定学生：管理员可替任何人选课，学生只能给自己选
    let student = match user.role {
        UserRole::Admin => {
            let Some(student_id) = req.student_id else {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::ValidationFailed,
                    "student_id is required",
                )));
            };
            match load_student(&storage, student_id).await {
                Ok(student) => student,
                Err(response) => return Ok(response),
            }
        }
        UserRole::Student => {
            let student = match own_student(&storage, &user).await {
                Ok(student) => student,
                Err(response) => return Ok(response),
            };
            if req.student_id.is_some_and(|id| id != student.id) {
                return Ok(forbidden("Students can only enroll themselves"));
            }
            student
        }
        UserRole::Teacher => {
            return Ok(forbidden("Teachers cannot create enrollments"));
        }
    };

    if student.status != StudentStatus::Active {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Only active students can enroll",
        )));
    }

    // 2. 学期存在，学生自助选课须在选课窗口内
    let semester = match storage.get_semester_by_id(req.semester_id).await {
        Ok(Some(semester)) => semester,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SemesterNotFound,
                "Semester not found",
            )));
        }
        Err(e) => {
            return Ok(storage_failure(
                e,
                ErrorCode::InternalServerError,
                "Failed to get semester",
            ));
        }
    };
    if user.role == UserRole::Student && !semester.is_registration_open(Utc::now()) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::RegistrationClosed,
            "Registration is closed for this semester",
        )));
    }

    // 3. 课程存在
    let course = match storage.get_course_by_id(req.course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            return Ok(storage_failure(
                e,
                ErrorCode::InternalServerError,
                "Failed to get course",
            ));
        }
    };

    // 4. 名额在存储事务内检查，重复选课由唯一索引拒绝
    match storage
        .create_enrollment(student.id, course.id, semester.id)
        .await
    {
        Ok(enrollment) => {
            info!(
                "Student {} enrolled in course {} for semester {}",
                student.id, course.id, semester.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                enrollment,
                "Enrollment created successfully",
            )))
        }
        Err(e) if e.is_exhausted() => Ok(course_full()),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::EnrollmentAlreadyExists,
            "Failed to create enrollment",
        )),
    }
}

async fn load_student(storage: &Arc<dyn Storage>, student_id: i64) -> Result<Student, HttpResponse> {
    match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => Ok(student),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => Err(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to get student",
        )),
    }
}
