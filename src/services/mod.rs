pub mod attendance;
pub mod auth;
pub mod courses;
pub mod departments;
pub mod devices;
pub mod enrollments;
pub mod finance;
pub mod grades;
pub mod notifications;
pub mod schedules;
pub mod security;
pub mod semesters;
pub mod staff;
pub mod students;
pub mod system;
pub mod users;

pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use courses::CourseService;
pub use departments::DepartmentService;
pub use devices::DeviceService;
pub use enrollments::EnrollmentService;
pub use finance::FinanceService;
pub use grades::GradeService;
pub use notifications::NotificationService;
pub use schedules::ScheduleService;
pub use security::SecurityService;
pub use semesters::SemesterService;
pub use staff::StaffService;
pub use students::StudentService;
pub use system::SystemService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;
use tracing::error;

use crate::cache::ObjectCache;
use crate::errors::UniSystemError;
use crate::middlewares::RequireJWT;
use crate::models::courses::Course;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 请求中的缓存实例
pub(crate) fn get_cache(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .map(|cache| cache.get_ref().clone())
}

/// 当前登录用户，缺失时给出 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

pub(crate) fn forbidden(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, message))
}

/// 存储层错误转换为响应：唯一冲突 409，外键或校验失败 400，其余 500
pub(crate) fn storage_failure(err: UniSystemError, conflict: ErrorCode, action: &str) -> HttpResponse {
    match err {
        UniSystemError::Conflict(_) => HttpResponse::Conflict().json(ApiResponse::error_empty(
            conflict,
            format!("{action}: resource already exists"),
        )),
        UniSystemError::Validation(detail) => {
            HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ValidationFailed,
                format!("{action}: {detail}"),
            ))
        }
        UniSystemError::NotFound(detail) => HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::NotFound, detail)),
        other => {
            error!("{}: {}", action, other);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                action.to_string(),
            ))
        }
    }
}

/// 读取课程并要求当前用户是课程教师或管理员
pub(crate) async fn managed_course(
    storage: &Arc<dyn Storage>,
    course_id: i64,
    user: &User,
) -> Result<Course, HttpResponse> {
    match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) if course.is_managed_by(user) => Ok(course),
        Ok(Some(_)) => Err(forbidden(
            "Only the course teacher or an administrator may do this",
        )),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Err(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to load course",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_storage_failure_status_mapping() {
        let conflict = storage_failure(
            UniSystemError::conflict("创建课程失败: UNIQUE"),
            ErrorCode::CourseAlreadyExists,
            "Failed to create course",
        );
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let fk = storage_failure(
            UniSystemError::validation("创建课程失败: FOREIGN KEY"),
            ErrorCode::CourseAlreadyExists,
            "Failed to create course",
        );
        assert_eq!(fk.status(), StatusCode::BAD_REQUEST);

        let db = storage_failure(
            UniSystemError::database_operation("connection reset"),
            ErrorCode::CourseAlreadyExists,
            "Failed to create course",
        );
        assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
