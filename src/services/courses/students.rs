use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::courses::{CourseStudentsParams, CourseStudentsResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, managed_course, storage_failure};

pub async fn list_course_students(
    service: &CourseService,
    course_id: i64,
    query: CourseStudentsParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    // 只有本课程教师或管理员能看花名册
    if let Err(response) = managed_course(&storage, course_id, &user).await {
        return Ok(response);
    }

    match storage.list_course_students(course_id, query.semester_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CourseStudentsResponse { course_id, items },
            "Course students retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to retrieve course students",
        )),
    }
}
