use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CourseService, check_teacher, validate_max_students};
use crate::models::courses::{CreateCourseRequest, validate_credit_hours};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;
use crate::utils::validate::{validate_code, validate_name};

pub async fn create_course(
    service: &CourseService,
    req: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_code(&req.code) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::CourseInvalid, msg)));
    }
    if let Err(msg) = validate_name(&req.name, 200) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::CourseInvalid, msg)));
    }
    if let Err(msg) = validate_credit_hours(req.credit_hours) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::CourseInvalid, msg)));
    }
    if let Err(msg) = validate_max_students(req.max_students) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::CourseInvalid, msg)));
    }

    let storage = service.get_storage(request);

    if let Some(teacher_id) = req.teacher_id
        && let Err(response) = check_teacher(&storage, teacher_id).await
    {
        return Ok(response);
    }

    match storage.create_course(req).await {
        Ok(course) => {
            info!("Course {} created", course.code);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(course, "Course created successfully")))
        }
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::CourseAlreadyExists,
            "Failed to create course",
        )),
    }
}
