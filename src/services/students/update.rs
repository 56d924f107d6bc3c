use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, validate_enrollment_year};
use crate::cache::keys;
use crate::models::students::UpdateStudentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{get_cache, storage_failure};
use crate::utils::validate::validate_student_number;

pub async fn update_student(
    service: &StudentService,
    student_id: i64,
    update: UpdateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref number) = update.student_number
        && let Err(msg) = validate_student_number(number)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::StudentNumberInvalid, msg)));
    }
    if let Some(year) = update.enrollment_year
        && let Err(msg) = validate_enrollment_year(year)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);

    match storage.update_student(student_id, update).await {
        Ok(Some(student)) => {
            // 成绩单里带着档案信息
            if let Some(cache) = get_cache(request) {
                cache.remove(&keys::transcript(student.id)).await;
            }
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(student, "Student updated successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::StudentAlreadyExists,
            "Failed to update student",
        )),
    }
}
