use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EnrollmentService, evict_transcript, load_enrollment};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn delete_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let enrollment = match load_enrollment(&storage, enrollment_id).await {
        Ok(enrollment) => enrollment,
        Err(response) => return Ok(response),
    };

    // 成绩项随选课级联删除
    match storage.delete_enrollment(enrollment_id).await {
        Ok(true) => {
            evict_transcript(request, enrollment.student_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Enrollment deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::Conflict,
            "Failed to delete enrollment",
        )),
    }
}
