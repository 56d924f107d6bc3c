use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EnrollmentService, course_full, evict_transcript, load_enrollment};
use crate::models::enrollments::{UpdateEnrollmentRequest, validate_final_score};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, managed_course, storage_failure};

pub async fn update_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    update: UpdateEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(score) = update.final_score
        && let Err(msg) = validate_final_score(score)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::GradeInvalid, msg)));
    }

    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let enrollment = match load_enrollment(&storage, enrollment_id).await {
        Ok(enrollment) => enrollment,
        Err(response) => return Ok(response),
    };

    if let Err(response) = managed_course(&storage, enrollment.course_id, &user).await {
        return Ok(response);
    }

    match storage.update_enrollment(enrollment_id, update).await {
        Ok(Some(updated)) => {
            evict_transcript(request, updated.student_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                updated,
                "Enrollment updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found",
        ))),
        Err(e) if e.is_exhausted() => Ok(course_full()),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::Conflict,
            "Failed to update enrollment",
        )),
    }
}
