use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EnrollmentService, check_enrollment_access, evict_transcript, load_enrollment};
use crate::models::enrollments::{EnrollmentStatus, UpdateEnrollmentRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};

pub async fn drop_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let enrollment = match load_enrollment(&storage, enrollment_id).await {
        Ok(enrollment) => enrollment,
        Err(response) => return Ok(response),
    };

    if let Err(response) = check_enrollment_access(&storage, &enrollment, &user).await {
        return Ok(response);
    }

    // 只有在读的选课可以退
    if enrollment.status != EnrollmentStatus::Enrolled {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentNotActive,
            format!("Enrollment is already {}", enrollment.status),
        )));
    }

    let update = UpdateEnrollmentRequest {
        status: Some(EnrollmentStatus::Dropped),
        final_score: None,
    };

    match storage.update_enrollment(enrollment_id, update).await {
        Ok(Some(updated)) => {
            info!("Enrollment {} dropped by user {}", enrollment_id, user.id);
            evict_transcript(request, updated.student_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                updated,
                "Enrollment dropped successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::Conflict,
            "Failed to drop enrollment",
        )),
    }
}
