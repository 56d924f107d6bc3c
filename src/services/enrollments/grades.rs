use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EnrollmentService, check_enrollment_access, load_enrollment};
use crate::models::enrollments::EnrollmentGradesResponse;
use crate::models::grades::GradeSummary;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};

pub async fn enrollment_grades(
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

    match storage.list_grades_by_enrollment(enrollment_id).await {
        Ok(grades) => {
            let summary = GradeSummary::from_grades(&grades);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                EnrollmentGradesResponse {
                    enrollment,
                    grades,
                    summary,
                },
                "Enrollment grades retrieved successfully",
            )))
        }
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to load grades",
        )),
    }
}
