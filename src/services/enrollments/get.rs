use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EnrollmentService, check_enrollment_access, load_enrollment};
use crate::models::ApiResponse;
use crate::services::current_user;

pub async fn get_enrollment(
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

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        enrollment,
        "Enrollment retrieved successfully",
    )))
}
