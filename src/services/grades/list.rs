use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::grades::GradeListParams;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::enrollments::{check_enrollment_access, load_enrollment};
use crate::services::{current_user, forbidden, storage_failure};

pub async fn list_grades(
    service: &GradeService,
    query: GradeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    // 非管理员必须按选课查询
    match query.enrollment_id {
        Some(enrollment_id) => {
            let enrollment = match load_enrollment(&storage, enrollment_id).await {
                Ok(enrollment) => enrollment,
                Err(response) => return Ok(response),
            };
            if let Err(response) = check_enrollment_access(&storage, &enrollment, &user).await {
                return Ok(response);
            }
        }
        None if user.is_admin() => {}
        None => return Ok(forbidden("enrollment_id is required")),
    }

    match storage.list_grades_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Grade list retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to retrieve grade list",
        )),
    }
}
