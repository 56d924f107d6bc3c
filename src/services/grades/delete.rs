use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradeService, grading_enrollment, load_grade};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};

pub async fn delete_grade(
    service: &GradeService,
    grade_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let grade = match load_grade(&storage, grade_id).await {
        Ok(grade) => grade,
        Err(response) => return Ok(response),
    };

    if let Err(response) = grading_enrollment(&storage, grade.enrollment_id, &user).await {
        return Ok(response);
    }

    match storage.delete_grade(grade_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
            "Grade deleted successfully",
        ))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradeNotFound,
            "Grade not found",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::Conflict,
            "Failed to delete grade",
        )),
    }
}
