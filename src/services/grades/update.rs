use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradeService, grading_enrollment, load_grade};
use crate::models::grades::{UpdateGradeRequest, validate_grade_values};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};
use crate::utils::validate::validate_name;

pub async fn update_grade(
    service: &GradeService,
    grade_id: i64,
    update: UpdateGradeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref title) = update.title
        && let Err(msg) = validate_name(title, 200)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::GradeInvalid, msg)));
    }

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

    // 部分更新后的分值组合仍须合法
    if let Err(msg) = validate_grade_values(
        update.points_earned.unwrap_or(grade.points_earned),
        update.points_possible.unwrap_or(grade.points_possible),
        update.weight.unwrap_or(grade.weight),
    ) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::GradeInvalid, msg)));
    }

    match storage.update_grade(grade_id, update, user.id).await {
        Ok(Some(grade)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(grade, "Grade updated successfully"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradeNotFound,
            "Grade not found",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::Conflict,
            "Failed to update grade",
        )),
    }
}
