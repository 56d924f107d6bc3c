use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SemesterService;
use crate::models::semesters::{UpdateSemesterRequest, validate_semester_dates};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;
use crate::utils::validate::validate_name;

pub async fn update_semester(
    service: &SemesterService,
    semester_id: i64,
    update: UpdateSemesterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref name) = update.name
        && let Err(msg) = validate_name(name, 100)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SemesterInvalid, msg)));
    }

    let storage = service.get_storage(request);

    let existing = match storage.get_semester_by_id(semester_id).await {
        Ok(Some(semester)) => semester,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SemesterNotFound,
                "Semester not found",
            )));
        }
        Err(e) => {
            return Ok(storage_failure(
                e,
                ErrorCode::InternalServerError,
                "Failed to get semester",
            ));
        }
    };

    // 部分更新后的日期组合仍须合法
    if let Err(msg) = validate_semester_dates(
        update.start_at.unwrap_or(existing.start_at),
        update.end_at.unwrap_or(existing.end_at),
        update.registration_start.unwrap_or(existing.registration_start),
        update.registration_end.unwrap_or(existing.registration_end),
    ) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SemesterInvalid, msg)));
    }

    match storage.update_semester(semester_id, update).await {
        Ok(Some(semester)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(semester, "Semester updated successfully"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SemesterNotFound,
            "Semester not found",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::SemesterAlreadyExists,
            "Failed to update semester",
        )),
    }
}
