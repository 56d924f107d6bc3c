use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SemesterService;
use crate::models::semesters::{CreateSemesterRequest, validate_semester_dates};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;
use crate::utils::validate::validate_name;

pub async fn create_semester(
    service: &SemesterService,
    req: CreateSemesterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_name(&req.name, 100) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SemesterInvalid, msg)));
    }
    if let Err(msg) = validate_semester_dates(
        req.start_at,
        req.end_at,
        req.registration_start,
        req.registration_end,
    ) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SemesterInvalid, msg)));
    }

    let storage = service.get_storage(request);

    match storage.create_semester(req).await {
        Ok(semester) => {
            info!("Semester {} created", semester.name);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(semester, "Semester created successfully")))
        }
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::SemesterAlreadyExists,
            "Failed to create semester",
        )),
    }
}
