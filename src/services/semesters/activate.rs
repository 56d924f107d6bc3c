use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SemesterService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn activate_semester(
    service: &SemesterService,
    semester_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 同一时刻只有一个当前学期
    match storage.activate_semester(semester_id).await {
        Ok(Some(semester)) => {
            info!("Semester {} is now current", semester.name);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                semester,
                "Semester activated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SemesterNotFound,
            "Semester not found",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to activate semester",
        )),
    }
}
