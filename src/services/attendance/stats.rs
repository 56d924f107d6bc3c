use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AttendanceService, managed_session};
use crate::models::attendance::SessionStatsResponse;
use crate::models::attendance::rules::summarize;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};

pub async fn session_stats(
    service: &AttendanceService,
    session_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    if let Err(response) = managed_session(&storage, session_id, &user).await {
        return Ok(response);
    }

    match storage.list_session_records(session_id).await {
        Ok(records) => {
            let stats = summarize(records.iter().map(|r| r.status));
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SessionStatsResponse { session_id, stats },
                "Attendance statistics retrieved successfully",
            )))
        }
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to compute attendance statistics",
        )),
    }
}
