use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AttendanceService, load_session};
use crate::models::ApiResponse;

pub async fn get_session(
    service: &AttendanceService,
    session_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match load_session(&storage, session_id).await {
        Ok(session) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            session,
            "Attendance session retrieved successfully",
        ))),
        Err(response) => Ok(response),
    }
}
