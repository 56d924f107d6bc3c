use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StaffService, staff_not_found};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn get_staff(
    service: &StaffService,
    staff_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_staff_member_by_id(staff_id).await {
        Ok(Some(staff)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            staff,
            "Staff member retrieved successfully",
        ))),
        Ok(None) => Ok(staff_not_found()),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to get staff member",
        )),
    }
}
