use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StaffService, staff_not_found};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn delete_staff(
    service: &StaffService,
    staff_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_staff_member(staff_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
            "Staff member deleted successfully",
        ))),
        Ok(false) => Ok(staff_not_found()),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to delete staff member",
        )),
    }
}
