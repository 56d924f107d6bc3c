use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FinanceService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn cancel_charge(
    service: &FinanceService,
    charge_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.cancel_charge(charge_id).await {
        Ok(Some(charge)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            charge,
            "Charge cancelled successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ChargeNotFound,
            "Charge not found",
        ))),
        Err(e) if e.is_invalid_state() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::ChargeInvalid, "Charge is already cancelled"),
        )),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::Conflict,
            "Failed to cancel charge",
        )),
    }
}
