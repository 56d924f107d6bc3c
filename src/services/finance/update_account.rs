use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{FinanceService, account_not_found};
use crate::models::finance::UpdateAccountRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn update_account(
    service: &FinanceService,
    account_id: i64,
    update: UpdateAccountRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if update.credit_limit_cents.is_some_and(|limit| limit < 0) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Credit limit must not be negative",
        )));
    }

    let storage = service.get_storage(request);
    let new_status = update.status;

    match storage.update_student_account(account_id, update).await {
        Ok(Some(account)) => {
            if let Some(status) = new_status {
                info!("Account {} set to {}", account.account_number, status);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                account,
                "Account updated successfully",
            )))
        }
        Ok(None) => Ok(account_not_found()),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::Conflict,
            "Failed to update account",
        )),
    }
}
