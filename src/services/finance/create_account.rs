use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FinanceService;
use crate::models::finance::CreateAccountRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn create_account(
    service: &FinanceService,
    req: CreateAccountRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if req.credit_limit_cents < 0 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Credit limit must not be negative",
        )));
    }

    let storage = service.get_storage(request);

    match storage.get_student_by_id(req.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => {
            return Ok(storage_failure(
                e,
                ErrorCode::InternalServerError,
                "Failed to get student",
            ));
        }
    }

    match storage.create_student_account(req).await {
        Ok(account) => {
            info!(
                "Account {} opened for student {}",
                account.account_number, account.student_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                account,
                "Account created successfully",
            )))
        }
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::AccountAlreadyExists,
            "Failed to create account",
        )),
    }
}
