use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FinanceService, account_not_found, load_statement};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn get_account(
    service: &FinanceService,
    account_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let account = match storage.get_student_account_by_id(account_id).await {
        Ok(Some(account)) => account,
        Ok(None) => return Ok(account_not_found()),
        Err(e) => {
            return Ok(storage_failure(
                e,
                ErrorCode::InternalServerError,
                "Failed to get account",
            ));
        }
    };

    match load_statement(&storage, account).await {
        Ok(statement) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            statement,
            "Account retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to build account statement",
        )),
    }
}
