use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{FinanceService, posting_failure};
use crate::models::finance::RecordPaymentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;

const MAX_REFERENCE_LEN: usize = 100;

pub async fn record_payment(
    service: &FinanceService,
    account_id: i64,
    req: RecordPaymentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if req.amount_cents <= 0 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PaymentInvalid,
            "Payment amount must be positive",
        )));
    }
    if req
        .reference
        .as_ref()
        .is_some_and(|r| r.chars().count() > MAX_REFERENCE_LEN)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PaymentInvalid,
            format!("Reference must not exceed {MAX_REFERENCE_LEN} characters"),
        )));
    }

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    match storage.record_payment(account_id, req, user.id).await {
        Ok(payment) => {
            info!(
                "Payment {} of {} cents recorded on account {}",
                payment.id, payment.amount_cents, account_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                payment,
                "Payment recorded successfully",
            )))
        }
        Err(e) => Ok(posting_failure(e, "Failed to record payment")),
    }
}
