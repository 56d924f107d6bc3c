use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FinanceService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn refund_payment(
    service: &FinanceService,
    payment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.refund_payment(payment_id).await {
        Ok(Some(payment)) => {
            info!("Payment {} refunded", payment.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                payment,
                "Payment refunded successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PaymentNotFound,
            "Payment not found",
        ))),
        Err(e) if e.is_invalid_state() => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(
                ErrorCode::PaymentAlreadyRefunded,
                "Payment is already refunded",
            ),
        )),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::Conflict,
            "Failed to refund payment",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::finance::{CreateAccountRequest, PaymentMethod, RecordPaymentRequest};
    use crate::services::finance::test_support::request_as;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::{seed_catalog, test_storage};
    use actix_web::http::StatusCode;
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_second_refund_conflicts() {
        let inner = test_storage().await;
        let seed = seed_catalog(&inner).await;
        let account = inner
            .create_student_account_impl(CreateAccountRequest {
                student_id: seed.student_id,
                credit_limit_cents: 0,
                notes: None,
            })
            .await
            .unwrap();
        let payment = inner
            .record_payment_impl(
                account.id,
                RecordPaymentRequest {
                    amount_cents: 20_000,
                    method: PaymentMethod::Check,
                    reference: Some("CHK-0042".to_string()),
                    paid_at: None,
                },
                seed.teacher_id,
            )
            .await
            .unwrap();
        let storage: Arc<dyn Storage> = Arc::new(inner);
        let service = FinanceService::new_lazy();
        let req = request_as(&storage, seed.teacher_id).await;

        let first = refund_payment(&service, payment.id, &req).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let second = refund_payment(&service, payment.id, &req).await.unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let missing = refund_payment(&service, 9999, &req).await.unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
