use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{FinanceService, posting_failure};
use crate::models::finance::{CreateChargeRequest, ledger};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::validate::validate_name;

pub async fn create_charge(
    service: &FinanceService,
    account_id: i64,
    req: CreateChargeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_name(&req.description, 200) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }
    if let Err(msg) = ledger::validate_charge_amounts(req.amount_cents, req.discount_cents) {
        return Ok(
            HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::ChargeInvalid, msg))
        );
    }

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    match storage.create_charge(account_id, req, user.id).await {
        Ok(charge) => {
            info!(
                "Charge {} of {} cents posted to account {}",
                charge.id,
                charge.net_cents(),
                account_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                charge,
                "Charge created successfully",
            )))
        }
        Err(e) => Ok(posting_failure(e, "Failed to create charge")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::finance::{
        AccountStatus, ChargeCategory, CreateAccountRequest, UpdateAccountRequest,
    };
    use crate::services::finance::test_support::request_as;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::{seed_catalog, test_storage};
    use actix_web::http::StatusCode;
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    fn lab_fee(amount_cents: i64, discount_cents: i64) -> CreateChargeRequest {
        CreateChargeRequest {
            category: ChargeCategory::Laboratory,
            description: "Chemistry lab".to_string(),
            amount_cents,
            discount_cents,
            due_at: Utc::now() + Duration::days(30),
            semester_id: None,
        }
    }

    #[actix_web::test]
    async fn test_charge_validation_and_closed_account() {
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
        let storage: Arc<dyn Storage> = Arc::new(inner);
        let service = FinanceService::new_lazy();
        let req = request_as(&storage, seed.teacher_id).await;

        let resp = create_charge(&service, account.id, lab_fee(5_000, 6_000), &req)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = create_charge(&service, account.id, lab_fee(5_000, 1_000), &req)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = create_charge(&service, 9999, lab_fee(5_000, 0), &req)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        storage
            .update_student_account(
                account.id,
                UpdateAccountRequest {
                    status: Some(AccountStatus::Closed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let resp = create_charge(&service, account.id, lab_fee(5_000, 0), &req)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(
            storage.list_account_charges(account.id).await.unwrap().len(),
            1
        );
    }
}
