use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FinanceService, account_not_found, load_statement};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::services::storage_failure;
use crate::services::students::own_student;

pub async fn get_my_account(
    service: &FinanceService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let student = match own_student(&storage, &user).await {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    let account = match storage.get_student_account_by_student(student.id).await {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::finance::{
        ChargeCategory, CreateAccountRequest, CreateChargeRequest, PaymentMethod,
        RecordPaymentRequest,
    };
    use crate::services::finance::test_support::request_as;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::{seed_catalog, test_storage};
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_student_sees_own_statement() {
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
        inner
            .create_charge_impl(
                account.id,
                CreateChargeRequest {
                    category: ChargeCategory::Tuition,
                    description: "Fall tuition".to_string(),
                    amount_cents: 300_000,
                    discount_cents: 50_000,
                    due_at: Utc::now() + Duration::days(14),
                    semester_id: Some(seed.semester_id),
                },
                seed.teacher_id,
            )
            .await
            .unwrap();
        inner
            .record_payment_impl(
                account.id,
                RecordPaymentRequest {
                    amount_cents: 100_000,
                    method: PaymentMethod::OnlinePayment,
                    reference: None,
                    paid_at: None,
                },
                seed.teacher_id,
            )
            .await
            .unwrap();
        let storage: Arc<dyn Storage> = Arc::new(inner);

        let req = request_as(&storage, seed.student_user_id).await;
        let resp = get_my_account(&FinanceService::new_lazy(), &req)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value =
            serde_json::from_slice(&to_bytes(resp.into_body()).await.unwrap()).unwrap();
        assert_eq!(body["data"]["balance_cents"], 150_000);
        assert_eq!(body["data"]["charges"][0]["remaining_cents"], 150_000);
        assert_eq!(body["data"]["in_good_standing"], false);
    }

    #[actix_web::test]
    async fn test_missing_account_is_not_found() {
        let inner = test_storage().await;
        let seed = seed_catalog(&inner).await;
        let storage: Arc<dyn Storage> = Arc::new(inner);

        let req = request_as(&storage, seed.student_user_id).await;
        let resp = get_my_account(&FinanceService::new_lazy(), &req)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        // 没有学生档案的教师不能查看
        let req = request_as(&storage, seed.teacher_id).await;
        let resp = get_my_account(&FinanceService::new_lazy(), &req)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
