pub mod cancel_charge;
pub mod create_account;
pub mod create_charge;
pub mod get_account;
pub mod list_accounts;
pub mod my_account;
pub mod record_payment;
pub mod refund_payment;
pub mod update_account;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use std::sync::Arc;

use crate::errors::{Result, UniSystemError};
use crate::models::finance::{
    AccountListParams, AccountStatement, CreateAccountRequest, CreateChargeRequest,
    RecordPaymentRequest, StudentAccount, UpdateAccountRequest, ledger,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;
use crate::storage::Storage;

pub struct FinanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl FinanceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_accounts(
        &self,
        query: AccountListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list_accounts::list_accounts(self, query, request).await
    }

    pub async fn create_account(
        &self,
        req: CreateAccountRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create_account::create_account(self, req, request).await
    }

    // 带对账单
    pub async fn get_account(
        &self,
        account_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get_account::get_account(self, account_id, request).await
    }

    pub async fn update_account(
        &self,
        account_id: i64,
        update: UpdateAccountRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update_account::update_account(self, account_id, update, request).await
    }

    // 学生本人的对账单
    pub async fn get_my_account(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        my_account::get_my_account(self, request).await
    }

    pub async fn create_charge(
        &self,
        account_id: i64,
        req: CreateChargeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create_charge::create_charge(self, account_id, req, request).await
    }

    pub async fn cancel_charge(
        &self,
        charge_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        cancel_charge::cancel_charge(self, charge_id, request).await
    }

    pub async fn record_payment(
        &self,
        account_id: i64,
        req: RecordPaymentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        record_payment::record_payment(self, account_id, req, request).await
    }

    pub async fn refund_payment(
        &self,
        payment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        refund_payment::refund_payment(self, payment_id, request).await
    }
}

/// 读取账户的全部费用与缴费并生成对账单
pub(crate) async fn load_statement(
    storage: &Arc<dyn Storage>,
    account: StudentAccount,
) -> Result<AccountStatement> {
    let charges = storage.list_account_charges(account.id).await?;
    let payments = storage.list_account_payments(account.id).await?;
    Ok(ledger::build_statement(account, charges, payments, Utc::now()))
}

pub(crate) fn account_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AccountNotFound,
        "Account not found",
    ))
}

/// 入账失败：账户不存在 404，账户已关闭 409
pub(crate) fn posting_failure(err: UniSystemError, action: &str) -> HttpResponse {
    match err {
        UniSystemError::NotFound(_) => account_not_found(),
        UniSystemError::InvalidState(_) => HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::AccountNotActive, "Account is closed"),
        ),
        other => storage_failure(other, ErrorCode::Conflict, action),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use actix_web::test::TestRequest;
    use actix_web::{HttpMessage, HttpRequest, web};
    use std::sync::Arc;

    use crate::storage::Storage;

    /// 带存储与登录用户的请求
    pub(crate) async fn request_as(storage: &Arc<dyn Storage>, user_id: i64) -> HttpRequest {
        let user = storage.get_user_by_id(user_id).await.unwrap().unwrap();
        let req = TestRequest::default()
            .app_data(web::Data::new(storage.clone()))
            .to_http_request();
        req.extensions_mut().insert(user);
        req
    }
}
