use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::finance::{
    AccountListParams, CreateAccountRequest, CreateChargeRequest, RecordPaymentRequest,
    UpdateAccountRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::FinanceService;
use crate::utils::SafeIDI64;

static FINANCE_SERVICE: Lazy<FinanceService> = Lazy::new(FinanceService::new_lazy);

// 当前学生的账户与对账单
pub async fn get_my_account(req: HttpRequest) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.get_my_account(&req).await
}

pub async fn list_accounts(
    req: HttpRequest,
    query: web::Query<AccountListParams>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.list_accounts(query.into_inner(), &req).await
}

pub async fn create_account(
    req: HttpRequest,
    body: web::Json<CreateAccountRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.create_account(body.into_inner(), &req).await
}

pub async fn get_account(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.get_account(path.0, &req).await
}

pub async fn update_account(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateAccountRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE
        .update_account(path.0, body.into_inner(), &req)
        .await
}

pub async fn create_charge(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<CreateChargeRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE
        .create_charge(path.0, body.into_inner(), &req)
        .await
}

pub async fn cancel_charge(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.cancel_charge(path.0, &req).await
}

pub async fn record_payment(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<RecordPaymentRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE
        .record_payment(path.0, body.into_inner(), &req)
        .await
}

pub async fn refund_payment(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.refund_payment(path.0, &req).await
}

pub fn configure_finance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/finance")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("/me").route(web::get().to(get_my_account)))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .service(
                        web::resource("/accounts")
                            .route(web::get().to(list_accounts))
                            .route(web::post().to(create_account)),
                    )
                    .service(
                        web::resource("/accounts/{id}")
                            .route(web::get().to(get_account))
                            .route(web::put().to(update_account)),
                    )
                    .service(
                        web::resource("/accounts/{id}/charges").route(web::post().to(create_charge)),
                    )
                    .service(
                        web::resource("/accounts/{id}/payments")
                            .route(web::post().to(record_payment)),
                    )
                    .service(
                        web::resource("/charges/{id}/cancel").route(web::post().to(cancel_charge)),
                    )
                    .service(
                        web::resource("/payments/{id}/refund")
                            .route(web::post().to(refund_payment)),
                    ),
            ),
    );
}
