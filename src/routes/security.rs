use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::security::SecurityEventListParams;
use crate::models::users::entities::UserRole;
use crate::services::SecurityService;
use crate::utils::SafeIDI64;

static SECURITY_SERVICE: Lazy<SecurityService> = Lazy::new(SecurityService::new_lazy);

pub async fn list_events(
    req: HttpRequest,
    query: web::Query<SecurityEventListParams>,
) -> ActixResult<HttpResponse> {
    SECURITY_SERVICE.list_events(query.into_inner(), &req).await
}

pub async fn resolve_event(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    SECURITY_SERVICE.resolve_event(path.0, &req).await
}

pub async fn get_summary(req: HttpRequest) -> ActixResult<HttpResponse> {
    SECURITY_SERVICE.get_summary(&req).await
}

pub fn configure_security_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/security")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/events", web::get().to(list_events))
                    .route("/events/{id}/resolve", web::put().to(resolve_event))
                    .route("/summary", web::get().to(get_summary)),
            ),
    );
}
