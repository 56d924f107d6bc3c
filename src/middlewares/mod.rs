pub mod rate_limit;
pub mod require_jwt;
pub mod require_role;

pub use rate_limit::RateLimit;
pub use require_jwt::RequireJWT;
pub use require_role::RequireRole;

use actix_web::{HttpResponse, http::StatusCode, http::header::CONTENT_TYPE};
use std::sync::Arc;

use crate::models::{ApiResponse, ErrorCode, security::NewSecurityEvent};
use crate::storage::Storage;

/// 中间件统一的错误响应
pub(crate) fn create_error_response(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> HttpResponse {
    match status {
        StatusCode::NO_CONTENT => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
            .finish(),
        _ => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
            .json(ApiResponse::<()>::error_empty(code, message)),
    }
}

/// 在后台写入安全事件，不阻塞当前请求
pub(crate) fn spawn_security_event(storage: Option<Arc<dyn Storage>>, event: NewSecurityEvent) {
    let Some(storage) = storage else {
        return;
    };
    actix_web::rt::spawn(async move {
        if let Err(e) = storage.create_security_event(event).await {
            tracing::warn!("Failed to record security event: {}", e);
        }
    });
}
