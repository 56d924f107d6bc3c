use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SecurityService;
use crate::models::security::SecurityEventListParams;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};

pub async fn list_events(
    service: &SecurityService,
    query: SecurityEventListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_security_events_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Security events retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to retrieve security events",
        )),
    }
}

pub async fn resolve_event(
    service: &SecurityService,
    event_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let admin = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    match storage.resolve_security_event(event_id, admin.id).await {
        Ok(Some(event)) => {
            info!("Security event {} resolved by user {}", event_id, admin.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                event,
                "Security event resolved successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SecurityEventNotFound,
            "Security event not found",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to resolve security event",
        )),
    }
}
