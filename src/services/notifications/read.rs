use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{NotificationService, own_notification};
use crate::models::notifications::MarkAllReadResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};

pub async fn mark_read(
    service: &NotificationService,
    notification_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let notification = match own_notification(&storage, notification_id, &user).await {
        Ok(notification) => notification,
        Err(response) => return Ok(response),
    };

    // 已读的通知保持原有的 read_at
    if notification.is_read {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            notification,
            "Notification marked as read",
        )));
    }

    match storage.mark_notification_read(notification_id).await {
        Ok(Some(notification)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            notification,
            "Notification marked as read",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotificationNotFound,
            "Notification not found",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to mark notification as read",
        )),
    }
}

pub async fn mark_all_read(
    service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    match storage.mark_all_notifications_read(user.id).await {
        Ok(marked_count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MarkAllReadResponse { marked_count },
            "All notifications marked as read",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to mark notifications as read",
        )),
    }
}
