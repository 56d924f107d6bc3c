use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DeviceService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};

fn device_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::DeviceNotFound,
        "Device not found",
    ))
}

pub async fn delete_device(
    service: &DeviceService,
    device_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    // 他人的设备按不存在处理
    match storage.get_device_by_id(device_id).await {
        Ok(Some(device)) if device.user_id == user.id => {}
        Ok(_) => return Ok(device_not_found()),
        Err(e) => {
            return Ok(storage_failure(
                e,
                ErrorCode::InternalServerError,
                "Failed to get device",
            ));
        }
    }

    match storage.delete_device(device_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
            "Device removed successfully",
        ))),
        Ok(false) => Ok(device_not_found()),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to remove device",
        )),
    }
}
