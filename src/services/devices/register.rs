use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::DeviceService;
use crate::models::devices::RegisterDeviceRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};

const MAX_TOKEN_LEN: usize = 512;

pub(crate) fn validate_device_token(token: &str) -> Result<(), &'static str> {
    let token = token.trim();
    if token.is_empty() {
        return Err("Device token must not be empty");
    }
    if token.len() > MAX_TOKEN_LEN {
        return Err("Device token is too long");
    }
    Ok(())
}

pub async fn register_device(
    service: &DeviceService,
    req: RegisterDeviceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_device_token(&req.device_token) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    // 同一 device_token 重复注册时刷新记录并归属到当前用户
    match storage.upsert_device(user.id, req).await {
        Ok(device) => {
            let created = device.created_at == device.last_seen;
            info!(
                "Device {} registered for user {} ({})",
                device.id, user.id, device.platform
            );
            let response = ApiResponse::success(device, "Device registered successfully");
            if created {
                Ok(HttpResponse::Created().json(response))
            } else {
                Ok(HttpResponse::Ok().json(response))
            }
        }
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to register device",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_token_validation() {
        assert!(validate_device_token("fcm:abc123").is_ok());
        assert!(validate_device_token("   ").is_err());
        assert!(validate_device_token(&"x".repeat(MAX_TOKEN_LEN + 1)).is_err());
    }
}
