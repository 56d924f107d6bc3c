use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Duration, Utc};
use tracing::info;

use super::{AttendanceService, managed_session, session_not_active};
use crate::models::attendance::rules::{MAX_QR_VALIDITY_MINUTES, MIN_QR_VALIDITY_MINUTES};
use crate::models::attendance::{GenerateQrCodeRequest, SessionStatus};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};
use crate::utils::random_code::generate_qr_token;

pub(crate) fn validate_qr_request(
    validity_minutes: i64,
    max_usage: Option<i32>,
) -> Result<(), String> {
    if !(MIN_QR_VALIDITY_MINUTES..=MAX_QR_VALIDITY_MINUTES).contains(&validity_minutes) {
        return Err(format!(
            "QR validity must be between {MIN_QR_VALIDITY_MINUTES} and {MAX_QR_VALIDITY_MINUTES} minutes"
        ));
    }
    if max_usage.is_some_and(|max| max < 1) {
        return Err("Maximum usage must be at least 1".to_string());
    }
    Ok(())
}

pub async fn generate_qr_code(
    service: &AttendanceService,
    session_id: i64,
    req: GenerateQrCodeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let validity = req
        .validity_minutes
        .unwrap_or(service.get_config().attendance.qr_refresh_minutes);
    if let Err(msg) = validate_qr_request(validity, req.max_usage) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AttendanceSessionInvalid, msg)));
    }

    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let session = match managed_session(&storage, session_id, &user).await {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };

    if session.status != SessionStatus::Active {
        return Ok(session_not_active(
            "QR codes can only be generated for active sessions",
        ));
    }

    let expires_at = Utc::now() + Duration::minutes(validity);
    match storage
        .create_qr_code(session_id, &generate_qr_token(), expires_at, req.max_usage)
        .await
    {
        Ok(qr) => {
            info!("QR code {} issued for session {}", qr.id, session_id);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(qr, "QR code generated successfully")))
        }
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::Conflict,
            "Failed to generate QR code",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_request_bounds() {
        assert!(validate_qr_request(5, None).is_ok());
        assert!(validate_qr_request(1, Some(1)).is_ok());
        assert!(validate_qr_request(30, Some(200)).is_ok());
        assert!(validate_qr_request(0, None).is_err());
        assert!(validate_qr_request(31, None).is_err());
        assert!(validate_qr_request(5, Some(0)).is_err());
    }
}
