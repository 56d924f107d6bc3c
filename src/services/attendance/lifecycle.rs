use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::{AttendanceService, managed_session, session_not_active};
use crate::models::attendance::{EndSessionResponse, SessionStatus};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};

/// 场次状态流转：scheduled → active → completed，未结束的场次可以取消
pub(crate) fn can_transition(from: SessionStatus, to: SessionStatus) -> bool {
    matches!(
        (from, to),
        (SessionStatus::Scheduled, SessionStatus::Active)
            | (SessionStatus::Active, SessionStatus::Completed)
            | (SessionStatus::Scheduled, SessionStatus::Cancelled)
            | (SessionStatus::Active, SessionStatus::Cancelled)
    )
}

pub async fn start_session(
    service: &AttendanceService,
    session_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    transition(service, session_id, SessionStatus::Active, request).await
}

pub async fn cancel_session(
    service: &AttendanceService,
    session_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    transition(service, session_id, SessionStatus::Cancelled, request).await
}

async fn transition(
    service: &AttendanceService,
    session_id: i64,
    target: SessionStatus,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let session = match managed_session(&storage, session_id, &user).await {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };

    if !can_transition(session.status, target) {
        return Ok(session_not_active(&format!(
            "Cannot change a {} session to {}",
            session.status, target
        )));
    }

    match storage
        .update_attendance_session_status(session_id, target, Utc::now())
        .await
    {
        Ok(Some(session)) => {
            info!("Attendance session {} is now {}", session_id, target);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                session,
                format!("Attendance session {target}"),
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AttendanceSessionNotFound,
            "Attendance session not found",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to update attendance session",
        )),
    }
}

pub async fn end_session(
    service: &AttendanceService,
    session_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let session = match managed_session(&storage, session_id, &user).await {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };

    if !can_transition(session.status, SessionStatus::Completed) {
        return Ok(session_not_active("Only active sessions can be ended"));
    }

    match storage.end_attendance_session(session_id, Utc::now()).await {
        Ok(Some((session, absent_marked))) => {
            info!(
                "Attendance session {} ended, {} students marked absent",
                session_id, absent_marked
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                EndSessionResponse {
                    session,
                    absent_marked,
                },
                "Attendance session ended",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AttendanceSessionNotFound,
            "Attendance session not found",
        ))),
        Err(e) if e.is_invalid_state() => {
            Ok(session_not_active("Only active sessions can be ended"))
        }
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to end attendance session",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_transitions() {
        assert!(can_transition(SessionStatus::Scheduled, SessionStatus::Active));
        assert!(can_transition(SessionStatus::Active, SessionStatus::Completed));
        assert!(can_transition(SessionStatus::Active, SessionStatus::Cancelled));
        assert!(!can_transition(SessionStatus::Scheduled, SessionStatus::Completed));
        assert!(!can_transition(SessionStatus::Completed, SessionStatus::Active));
        assert!(!can_transition(SessionStatus::Cancelled, SessionStatus::Active));
        assert!(!can_transition(SessionStatus::Active, SessionStatus::Active));
    }
}
