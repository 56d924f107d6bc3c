use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AttendanceService;
use crate::models::attendance::rules::validate_session_settings;
use crate::models::attendance::{CreateSessionRequest, NewAttendanceSession};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, managed_course, storage_failure};
use crate::utils::validate::validate_name;

pub async fn create_session(
    service: &AttendanceService,
    req: CreateSessionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let defaults = &service.get_config().attendance;

    // 未指定的参数取配置默认值
    let session = NewAttendanceSession {
        course_id: req.course_id,
        instructor_id: 0,
        title: req.title.trim().to_string(),
        session_type: req.session_type,
        scheduled_start: req.scheduled_start,
        scheduled_end: req.scheduled_end,
        attendance_window_minutes: req
            .attendance_window_minutes
            .unwrap_or(defaults.default_window_minutes),
        late_threshold_minutes: req
            .late_threshold_minutes
            .unwrap_or(defaults.default_late_threshold_minutes),
        latitude: req.latitude,
        longitude: req.longitude,
        radius_meters: req.radius_meters.unwrap_or(defaults.default_radius_meters),
    };

    if let Err(msg) = validate_name(&session.title, 200) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AttendanceSessionInvalid, msg)));
    }
    if let Err(msg) = validate_session_settings(
        session.scheduled_start,
        session.scheduled_end,
        session.attendance_window_minutes,
        session.late_threshold_minutes,
        session.radius_meters,
        session.latitude,
        session.longitude,
    ) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AttendanceSessionInvalid, msg)));
    }

    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    if let Err(response) = managed_course(&storage, session.course_id, &user).await {
        return Ok(response);
    }

    let session = NewAttendanceSession {
        instructor_id: user.id,
        ..session
    };

    match storage.create_attendance_session(session).await {
        Ok(session) => {
            info!(
                "Attendance session {} created for course {}",
                session.id, session.course_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                session,
                "Attendance session created successfully",
            )))
        }
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::Conflict,
            "Failed to create attendance session",
        )),
    }
}
