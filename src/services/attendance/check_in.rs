use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use tracing::info;

use super::{AttendanceService, load_session};
use crate::models::attendance::rules::{
    LocationCheck, QrRejection, can_take_attendance, check_location, check_qr_code,
    classify_arrival, minutes_late, points_for,
};
use crate::models::attendance::{
    AttendanceMethod, AttendanceQrCode, AttendanceSession, CheckInRequest, CheckInResponse,
    NewAttendanceRecord, SessionStatus,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::own_student;
use crate::services::{current_user, storage_failure};

/// 签到被拒绝的原因及对应的状态码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CheckInRejection {
    QrInvalid,
    QrExpired,
    QrUsedUp,
    SessionNotActive,
    WindowClosed,
    LocationRequired,
    OutOfRange,
}

impl CheckInRejection {
    fn into_response(self) -> HttpResponse {
        let (code, message) = match self {
            Self::QrInvalid => (ErrorCode::QrCodeInvalid, "QR code is not valid"),
            Self::QrExpired => (ErrorCode::QrCodeExpired, "QR code has expired"),
            Self::QrUsedUp => (ErrorCode::QrCodeInvalid, "QR code usage limit reached"),
            Self::SessionNotActive => (
                ErrorCode::SessionNotActive,
                "Attendance session is not active",
            ),
            Self::WindowClosed => (
                ErrorCode::AttendanceWindowClosed,
                "Attendance window is closed",
            ),
            Self::LocationRequired => (
                ErrorCode::LocationRequired,
                "Location is required for this session",
            ),
            Self::OutOfRange => (
                ErrorCode::LocationOutOfRange,
                "You are too far from the session location",
            ),
        };
        HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
    }
}

/// 二维码与场次两步校验
pub(crate) fn check_code_and_session(
    qr: &AttendanceQrCode,
    session: &AttendanceSession,
    now: DateTime<Utc>,
) -> Result<(), CheckInRejection> {
    check_qr_code(qr, now).map_err(|rejection| match rejection {
        QrRejection::Inactive => CheckInRejection::QrInvalid,
        QrRejection::Expired => CheckInRejection::QrExpired,
        QrRejection::UsageExhausted => CheckInRejection::QrUsedUp,
    })?;
    if session.status != SessionStatus::Active {
        return Err(CheckInRejection::SessionNotActive);
    }
    if !can_take_attendance(session, now) {
        return Err(CheckInRejection::WindowClosed);
    }
    Ok(())
}

pub(crate) fn check_position(
    session: &AttendanceSession,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<(), CheckInRejection> {
    match check_location(session, latitude, longitude) {
        LocationCheck::NotRequired | LocationCheck::Within => Ok(()),
        LocationCheck::Missing => Err(CheckInRejection::LocationRequired),
        LocationCheck::OutOfRange => Err(CheckInRejection::OutOfRange),
    }
}

pub async fn check_in(
    service: &AttendanceService,
    req: CheckInRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let now = Utc::now();

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    // 1. 二维码
    let qr = match storage.get_qr_code_by_code(req.code.trim()).await {
        Ok(Some(qr)) => qr,
        Ok(None) => return Ok(CheckInRejection::QrInvalid.into_response()),
        Err(e) => {
            return Ok(storage_failure(
                e,
                ErrorCode::InternalServerError,
                "Failed to look up QR code",
            ));
        }
    };

    // 2. 二维码有效且场次正在接受签到
    let session = match load_session(&storage, qr.session_id).await {
        Ok(session) => session,
        Err(response) => return Ok(response),
    };
    if let Err(rejection) = check_code_and_session(&qr, &session, now) {
        return Ok(rejection.into_response());
    }

    // 3. 学生档案
    let student = match own_student(&storage, &user).await {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    // 4. 在读该课程
    match storage
        .is_student_enrolled(student.id, session.course_id, session.scheduled_start)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::NotEnrolledInCourse,
                "You are not enrolled in this course",
            )));
        }
        Err(e) => {
            return Ok(storage_failure(
                e,
                ErrorCode::InternalServerError,
                "Failed to check enrollment",
            ));
        }
    }

    // 5. 定位
    if let Err(rejection) = check_position(&session, req.latitude, req.longitude) {
        return Ok(rejection.into_response());
    }

    // 6. 未重复签到
    match storage.get_attendance_record(session.id, student.id).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AttendanceAlreadyRecorded,
                "Attendance already recorded for this session",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(storage_failure(
                e,
                ErrorCode::InternalServerError,
                "Failed to check attendance record",
            ));
        }
    }

    let status = classify_arrival(&session, now);
    let record = NewAttendanceRecord {
        session_id: session.id,
        student_id: student.id,
        status,
        method: AttendanceMethod::QrCode,
        arrival_time: Some(now),
        points: points_for(status, minutes_late(&session, now)),
        notes: None,
        qr_code_id: Some(qr.id),
        recorded_by: None,
    };

    // 并发重复签到由唯一索引拒绝，二维码在事务内被占用完时按用尽处理
    match storage.record_qr_check_in(record, qr.id).await {
        Ok(record) => {
            info!(
                "Student {} checked in to session {} as {}",
                student.id, session.id, record.status
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                CheckInResponse {
                    record,
                    session_title: session.title,
                },
                "Check-in successful",
            )))
        }
        Err(e) if e.is_exhausted() => Ok(CheckInRejection::QrUsedUp.into_response()),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::AttendanceAlreadyRecorded,
            "Failed to record check-in",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::{QrCodeStatus, SessionType};
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 6, hour, minute, 0).unwrap()
    }

    fn session(status: SessionStatus) -> AttendanceSession {
        AttendanceSession {
            id: 1,
            course_id: 1,
            instructor_id: 2,
            title: "Lecture".into(),
            session_type: SessionType::Lecture,
            scheduled_start: at(9, 0),
            scheduled_end: at(10, 0),
            actual_start: Some(at(9, 0)),
            actual_end: None,
            status,
            attendance_window_minutes: 15,
            late_threshold_minutes: 10,
            latitude: Some(31.2304),
            longitude: Some(121.4737),
            radius_meters: 100,
            created_at: at(8, 0),
            updated_at: at(8, 0),
        }
    }

    fn qr(status: QrCodeStatus, expires_at: DateTime<Utc>) -> AttendanceQrCode {
        AttendanceQrCode {
            id: 1,
            session_id: 1,
            code: "ABC".into(),
            expires_at,
            max_usage: Some(2),
            usage_count: 0,
            status,
            created_at: at(9, 0),
        }
    }

    #[test]
    fn test_code_checked_before_session() {
        let expired = qr(QrCodeStatus::Active, at(9, 5));
        let closed = session(SessionStatus::Completed);
        assert_eq!(
            check_code_and_session(&expired, &closed, at(9, 10)),
            Err(CheckInRejection::QrExpired)
        );

        let fresh = qr(QrCodeStatus::Active, at(9, 30));
        assert_eq!(
            check_code_and_session(&fresh, &closed, at(9, 10)),
            Err(CheckInRejection::SessionNotActive)
        );
        assert_eq!(
            check_code_and_session(&fresh, &session(SessionStatus::Active), at(9, 10)),
            Ok(())
        );
    }

    #[test]
    fn test_window_closed_after_end_plus_window() {
        let late_qr = qr(QrCodeStatus::Active, at(11, 0));
        assert_eq!(
            check_code_and_session(&late_qr, &session(SessionStatus::Active), at(10, 16)),
            Err(CheckInRejection::WindowClosed)
        );
    }

    #[test]
    fn test_used_up_code() {
        let mut used = qr(QrCodeStatus::Active, at(9, 30));
        used.usage_count = 2;
        assert_eq!(
            check_code_and_session(&used, &session(SessionStatus::Active), at(9, 1)),
            Err(CheckInRejection::QrUsedUp)
        );
        let disabled = qr(QrCodeStatus::Used, at(9, 30));
        assert_eq!(
            check_code_and_session(&disabled, &session(SessionStatus::Active), at(9, 1)),
            Err(CheckInRejection::QrInvalid)
        );
    }

    #[test]
    fn test_position_rules() {
        let s = session(SessionStatus::Active);
        assert_eq!(
            check_position(&s, None, None),
            Err(CheckInRejection::LocationRequired)
        );
        assert_eq!(check_position(&s, Some(31.2305), Some(121.4738)), Ok(()));
        // 约 1.1 km
        assert_eq!(
            check_position(&s, Some(31.2404), Some(121.4737)),
            Err(CheckInRejection::OutOfRange)
        );

        let mut open = s.clone();
        open.latitude = None;
        open.longitude = None;
        assert_eq!(check_position(&open, None, None), Ok(()));
    }
}
