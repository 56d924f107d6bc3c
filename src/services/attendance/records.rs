use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::{AttendanceService, managed_session, session_not_active};
use crate::models::attendance::rules::points_for;
use crate::models::attendance::{
    AttendanceMethod, AttendanceStatus, ManualRecordRequest, NewAttendanceRecord,
    RecordListParams, SessionStatus,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};

pub async fn list_records(
    service: &AttendanceService,
    session_id: i64,
    query: RecordListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    if let Err(response) = managed_session(&storage, session_id, &user).await {
        return Ok(response);
    }

    match storage
        .list_attendance_records_with_pagination(session_id, query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Attendance records retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to retrieve attendance records",
        )),
    }
}

pub async fn mark_record(
    service: &AttendanceService,
    session_id: i64,
    req: ManualRecordRequest,
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

    if session.status == SessionStatus::Cancelled {
        return Ok(session_not_active("Cannot record attendance for a cancelled session"));
    }

    match storage
        .is_student_enrolled(req.student_id, session.course_id, session.scheduled_start)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::NotEnrolledInCourse,
                "Student is not enrolled in this course",
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

    // 手动登记不计迟到分钟数
    let arrival_time = matches!(req.status, AttendanceStatus::Present | AttendanceStatus::Late)
        .then(Utc::now);
    let record = NewAttendanceRecord {
        session_id,
        student_id: req.student_id,
        status: req.status,
        method: AttendanceMethod::Manual,
        arrival_time,
        points: points_for(req.status, 0),
        notes: req.notes,
        qr_code_id: None,
        recorded_by: Some(user.id),
    };

    match storage.upsert_attendance_record(record).await {
        Ok(record) => {
            info!(
                "Attendance for student {} in session {} set to {} by {}",
                record.student_id, session_id, record.status, user.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                record,
                "Attendance recorded successfully",
            )))
        }
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::AttendanceAlreadyRecorded,
            "Failed to record attendance",
        )),
    }
}
