use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::attendance::rules::summarize;
use crate::models::attendance::{StudentAttendanceSummary, StudentSummaryParams};
use crate::models::grades::scale::round2;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::visible_student;
use crate::services::{current_user, storage_failure};

pub async fn student_summary(
    service: &AttendanceService,
    student_id: i64,
    query: StudentSummaryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    if let Err(response) = visible_student(&storage, student_id, &user).await {
        return Ok(response);
    }

    match storage
        .list_student_attendance_records(student_id, query.course_id)
        .await
    {
        Ok(records) => {
            let stats = summarize(records.iter().map(|r| r.status));
            let total_points = round2(records.iter().map(|r| r.points).sum());
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                StudentAttendanceSummary {
                    student_id,
                    course_id: query.course_id,
                    stats,
                    total_points,
                },
                "Attendance summary retrieved successfully",
            )))
        }
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to compute attendance summary",
        )),
    }
}
