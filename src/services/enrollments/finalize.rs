use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{EnrollmentService, evict_transcript, load_enrollment};
use crate::models::enrollments::{EnrollmentStatus, UpdateEnrollmentRequest};
use crate::models::grades::GradeSummary;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, managed_course, storage_failure};

/// 成绩汇总得出的最终状态：及格为 completed，否则为 failed
pub(crate) fn final_status(summary: &GradeSummary) -> Option<(EnrollmentStatus, f64)> {
    let score = summary.score?;
    let status = if summary.passing.unwrap_or(false) {
        EnrollmentStatus::Completed
    } else {
        EnrollmentStatus::Failed
    };
    Some((status, score))
}

pub async fn finalize_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let enrollment = match load_enrollment(&storage, enrollment_id).await {
        Ok(enrollment) => enrollment,
        Err(response) => return Ok(response),
    };

    if let Err(response) = managed_course(&storage, enrollment.course_id, &user).await {
        return Ok(response);
    }

    // 退课的选课不能出成绩，已出成绩的可以重新计算
    if enrollment.status == EnrollmentStatus::Dropped {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentNotActive,
            "Dropped enrollments cannot be finalized",
        )));
    }

    let grades = match storage.list_grades_by_enrollment(enrollment_id).await {
        Ok(grades) => grades,
        Err(e) => {
            return Ok(storage_failure(
                e,
                ErrorCode::InternalServerError,
                "Failed to load grades",
            ));
        }
    };

    let summary = GradeSummary::from_grades(&grades);
    let Some((status, score)) = final_status(&summary) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentHasNoGrades,
            "Enrollment has no weighted grades to finalize",
        )));
    };

    let update = UpdateEnrollmentRequest {
        status: Some(status),
        final_score: Some(score),
    };

    match storage.update_enrollment(enrollment_id, update).await {
        Ok(Some(updated)) => {
            info!(
                "Enrollment {} finalized with score {} ({})",
                enrollment_id, score, status
            );
            evict_transcript(request, updated.student_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                updated,
                "Enrollment finalized successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::Conflict,
            "Failed to finalize enrollment",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(score: Option<f64>, passing: Option<bool>) -> GradeSummary {
        GradeSummary {
            total_weight: 1.0,
            score,
            letter: None,
            grade_points: None,
            passing,
        }
    }

    #[test]
    fn test_final_status() {
        assert_eq!(
            final_status(&summary(Some(72.5), Some(true))),
            Some((EnrollmentStatus::Completed, 72.5))
        );
        assert_eq!(
            final_status(&summary(Some(41.0), Some(false))),
            Some((EnrollmentStatus::Failed, 41.0))
        );
        assert_eq!(final_status(&summary(None, None)), None);
    }
}
