use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{info, warn};

use super::{GradeService, grading_enrollment};
use crate::models::enrollments::{Enrollment, EnrollmentStatus};
use crate::models::grades::{CreateGradeRequest, Grade, validate_grade_values};
use crate::models::notifications::{NewNotification, NotificationPriority, NotificationType};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};
use crate::storage::Storage;
use crate::utils::validate::validate_name;

pub async fn create_grade(
    service: &GradeService,
    req: CreateGradeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_name(&req.title, 200) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::GradeInvalid, msg)));
    }
    if let Err(msg) = validate_grade_values(req.points_earned, req.points_possible, req.weight) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::GradeInvalid, msg)));
    }

    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let enrollment = match grading_enrollment(&storage, req.enrollment_id, &user).await {
        Ok(enrollment) => enrollment,
        Err(response) => return Ok(response),
    };

    if enrollment.status == EnrollmentStatus::Dropped {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentNotActive,
            "Cannot grade a dropped enrollment",
        )));
    }

    match storage.create_grade(req, user.id).await {
        Ok(grade) => {
            info!(
                "Grade {} recorded for enrollment {} by user {}",
                grade.id, grade.enrollment_id, user.id
            );
            notify_student(&storage, &enrollment, &grade).await;
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(grade, "Grade created successfully")))
        }
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::Conflict,
            "Failed to create grade",
        )),
    }
}

/// 通知写入失败不影响成绩录入
async fn notify_student(storage: &Arc<dyn Storage>, enrollment: &Enrollment, grade: &Grade) {
    let student = match storage.get_student_by_id(enrollment.student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return,
        Err(e) => {
            warn!("Failed to load student for grade notification: {}", e);
            return;
        }
    };

    let notification = NewNotification {
        user_id: student.user_id,
        notification_type: NotificationType::Grade,
        priority: NotificationPriority::Normal,
        title: format!("New grade: {}", grade.title),
        content: Some(format!(
            "{} / {} ({:.2}%)",
            grade.points_earned, grade.points_possible, grade.percentage
        )),
        reference_type: Some("grade".to_string()),
        reference_id: Some(grade.id),
    };

    if let Err(e) = storage.create_notification(notification).await {
        warn!("Failed to send grade notification: {}", e);
    }
}
