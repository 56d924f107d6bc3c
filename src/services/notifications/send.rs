use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::NotificationService;
use crate::models::notifications::{
    CreateNotificationRequest, NewNotification, SendNotificationResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, managed_course, storage_failure};
use crate::utils::validate::validate_name;

/// 通知收件人
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Audience {
    User(i64),
    Course(i64),
}

pub(crate) fn resolve_audience(
    user_id: Option<i64>,
    course_id: Option<i64>,
) -> Result<Audience, &'static str> {
    match (user_id, course_id) {
        (Some(user_id), None) => Ok(Audience::User(user_id)),
        (None, Some(course_id)) => Ok(Audience::Course(course_id)),
        _ => Err("Exactly one of user_id or course_id must be given"),
    }
}

pub async fn send_notification(
    service: &NotificationService,
    req: CreateNotificationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_name(&req.title, 200) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }
    let audience = match resolve_audience(req.user_id, req.course_id) {
        Ok(audience) => audience,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
        }
    };

    let storage = service.get_storage(request);

    let sender = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let recipients: Vec<i64> = match audience {
        Audience::User(user_id) => match storage.get_user_by_id(user_id).await {
            Ok(Some(user)) => vec![user.id],
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::UserNotFound,
                    "User not found",
                )));
            }
            Err(e) => {
                return Ok(storage_failure(
                    e,
                    ErrorCode::InternalServerError,
                    "Failed to load recipient",
                ));
            }
        },
        Audience::Course(course_id) => {
            // 教师只能通知自己课程的学生
            if let Err(response) = managed_course(&storage, course_id, &sender).await {
                return Ok(response);
            }
            match storage.list_enrolled_students(course_id).await {
                Ok(students) => students.into_iter().map(|(_, user_id)| user_id).collect(),
                Err(e) => {
                    return Ok(storage_failure(
                        e,
                        ErrorCode::InternalServerError,
                        "Failed to load course students",
                    ));
                }
            }
        }
    };

    let notifications: Vec<NewNotification> = recipients
        .into_iter()
        .map(|user_id| NewNotification {
            user_id,
            notification_type: req.notification_type,
            priority: req.priority,
            title: req.title.clone(),
            content: req.content.clone(),
            reference_type: req.reference_type.clone(),
            reference_id: req.reference_id,
        })
        .collect();

    match storage.create_notifications_batch(notifications).await {
        Ok(sent) => {
            info!("User {} sent {} notifications", sender.id, sent);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                SendNotificationResponse { sent },
                "Notifications sent successfully",
            )))
        }
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to send notifications",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_requires_exactly_one_target() {
        assert_eq!(resolve_audience(Some(3), None), Ok(Audience::User(3)));
        assert_eq!(resolve_audience(None, Some(9)), Ok(Audience::Course(9)));
        assert!(resolve_audience(None, None).is_err());
        assert!(resolve_audience(Some(3), Some(9)).is_err());
    }
}
