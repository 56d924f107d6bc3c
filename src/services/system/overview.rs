use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use chrono::{DateTime, Utc};

use super::SystemService;
use crate::models::system::SystemOverview;
use crate::models::{ApiResponse, AppStartTime, ErrorCode};
use crate::services::storage_failure;

/// 运行时长（秒），时钟回拨时为 0
pub(crate) fn uptime_seconds(started_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - started_at).num_seconds().max(0)
}

pub async fn get_overview(
    service: &SystemService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    let now = Utc::now();
    let started_at = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|start| start.start_datetime)
        .unwrap_or(now);

    let counts = match storage.system_counts().await {
        Ok(counts) => counts,
        Err(e) => {
            return Ok(storage_failure(
                e,
                ErrorCode::InternalServerError,
                "Failed to collect system statistics",
            ));
        }
    };

    let overview = SystemOverview {
        system_name: config.app.system_name.clone(),
        environment: config.app.environment.clone(),
        users_by_role: counts.users_by_role,
        total_students: counts.total_students,
        total_courses: counts.total_courses,
        active_enrollments: counts.active_enrollments,
        unresolved_security_events: counts.unresolved_security_events,
        started_at,
        uptime_seconds: uptime_seconds(started_at, now),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        overview,
        "System overview retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_uptime_never_negative() {
        let now = Utc::now();
        assert_eq!(uptime_seconds(now - Duration::seconds(90), now), 90);
        assert_eq!(uptime_seconds(now + Duration::seconds(5), now), 0);
    }
}
