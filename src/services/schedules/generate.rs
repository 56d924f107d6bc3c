use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ScheduleService;
use crate::models::schedules::{
    GenerateScheduleRequest, GenerateScheduleResponse, NewScheduleEntry,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::scheduler::{Scheduler, WorkingHours};
use crate::services::storage_failure;

const MAX_REQUESTS: usize = 500;

pub(crate) fn check_request_count(count: usize) -> Result<(), String> {
    if count == 0 {
        return Err("At least one scheduling request is required".to_string());
    }
    if count > MAX_REQUESTS {
        return Err(format!("At most {MAX_REQUESTS} scheduling requests are allowed"));
    }
    Ok(())
}

pub async fn generate_schedule(
    service: &ScheduleService,
    req: GenerateScheduleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = check_request_count(req.requests.len()) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ScheduleRequestInvalid,
            msg,
        )));
    }

    let storage = service.get_storage(request);

    match storage.get_semester_by_id(req.semester_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SemesterNotFound,
                "Semester not found",
            )));
        }
        Err(e) => {
            return Ok(storage_failure(
                e,
                ErrorCode::InternalServerError,
                "Failed to load semester",
            ));
        }
    }

    // 工作时间来自配置，配置错误属于服务端问题
    let hours = match WorkingHours::from_config(&service.get_config().scheduler) {
        Ok(hours) => hours,
        Err(e) => {
            error!("Invalid scheduler configuration: {}", e);
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ScheduleGenerationFailed,
                "Scheduler is misconfigured",
            )));
        }
    };

    let report = Scheduler::new(&hours).schedule(req.requests);
    info!(
        "Generated schedule for semester {}: {} session(s), {} failed request(s)",
        req.semester_id,
        report.schedule.len(),
        report.failed_requests.len()
    );

    if req.persist {
        let entries: Vec<NewScheduleEntry> = report
            .schedule
            .iter()
            .map(|session| NewScheduleEntry::from_session(req.semester_id, session))
            .collect();
        if let Err(e) = storage
            .replace_schedule_entries(req.semester_id, entries)
            .await
        {
            return Ok(storage_failure(
                e,
                ErrorCode::ScheduleGenerationFailed,
                "Failed to save schedule",
            ));
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        GenerateScheduleResponse {
            semester_id: req.semester_id,
            persisted: req.persist,
            report,
        },
        "Schedule generated successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_count_bounds() {
        assert!(check_request_count(0).is_err());
        assert!(check_request_count(1).is_ok());
        assert!(check_request_count(MAX_REQUESTS).is_ok());
        assert!(check_request_count(MAX_REQUESTS + 1).is_err());
    }
}
