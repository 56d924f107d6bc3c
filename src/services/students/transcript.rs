use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::{StudentService, visible_student};
use crate::cache::keys;
use crate::models::students::TranscriptResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, get_cache, storage_failure};

pub async fn get_transcript(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    // 权限检查放在读缓存之前
    if let Err(response) = visible_student(&storage, student_id, &user).await {
        return Ok(response);
    }

    let cache = get_cache(request);
    let key = keys::transcript(student_id);

    if let Some(cache) = &cache
        && let Some(transcript) = cache.get_json::<TranscriptResponse>(&key).await
    {
        debug!("Transcript for student {} served from cache", student_id);
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            transcript,
            "Transcript retrieved successfully",
        )));
    }

    match storage.get_transcript(student_id).await {
        Ok(Some(transcript)) => {
            if let Some(cache) = &cache {
                cache.insert_json(key, &transcript, 0).await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                transcript,
                "Transcript retrieved successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to build transcript",
        )),
    }
}
