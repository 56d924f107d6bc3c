use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CourseService, course_student_ids, evict_course_transcripts};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn delete_course(
    service: &CourseService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 选课、成绩、考勤与课表随课程级联删除
    let students = course_student_ids(&storage, course_id).await;
    match storage.delete_course(course_id).await {
        Ok(true) => {
            evict_course_transcripts(request, &students).await;
            info!("Course {} deleted", course_id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Course deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::Conflict,
            "Failed to delete course",
        )),
    }
}
