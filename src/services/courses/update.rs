use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{
    CourseService, check_teacher, course_student_ids, evict_course_transcripts,
    validate_max_students,
};
use crate::models::courses::{UpdateCourseRequest, validate_credit_hours};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;
use crate::utils::validate::{validate_code, validate_name};

pub async fn update_course(
    service: &CourseService,
    course_id: i64,
    update: UpdateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let invalid = |msg: String| {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::CourseInvalid, msg))
    };

    if let Some(ref code) = update.code
        && let Err(msg) = validate_code(code)
    {
        return Ok(invalid(msg.to_string()));
    }
    if let Some(ref name) = update.name
        && let Err(msg) = validate_name(name, 200)
    {
        return Ok(invalid(msg));
    }
    if let Some(credit_hours) = update.credit_hours
        && let Err(msg) = validate_credit_hours(credit_hours)
    {
        return Ok(invalid(msg));
    }
    if let Some(max_students) = update.max_students
        && let Err(msg) = validate_max_students(max_students)
    {
        return Ok(invalid(msg.to_string()));
    }

    let storage = service.get_storage(request);

    if let Some(teacher_id) = update.teacher_id
        && let Err(response) = check_teacher(&storage, teacher_id).await
    {
        return Ok(response);
    }

    match storage.update_course(course_id, update).await {
        Ok(Some(course)) => {
            let students = course_student_ids(&storage, course.id).await;
            evict_course_transcripts(request, &students).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(course, "Course updated successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::CourseAlreadyExists,
            "Failed to update course",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::cache::{ObjectCache, keys};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::{seed_catalog, test_storage};
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use actix_web::web;
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_course_update_evicts_student_transcripts() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;
        storage
            .create_enrollment_impl(seed.student_id, seed.course_id, seed.semester_id)
            .await
            .unwrap();
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_settings(100, 60));
        let key = keys::transcript(seed.student_id);
        cache.insert_json(key.clone(), &"stale transcript", 0).await;

        let req = TestRequest::default()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .to_http_request();
        let resp = update_course(
            &CourseService::new_lazy(),
            seed.course_id,
            UpdateCourseRequest {
                credit_hours: Some(4),
                ..Default::default()
            },
            &req,
        )
        .await
        .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(cache.get_json::<String>(&key).await.is_none());
    }
}
