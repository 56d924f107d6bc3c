pub mod create;
pub mod delete;
pub mod finalize;
pub mod get;
pub mod grades;
pub mod list;
pub mod update;
pub mod withdraw;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::keys;
use crate::models::enrollments::{
    CreateEnrollmentRequest, Enrollment, EnrollmentListParams, UpdateEnrollmentRequest,
};
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::own_student;
use crate::services::{forbidden, get_cache, managed_course, storage_failure};
use crate::storage::Storage;

pub struct EnrollmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl EnrollmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_enrollments(
        &self,
        query: EnrollmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_enrollments(self, query, request).await
    }

    pub async fn create_enrollment(
        &self,
        req: CreateEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_enrollment(self, req, request).await
    }

    pub async fn get_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_enrollment(self, enrollment_id, request).await
    }

    pub async fn update_enrollment(
        &self,
        enrollment_id: i64,
        update: UpdateEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_enrollment(self, enrollment_id, update, request).await
    }

    pub async fn delete_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_enrollment(self, enrollment_id, request).await
    }

    // 退课
    pub async fn drop_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        withdraw::drop_enrollment(self, enrollment_id, request).await
    }

    // 根据成绩项计算最终成绩
    pub async fn finalize_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        finalize::finalize_enrollment(self, enrollment_id, request).await
    }

    pub async fn enrollment_grades(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grades::enrollment_grades(self, enrollment_id, request).await
    }
}

pub(crate) async fn load_enrollment(
    storage: &Arc<dyn Storage>,
    enrollment_id: i64,
) -> Result<Enrollment, HttpResponse> {
    match storage.get_enrollment_by_id(enrollment_id).await {
        Ok(Some(enrollment)) => Ok(enrollment),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found",
        ))),
        Err(e) => Err(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to get enrollment",
        )),
    }
}

/// 学生只能访问自己的选课，教师只能访问自己课程的选课
pub(crate) async fn check_enrollment_access(
    storage: &Arc<dyn Storage>,
    enrollment: &Enrollment,
    user: &User,
) -> Result<(), HttpResponse> {
    match user.role {
        UserRole::Admin => Ok(()),
        UserRole::Teacher => managed_course(storage, enrollment.course_id, user)
            .await
            .map(|_| ()),
        UserRole::Student => {
            let student = own_student(storage, user).await?;
            if student.id == enrollment.student_id {
                Ok(())
            } else {
                Err(forbidden("You can only access your own enrollments"))
            }
        }
    }
}

pub(crate) fn course_full() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(ErrorCode::CourseFull, "Course is full"))
}

/// 最终成绩或状态变化后成绩单失效
pub(crate) async fn evict_transcript(request: &HttpRequest, student_id: i64) {
    if let Some(cache) = get_cache(request) {
        cache.remove(&keys::transcript(student_id)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_course_full_is_conflict() {
        assert_eq!(course_full().status(), StatusCode::CONFLICT);
    }
}
