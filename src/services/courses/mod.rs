pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod students;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::warn;

use crate::models::courses::{
    CourseListParams, CourseStudentsParams, CreateCourseRequest, UpdateCourseRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::enrollments::evict_transcript;
use crate::services::storage_failure;
use crate::storage::Storage;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
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

    pub async fn list_courses(
        &self,
        query: CourseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, query, request).await
    }

    pub async fn create_course(
        &self,
        req: CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, req, request).await
    }

    pub async fn get_course(&self, course_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_course(self, course_id, request).await
    }

    pub async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_course(self, course_id, update, request).await
    }

    pub async fn delete_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_course(self, course_id, request).await
    }

    // 课程花名册
    pub async fn list_course_students(
        &self,
        course_id: i64,
        query: CourseStudentsParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::list_course_students(self, course_id, query, request).await
    }
}

/// 授课人必须是教师或管理员账号
pub(crate) async fn check_teacher(
    storage: &Arc<dyn Storage>,
    teacher_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_id(teacher_id).await {
        Ok(Some(user)) if user.role.is_staff() => Ok(()),
        Ok(Some(user)) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CourseInvalid,
            format!("User {} has role {} and cannot teach a course", user.id, user.role),
        ))),
        Ok(None) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "Teacher not found",
        ))),
        Err(e) => Err(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to load teacher",
        )),
    }
}

/// 选过该课程的学生，读取失败时记录告警并返回空表
pub(crate) async fn course_student_ids(storage: &Arc<dyn Storage>, course_id: i64) -> Vec<i64> {
    match storage.list_course_student_ids(course_id).await {
        Ok(ids) => ids,
        Err(e) => {
            warn!("Failed to list students of course {}: {}", course_id, e);
            Vec::new()
        }
    }
}

/// 课程学分或名称变化后，相关学生的成绩单失效
pub(crate) async fn evict_course_transcripts(request: &HttpRequest, student_ids: &[i64]) {
    for &student_id in student_ids {
        evict_transcript(request, student_id).await;
    }
}

/// 最大人数至少为 1
pub(crate) fn validate_max_students(max_students: i32) -> Result<(), &'static str> {
    if max_students < 1 {
        return Err("Maximum students must be at least 1");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_students_positive() {
        assert!(validate_max_students(1).is_ok());
        assert!(validate_max_students(0).is_err());
        assert!(validate_max_students(-5).is_err());
    }
}
