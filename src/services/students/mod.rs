pub mod create;
pub mod delete;
pub mod get;
pub mod insights;
pub mod list;
pub mod me;
pub mod transcript;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::students::{
    CreateStudentRequest, Student, StudentListParams, UpdateStudentRequest,
};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{forbidden, storage_failure};
use crate::storage::Storage;

pub const MIN_ENROLLMENT_YEAR: i32 = 1900;
pub const MAX_ENROLLMENT_YEAR: i32 = 2100;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
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

    // 当前用户的学生档案
    pub async fn get_my_profile(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        me::get_my_profile(self, request).await
    }

    pub async fn list_students(
        &self,
        query: StudentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, query, request).await
    }

    pub async fn create_student(
        &self,
        req: CreateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, req, request).await
    }

    pub async fn get_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_student(self, student_id, request).await
    }

    pub async fn update_student(
        &self,
        student_id: i64,
        update: UpdateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, student_id, update, request).await
    }

    pub async fn delete_student(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_student(self, student_id, request).await
    }

    // 成绩单（带缓存）
    pub async fn get_transcript(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        transcript::get_transcript(self, student_id, request).await
    }

    // 学业预警与选课推荐
    pub async fn get_insights(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        insights::get_insights(self, student_id, request).await
    }
}

pub(crate) fn validate_enrollment_year(year: i32) -> Result<(), String> {
    if (MIN_ENROLLMENT_YEAR..=MAX_ENROLLMENT_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(format!(
            "Enrollment year must be between {MIN_ENROLLMENT_YEAR} and {MAX_ENROLLMENT_YEAR}"
        ))
    }
}

/// 读取学生档案：教师和管理员可以查看任何人，学生只能查看自己
pub(crate) async fn visible_student(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    user: &User,
) -> Result<Student, HttpResponse> {
    match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) if user.role.is_staff() || student.user_id == user.id => Ok(student),
        Ok(Some(_)) => Err(forbidden("You can only access your own student record")),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => Err(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to get student",
        )),
    }
}

/// 当前用户的学生档案，没有时给出 403
pub(crate) async fn own_student(
    storage: &Arc<dyn Storage>,
    user: &User,
) -> Result<Student, HttpResponse> {
    match storage.get_student_by_user_id(user.id).await {
        Ok(Some(student)) => Ok(student),
        Ok(None) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::StudentProfileRequired,
            "A student profile is required",
        ))),
        Err(e) => Err(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to get student profile",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};
    use crate::storage::sea_orm_storage::test_support::{seed_catalog, test_storage};
    use actix_web::http::StatusCode;
    use chrono::Utc;

    fn user(id: i64, role: UserRole) -> User {
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@uni.edu"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            avatar_url: None,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_enrollment_year_bounds() {
        assert!(validate_enrollment_year(2024).is_ok());
        assert!(validate_enrollment_year(1899).is_err());
        assert!(validate_enrollment_year(2101).is_err());
    }

    #[tokio::test]
    async fn test_student_visibility() {
        let inner = test_storage().await;
        let seed = seed_catalog(&inner).await;
        let storage: Arc<dyn Storage> = Arc::new(inner);

        let owner = user(seed.student_user_id, UserRole::Student);
        assert!(visible_student(&storage, seed.student_id, &owner).await.is_ok());

        let teacher = user(seed.teacher_id, UserRole::Teacher);
        assert!(visible_student(&storage, seed.student_id, &teacher).await.is_ok());

        let stranger = user(seed.student_user_id + 100, UserRole::Student);
        let denied = visible_student(&storage, seed.student_id, &stranger)
            .await
            .unwrap_err();
        assert_eq!(denied.status(), StatusCode::FORBIDDEN);

        let missing = visible_student(&storage, 9999, &teacher).await.unwrap_err();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
