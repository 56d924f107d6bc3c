pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::staff::{CreateStaffRequest, StaffListParams, UpdateStaffRequest};
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::validate::{validate_code, validate_name};

pub struct StaffService {
    storage: Option<Arc<dyn Storage>>,
}

impl StaffService {
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

    pub async fn list_staff(
        &self,
        query: StaffListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_staff(self, query, request).await
    }

    pub async fn create_staff(
        &self,
        req: CreateStaffRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_staff(self, req, request).await
    }

    pub async fn get_staff(&self, staff_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_staff(self, staff_id, request).await
    }

    pub async fn update_staff(
        &self,
        staff_id: i64,
        update: UpdateStaffRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_staff(self, staff_id, update, request).await
    }

    pub async fn delete_staff(
        &self,
        staff_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_staff(self, staff_id, request).await
    }
}

/// 工号、职位与薪资的格式检查
pub(crate) fn validate_staff_fields(
    employee_number: Option<&str>,
    position: Option<&str>,
    salary_cents: Option<i64>,
) -> Result<(), String> {
    if let Some(number) = employee_number {
        validate_code(number).map_err(|msg| format!("Employee number: {msg}"))?;
    }
    if let Some(position) = position {
        validate_name(position, 100)?;
    }
    if salary_cents.is_some_and(|salary| salary < 0) {
        return Err("Salary must not be negative".to_string());
    }
    Ok(())
}

/// 职称只授予教师账号
pub(crate) fn rank_allowed(user: &User) -> bool {
    user.role == UserRole::Teacher
}

pub(crate) fn staff_invalid(msg: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::StaffInvalid, msg))
}

pub(crate) fn staff_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::StaffNotFound,
        "Staff member not found",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_field_rules() {
        assert!(validate_staff_fields(Some("E1001"), Some("Registrar"), Some(0)).is_ok());
        assert!(validate_staff_fields(None, None, None).is_ok());
        assert!(validate_staff_fields(Some("e1001"), None, None).is_err());
        assert!(validate_staff_fields(None, Some("   "), None).is_err());
        assert!(validate_staff_fields(None, None, Some(-1)).is_err());
    }
}
