use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{StaffService, rank_allowed, staff_invalid, validate_staff_fields};
use crate::models::staff::CreateStaffRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn create_staff(
    service: &StaffService,
    req: CreateStaffRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_staff_fields(
        Some(&req.employee_number),
        Some(&req.position),
        Some(req.salary_cents),
    ) {
        return Ok(staff_invalid(msg));
    }

    let storage = service.get_storage(request);

    let user = match storage.get_user_by_id(req.user_id).await {
        Ok(Some(user)) => user,
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
                "Failed to get user",
            ));
        }
    };
    if req.academic_rank.is_some() && !rank_allowed(&user) {
        return Ok(staff_invalid("Academic rank is only valid for teacher accounts"));
    }

    match storage.create_staff_member(req).await {
        Ok(staff) => {
            info!("Staff member {} created for user {}", staff.employee_number, user.username);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                staff,
                "Staff member created successfully",
            )))
        }
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::StaffAlreadyExists,
            "Failed to create staff member",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::staff::{AcademicRank, EmploymentType};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::{seed_catalog, test_storage};
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use actix_web::web;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn request(user_id: i64, number: &str, rank: Option<AcademicRank>) -> CreateStaffRequest {
        CreateStaffRequest {
            user_id,
            employee_number: number.to_string(),
            department_id: None,
            position: "Advisor".to_string(),
            employment_type: EmploymentType::PartTime,
            hire_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            salary_cents: 300_000,
            academic_rank: rank,
            specialization: None,
            office_hours: None,
        }
    }

    #[actix_web::test]
    async fn test_rank_requires_teacher_account() {
        let inner = test_storage().await;
        let seed = seed_catalog(&inner).await;
        let storage: Arc<dyn Storage> = Arc::new(inner);
        let req = TestRequest::default()
            .app_data(web::Data::new(storage.clone()))
            .to_http_request();
        let service = StaffService::new_lazy();

        let resp = create_staff(
            &service,
            request(seed.student_user_id, "E2001", Some(AcademicRank::Professor)),
            &req,
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = create_staff(
            &service,
            request(seed.teacher_id, "E2001", Some(AcademicRank::Professor)),
            &req,
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        // 工号唯一
        let resp = create_staff(&service, request(seed.student_user_id, "E2001", None), &req)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = create_staff(&service, request(9999, "E2002", None), &req)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
