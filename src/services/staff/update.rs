use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StaffService, rank_allowed, staff_invalid, staff_not_found, validate_staff_fields};
use crate::models::staff::UpdateStaffRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn update_staff(
    service: &StaffService,
    staff_id: i64,
    update: UpdateStaffRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_staff_fields(
        update.employee_number.as_deref(),
        update.position.as_deref(),
        update.salary_cents,
    ) {
        return Ok(staff_invalid(msg));
    }

    let storage = service.get_storage(request);

    if update.academic_rank.is_some() {
        let staff = match storage.get_staff_member_by_id(staff_id).await {
            Ok(Some(staff)) => staff,
            Ok(None) => return Ok(staff_not_found()),
            Err(e) => {
                return Ok(storage_failure(
                    e,
                    ErrorCode::InternalServerError,
                    "Failed to get staff member",
                ));
            }
        };
        match storage.get_user_by_id(staff.user_id).await {
            Ok(Some(user)) if rank_allowed(&user) => {}
            Ok(_) => {
                return Ok(staff_invalid(
                    "Academic rank is only valid for teacher accounts",
                ));
            }
            Err(e) => {
                return Ok(storage_failure(
                    e,
                    ErrorCode::InternalServerError,
                    "Failed to get user",
                ));
            }
        }
    }

    match storage.update_staff_member(staff_id, update).await {
        Ok(Some(staff)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            staff,
            "Staff member updated successfully",
        ))),
        Ok(None) => Ok(staff_not_found()),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::StaffAlreadyExists,
            "Failed to update staff member",
        )),
    }
}
