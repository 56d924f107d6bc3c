use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, own_student};
use crate::models::ApiResponse;
use crate::services::current_user;

pub async fn get_my_profile(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    match own_student(&storage, &user).await {
        Ok(student) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            student,
            "Student profile retrieved successfully",
        ))),
        Err(response) => Ok(response),
    }
}
