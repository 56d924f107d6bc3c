use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, visible_student};
use crate::models::ApiResponse;
use crate::services::current_user;

pub async fn get_student(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    match visible_student(&storage, student_id, &user).await {
        Ok(student) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(student, "Student retrieved successfully"))),
        Err(response) => Ok(response),
    }
}
