use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradeService, load_grade};
use crate::models::ApiResponse;
use crate::services::current_user;
use crate::services::enrollments::{check_enrollment_access, load_enrollment};

pub async fn get_grade(
    service: &GradeService,
    grade_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let grade = match load_grade(&storage, grade_id).await {
        Ok(grade) => grade,
        Err(response) => return Ok(response),
    };

    let enrollment = match load_enrollment(&storage, grade.enrollment_id).await {
        Ok(enrollment) => enrollment,
        Err(response) => return Ok(response),
    };
    if let Err(response) = check_enrollment_access(&storage, &enrollment, &user).await {
        return Ok(response);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "Grade retrieved successfully")))
}
