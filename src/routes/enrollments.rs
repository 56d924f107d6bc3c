use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::enrollments::{
    CreateEnrollmentRequest, EnrollmentListParams, UpdateEnrollmentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::EnrollmentService;
use crate::utils::SafeIDI64;

static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);

pub async fn list_enrollments(
    req: HttpRequest,
    query: web::Query<EnrollmentListParams>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_enrollments(query.into_inner(), &req)
        .await
}

pub async fn create_enrollment(
    req: HttpRequest,
    body: web::Json<CreateEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .create_enrollment(body.into_inner(), &req)
        .await
}

pub async fn get_enrollment(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.get_enrollment(path.0, &req).await
}

pub async fn update_enrollment(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .update_enrollment(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_enrollment(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.delete_enrollment(path.0, &req).await
}

// 退课
pub async fn drop_enrollment(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.drop_enrollment(path.0, &req).await
}

// 根据成绩计算总评
pub async fn finalize_enrollment(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.finalize_enrollment(path.0, &req).await
}

pub async fn enrollment_grades(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.enrollment_grades(path.0, &req).await
}

pub fn configure_enrollment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/enrollments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 学生只能看到自己的选课，在业务层过滤
                    .route(web::get().to(list_enrollments))
                    .route(web::post().to(create_enrollment)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_enrollment))
                    .route(
                        web::put()
                            .to(update_enrollment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_enrollment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(web::resource("/{id}/drop").route(web::post().to(drop_enrollment)))
            .service(
                web::resource("/{id}/finalize")
                    .route(web::post().to(finalize_enrollment))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(web::resource("/{id}/grades").route(web::get().to(enrollment_grades))),
    );
}
