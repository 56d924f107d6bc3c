use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::staff::{CreateStaffRequest, StaffListParams, UpdateStaffRequest};
use crate::models::users::entities::UserRole;
use crate::services::StaffService;
use crate::utils::SafeIDI64;

static STAFF_SERVICE: Lazy<StaffService> = Lazy::new(StaffService::new_lazy);

pub async fn list_staff(
    req: HttpRequest,
    query: web::Query<StaffListParams>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE.list_staff(query.into_inner(), &req).await
}

pub async fn create_staff(
    req: HttpRequest,
    body: web::Json<CreateStaffRequest>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE.create_staff(body.into_inner(), &req).await
}

pub async fn get_staff(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    STAFF_SERVICE.get_staff(path.0, &req).await
}

pub async fn update_staff(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateStaffRequest>,
) -> ActixResult<HttpResponse> {
    STAFF_SERVICE
        .update_staff(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_staff(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    STAFF_SERVICE.delete_staff(path.0, &req).await
}

pub fn configure_staff_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/staff")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_staff))
                    .route(web::post().to(create_staff)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_staff))
                    .route(web::put().to(update_staff))
                    .route(web::delete().to(delete_staff)),
            ),
    );
}
