use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::schedules::{GenerateScheduleRequest, ScheduleListParams};
use crate::models::users::entities::UserRole;
use crate::services::ScheduleService;

static SCHEDULE_SERVICE: Lazy<ScheduleService> = Lazy::new(ScheduleService::new_lazy);

pub async fn generate_schedule(
    req: HttpRequest,
    body: web::Json<GenerateScheduleRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .generate_schedule(body.into_inner(), &req)
        .await
}

pub async fn list_entries(
    req: HttpRequest,
    query: web::Query<ScheduleListParams>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.list_entries(query.into_inner(), &req).await
}

pub fn configure_schedule_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/schedules")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_entries))
            .service(
                web::resource("/generate")
                    .route(web::post().to(generate_schedule))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            ),
    );
}
