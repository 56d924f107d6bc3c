use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::devices::RegisterDeviceRequest;
use crate::services::DeviceService;
use crate::utils::SafeIDI64;

static DEVICE_SERVICE: Lazy<DeviceService> = Lazy::new(DeviceService::new_lazy);

pub async fn register_device(
    req: HttpRequest,
    body: web::Json<RegisterDeviceRequest>,
) -> ActixResult<HttpResponse> {
    DEVICE_SERVICE.register_device(body.into_inner(), &req).await
}

pub async fn list_devices(req: HttpRequest) -> ActixResult<HttpResponse> {
    DEVICE_SERVICE.list_devices(&req).await
}

pub async fn delete_device(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    DEVICE_SERVICE.delete_device(path.0, &req).await
}

pub fn configure_device_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/devices")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_devices))
            .route("", web::post().to(register_device))
            .route("/{id}", web::delete().to(delete_device)),
    );
}
