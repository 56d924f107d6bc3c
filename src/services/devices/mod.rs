pub mod delete;
pub mod list;
pub mod register;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::devices::RegisterDeviceRequest;
use crate::storage::Storage;

pub struct DeviceService {
    storage: Option<Arc<dyn Storage>>,
}

impl DeviceService {
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

    pub async fn register_device(
        &self,
        req: RegisterDeviceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        register::register_device(self, req, request).await
    }

    pub async fn list_devices(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_devices(self, request).await
    }

    pub async fn delete_device(
        &self,
        device_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_device(self, device_id, request).await
    }
}
