pub mod events;
pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::security::SecurityEventListParams;
use crate::storage::Storage;

pub struct SecurityService {
    storage: Option<Arc<dyn Storage>>,
}

impl SecurityService {
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

    pub async fn list_events(
        &self,
        query: SecurityEventListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        events::list_events(self, query, request).await
    }

    pub async fn resolve_event(
        &self,
        event_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        events::resolve_event(self, event_id, request).await
    }

    // 安全看板
    pub async fn get_summary(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        summary::get_summary(self, request).await
    }
}
