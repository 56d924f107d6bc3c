pub mod activate;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::semesters::{CreateSemesterRequest, SemesterListParams, UpdateSemesterRequest};
use crate::storage::Storage;

pub struct SemesterService {
    storage: Option<Arc<dyn Storage>>,
}

impl SemesterService {
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

    pub async fn list_semesters(
        &self,
        query: SemesterListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_semesters(self, query, request).await
    }

    pub async fn create_semester(
        &self,
        req: CreateSemesterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_semester(self, req, request).await
    }

    pub async fn get_semester(
        &self,
        semester_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_semester(self, semester_id, request).await
    }

    pub async fn update_semester(
        &self,
        semester_id: i64,
        update: UpdateSemesterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_semester(self, semester_id, update, request).await
    }

    pub async fn delete_semester(
        &self,
        semester_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_semester(self, semester_id, request).await
    }

    // 设为当前学期
    pub async fn activate_semester(
        &self,
        semester_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        activate::activate_semester(self, semester_id, request).await
    }
}
