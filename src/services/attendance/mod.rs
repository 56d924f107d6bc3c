pub mod check_in;
pub mod create_session;
pub mod get_session;
pub mod lifecycle;
pub mod list_sessions;
pub mod qr;
pub mod records;
pub mod stats;
pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::attendance::{
    AttendanceSession, CheckInRequest, CreateSessionRequest, GenerateQrCodeRequest,
    ManualRecordRequest, RecordListParams, SessionListParams, StudentSummaryParams,
};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{managed_course, storage_failure};
use crate::storage::Storage;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttendanceService {
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

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    pub async fn create_session(
        &self,
        req: CreateSessionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create_session::create_session(self, req, request).await
    }

    pub async fn list_sessions(
        &self,
        query: SessionListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list_sessions::list_sessions(self, query, request).await
    }

    pub async fn get_session(
        &self,
        session_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get_session::get_session(self, session_id, request).await
    }

    pub async fn start_session(
        &self,
        session_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lifecycle::start_session(self, session_id, request).await
    }

    // 结束场次并补记缺勤
    pub async fn end_session(
        &self,
        session_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lifecycle::end_session(self, session_id, request).await
    }

    pub async fn cancel_session(
        &self,
        session_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lifecycle::cancel_session(self, session_id, request).await
    }

    // 生成签到二维码
    pub async fn generate_qr_code(
        &self,
        session_id: i64,
        req: GenerateQrCodeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        qr::generate_qr_code(self, session_id, req, request).await
    }

    pub async fn list_records(
        &self,
        session_id: i64,
        query: RecordListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        records::list_records(self, session_id, query, request).await
    }

    // 教师手动登记
    pub async fn mark_record(
        &self,
        session_id: i64,
        req: ManualRecordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        records::mark_record(self, session_id, req, request).await
    }

    pub async fn session_stats(
        &self,
        session_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        stats::session_stats(self, session_id, request).await
    }

    // 学生扫码签到
    pub async fn check_in(
        &self,
        req: CheckInRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        check_in::check_in(self, req, request).await
    }

    pub async fn student_summary(
        &self,
        student_id: i64,
        query: StudentSummaryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        summary::student_summary(self, student_id, query, request).await
    }
}

pub(crate) async fn load_session(
    storage: &Arc<dyn Storage>,
    session_id: i64,
) -> Result<AttendanceSession, HttpResponse> {
    match storage.get_attendance_session_by_id(session_id).await {
        Ok(Some(session)) => Ok(session),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AttendanceSessionNotFound,
            "Attendance session not found",
        ))),
        Err(e) => Err(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to get attendance session",
        )),
    }
}

/// 场次所属课程的教师或管理员
pub(crate) async fn managed_session(
    storage: &Arc<dyn Storage>,
    session_id: i64,
    user: &User,
) -> Result<AttendanceSession, HttpResponse> {
    let session = load_session(storage, session_id).await?;
    managed_course(storage, session.course_id, user).await?;
    Ok(session)
}

pub(crate) fn session_not_active(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::SessionNotActive, message))
}
