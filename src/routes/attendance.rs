use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::attendance::{
    CheckInRequest, CreateSessionRequest, GenerateQrCodeRequest, ManualRecordRequest,
    RecordListParams, SessionListParams, StudentSummaryParams,
};
use crate::models::users::entities::UserRole;
use crate::services::AttendanceService;
use crate::utils::SafeIDI64;

static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn create_session(
    req: HttpRequest,
    body: web::Json<CreateSessionRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .create_session(body.into_inner(), &req)
        .await
}

pub async fn list_sessions(
    req: HttpRequest,
    query: web::Query<SessionListParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_sessions(query.into_inner(), &req)
        .await
}

pub async fn get_session(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.get_session(path.0, &req).await
}

pub async fn start_session(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.start_session(path.0, &req).await
}

// 结束考勤，未签到的学生记为缺勤
pub async fn end_session(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.end_session(path.0, &req).await
}

pub async fn cancel_session(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.cancel_session(path.0, &req).await
}

pub async fn generate_qr_code(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<GenerateQrCodeRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .generate_qr_code(path.0, body.into_inner(), &req)
        .await
}

pub async fn list_records(
    req: HttpRequest,
    path: SafeIDI64,
    query: web::Query<RecordListParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_records(path.0, query.into_inner(), &req)
        .await
}

// 教师手动登记
pub async fn mark_record(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<ManualRecordRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .mark_record(path.0, body.into_inner(), &req)
        .await
}

pub async fn session_stats(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.session_stats(path.0, &req).await
}

// 学生扫码签到
pub async fn check_in(
    req: HttpRequest,
    body: web::Json<CheckInRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.check_in(body.into_inner(), &req).await
}

pub async fn student_summary(
    req: HttpRequest,
    path: SafeIDI64,
    query: web::Query<StudentSummaryParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .student_summary(path.0, query.into_inner(), &req)
        .await
}

pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/check-in")
                    .wrap(RateLimit::check_in())
                    .route(web::post().to(check_in)),
            )
            .service(
                web::resource("/students/{id}/summary")
                    // 学生本人、教师、管理员，在业务层检查
                    .route(web::get().to(student_summary)),
            )
            .service(
                web::resource("/sessions")
                    .route(web::get().to(list_sessions))
                    .route(
                        web::post()
                            .to(create_session)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(web::resource("/sessions/{id}").route(web::get().to(get_session)))
            .service(
                web::scope("/sessions/{id}")
                    // 教师只能管理自己课程的考勤，在业务层检查
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("/start", web::post().to(start_session))
                    .route("/end", web::post().to(end_session))
                    .route("/cancel", web::post().to(cancel_session))
                    .route("/qr", web::post().to(generate_qr_code))
                    .route("/records", web::get().to(list_records))
                    .route("/records", web::post().to(mark_record))
                    .route("/stats", web::get().to(session_stats)),
            ),
    );
}
