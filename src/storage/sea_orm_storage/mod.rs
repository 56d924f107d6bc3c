//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod attendance;
mod courses;
mod departments;
mod devices;
mod enrollments;
mod finance;
mod grades;
mod notifications;
mod schedules;
mod security;
mod semesters;
mod staff;
mod students;
mod system;
mod users;

use crate::config::AppConfig;
use crate::errors::{UniSystemError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::with_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);
        Ok(storage)
    }

    /// 使用已有连接并运行迁移
    pub async fn with_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| UniSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| UniSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| UniSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| UniSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(UniSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    attendance::{
        AttendanceQrCode, AttendanceRecord, AttendanceSession, NewAttendanceRecord,
        NewAttendanceSession, RecordListParams, RecordListResponse, SessionListParams,
        SessionListResponse, SessionStatus,
    },
    courses::{
        Course, CourseListParams, CourseListResponse, CourseStudent, CreateCourseRequest,
        UpdateCourseRequest,
    },
    departments::{
        CreateDepartmentRequest, Department, DepartmentListParams, DepartmentListResponse,
        UpdateDepartmentRequest,
    },
    devices::{MobileDevice, RegisterDeviceRequest},
    enrollments::{
        Enrollment, EnrollmentListParams, EnrollmentListResponse, UpdateEnrollmentRequest,
    },
    finance::{
        AccountListParams, AccountListResponse, CreateAccountRequest, CreateChargeRequest,
        Payment, RecordPaymentRequest, StudentAccount, StudentCharge, UpdateAccountRequest,
    },
    grades::{CreateGradeRequest, Grade, GradeListParams, GradeListResponse, UpdateGradeRequest},
    notifications::{
        NewNotification, Notification, NotificationListParams, NotificationListResponse,
    },
    schedules::{NewScheduleEntry, ScheduleEntry, ScheduleListParams},
    security::{
        NewSecurityEvent, SecurityEvent, SecurityEventListParams, SecurityEventListResponse,
        SecurityEventType, SecuritySummary,
    },
    semesters::{
        CreateSemesterRequest, Semester, SemesterListParams, SemesterListResponse,
        UpdateSemesterRequest,
    },
    staff::{
        CreateStaffRequest, StaffListParams, StaffListResponse, StaffMember, UpdateStaffRequest,
    },
    students::{
        CreateStudentRequest, Student, StudentListParams, StudentListResponse,
        TranscriptResponse, UpdateStudentRequest,
    },
    system::SystemCounts,
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListParams},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListParams) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 院系模块
    async fn create_department(&self, req: CreateDepartmentRequest) -> Result<Department> {
        self.create_department_impl(req).await
    }

    async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>> {
        self.get_department_by_id_impl(id).await
    }

    async fn list_departments_with_pagination(
        &self,
        query: DepartmentListParams,
    ) -> Result<DepartmentListResponse> {
        self.list_departments_with_pagination_impl(query).await
    }

    async fn update_department(
        &self,
        id: i64,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>> {
        self.update_department_impl(id, update).await
    }

    async fn delete_department(&self, id: i64) -> Result<bool> {
        self.delete_department_impl(id).await
    }

    // 课程模块
    async fn create_course(&self, req: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(req).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListParams,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn update_course(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    async fn list_course_students(
        &self,
        course_id: i64,
        semester_id: Option<i64>,
    ) -> Result<Vec<CourseStudent>> {
        self.list_course_students_impl(course_id, semester_id).await
    }

    // 学期模块
    async fn create_semester(&self, req: CreateSemesterRequest) -> Result<Semester> {
        self.create_semester_impl(req).await
    }

    async fn get_semester_by_id(&self, id: i64) -> Result<Option<Semester>> {
        self.get_semester_by_id_impl(id).await
    }

    async fn list_semesters_with_pagination(
        &self,
        query: SemesterListParams,
    ) -> Result<SemesterListResponse> {
        self.list_semesters_with_pagination_impl(query).await
    }

    async fn update_semester(
        &self,
        id: i64,
        update: UpdateSemesterRequest,
    ) -> Result<Option<Semester>> {
        self.update_semester_impl(id, update).await
    }

    async fn delete_semester(&self, id: i64) -> Result<bool> {
        self.delete_semester_impl(id).await
    }

    async fn activate_semester(&self, id: i64) -> Result<Option<Semester>> {
        self.activate_semester_impl(id).await
    }

    // 学生模块
    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(req).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListParams,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    async fn get_transcript(&self, student_id: i64) -> Result<Option<TranscriptResponse>> {
        self.get_transcript_impl(student_id).await
    }

    // 选课模块
    async fn create_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
        semester_id: i64,
    ) -> Result<Enrollment> {
        self.create_enrollment_impl(student_id, course_id, semester_id)
            .await
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_id_impl(id).await
    }

    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListParams,
    ) -> Result<EnrollmentListResponse> {
        self.list_enrollments_with_pagination_impl(query).await
    }

    async fn update_enrollment(
        &self,
        id: i64,
        update: UpdateEnrollmentRequest,
    ) -> Result<Option<Enrollment>> {
        self.update_enrollment_impl(id, update).await
    }

    async fn delete_enrollment(&self, id: i64) -> Result<bool> {
        self.delete_enrollment_impl(id).await
    }

    async fn is_student_enrolled(
        &self,
        student_id: i64,
        course_id: i64,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        self.is_student_enrolled_impl(student_id, course_id, at)
            .await
    }

    async fn list_course_student_ids(&self, course_id: i64) -> Result<Vec<i64>> {
        self.list_course_student_ids_impl(course_id).await
    }

    async fn list_enrolled_students(&self, course_id: i64) -> Result<Vec<(i64, i64)>> {
        self.list_enrolled_students_impl(course_id).await
    }

    // 成绩模块
    async fn create_grade(&self, req: CreateGradeRequest, graded_by: i64) -> Result<Grade> {
        self.create_grade_impl(req, graded_by).await
    }

    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_id_impl(id).await
    }

    async fn list_grades_with_pagination(
        &self,
        query: GradeListParams,
    ) -> Result<GradeListResponse> {
        self.list_grades_with_pagination_impl(query).await
    }

    async fn list_grades_by_enrollment(&self, enrollment_id: i64) -> Result<Vec<Grade>> {
        self.list_grades_by_enrollment_impl(enrollment_id).await
    }

    async fn update_grade(
        &self,
        id: i64,
        update: UpdateGradeRequest,
        graded_by: i64,
    ) -> Result<Option<Grade>> {
        self.update_grade_impl(id, update, graded_by).await
    }

    async fn delete_grade(&self, id: i64) -> Result<bool> {
        self.delete_grade_impl(id).await
    }

    // 考勤模块
    async fn create_attendance_session(
        &self,
        session: NewAttendanceSession,
    ) -> Result<AttendanceSession> {
        self.create_attendance_session_impl(session).await
    }

    async fn get_attendance_session_by_id(&self, id: i64) -> Result<Option<AttendanceSession>> {
        self.get_attendance_session_by_id_impl(id).await
    }

    async fn list_attendance_sessions_with_pagination(
        &self,
        query: SessionListParams,
    ) -> Result<SessionListResponse> {
        self.list_attendance_sessions_with_pagination_impl(query)
            .await
    }

    async fn update_attendance_session_status(
        &self,
        id: i64,
        status: SessionStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<AttendanceSession>> {
        self.update_attendance_session_status_impl(id, status, at)
            .await
    }

    async fn end_attendance_session(
        &self,
        id: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<(AttendanceSession, u64)>> {
        self.end_attendance_session_impl(id, at).await
    }

    async fn create_qr_code(
        &self,
        session_id: i64,
        code: &str,
        expires_at: DateTime<Utc>,
        max_usage: Option<i32>,
    ) -> Result<AttendanceQrCode> {
        self.create_qr_code_impl(session_id, code, expires_at, max_usage)
            .await
    }

    async fn get_qr_code_by_code(&self, code: &str) -> Result<Option<AttendanceQrCode>> {
        self.get_qr_code_by_code_impl(code).await
    }

    async fn record_qr_check_in(
        &self,
        record: NewAttendanceRecord,
        qr_code_id: i64,
    ) -> Result<AttendanceRecord> {
        self.record_qr_check_in_impl(record, qr_code_id).await
    }

    async fn upsert_attendance_record(
        &self,
        record: NewAttendanceRecord,
    ) -> Result<AttendanceRecord> {
        self.upsert_attendance_record_impl(record).await
    }

    async fn get_attendance_record(
        &self,
        session_id: i64,
        student_id: i64,
    ) -> Result<Option<AttendanceRecord>> {
        self.get_attendance_record_impl(session_id, student_id)
            .await
    }

    async fn list_attendance_records_with_pagination(
        &self,
        session_id: i64,
        query: RecordListParams,
    ) -> Result<RecordListResponse> {
        self.list_attendance_records_with_pagination_impl(session_id, query)
            .await
    }

    async fn list_session_records(&self, session_id: i64) -> Result<Vec<AttendanceRecord>> {
        self.list_session_records_impl(session_id).await
    }

    async fn list_student_attendance_records(
        &self,
        student_id: i64,
        course_id: Option<i64>,
    ) -> Result<Vec<AttendanceRecord>> {
        self.list_student_attendance_records_impl(student_id, course_id)
            .await
    }

    // 通知模块
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification> {
        self.create_notification_impl(notification).await
    }

    async fn create_notifications_batch(
        &self,
        notifications: Vec<NewNotification>,
    ) -> Result<usize> {
        self.create_notifications_batch_impl(notifications).await
    }

    async fn get_notification_by_id(&self, id: i64) -> Result<Option<Notification>> {
        self.get_notification_by_id_impl(id).await
    }

    async fn list_user_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListParams,
    ) -> Result<NotificationListResponse> {
        self.list_user_notifications_with_pagination_impl(user_id, query)
            .await
    }

    async fn count_unread_notifications(&self, user_id: i64) -> Result<u64> {
        self.count_unread_notifications_impl(user_id).await
    }

    async fn mark_notification_read(&self, id: i64) -> Result<Option<Notification>> {
        self.mark_notification_read_impl(id).await
    }

    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64> {
        self.mark_all_notifications_read_impl(user_id).await
    }

    async fn delete_notification(&self, id: i64) -> Result<bool> {
        self.delete_notification_impl(id).await
    }

    // 安全事件模块
    async fn create_security_event(&self, event: NewSecurityEvent) -> Result<SecurityEvent> {
        self.create_security_event_impl(event).await
    }

    async fn count_security_events_since(
        &self,
        event_type: SecurityEventType,
        ip_address: &str,
        since: DateTime<Utc>,
    ) -> Result<u64> {
        self.count_security_events_since_impl(event_type, ip_address, since)
            .await
    }

    async fn list_security_events_with_pagination(
        &self,
        query: SecurityEventListParams,
    ) -> Result<SecurityEventListResponse> {
        self.list_security_events_with_pagination_impl(query).await
    }

    async fn resolve_security_event(
        &self,
        id: i64,
        resolved_by: i64,
    ) -> Result<Option<SecurityEvent>> {
        self.resolve_security_event_impl(id, resolved_by).await
    }

    async fn security_summary(&self, now: DateTime<Utc>) -> Result<SecuritySummary> {
        self.security_summary_impl(now).await
    }

    // 设备模块
    async fn upsert_device(
        &self,
        user_id: i64,
        req: RegisterDeviceRequest,
    ) -> Result<MobileDevice> {
        self.upsert_device_impl(user_id, req).await
    }

    async fn get_device_by_id(&self, id: i64) -> Result<Option<MobileDevice>> {
        self.get_device_by_id_impl(id).await
    }

    async fn list_user_devices(&self, user_id: i64) -> Result<Vec<MobileDevice>> {
        self.list_user_devices_impl(user_id).await
    }

    async fn delete_device(&self, id: i64) -> Result<bool> {
        self.delete_device_impl(id).await
    }

    // 课表模块
    async fn replace_schedule_entries(
        &self,
        semester_id: i64,
        entries: Vec<NewScheduleEntry>,
    ) -> Result<Vec<ScheduleEntry>> {
        self.replace_schedule_entries_impl(semester_id, entries)
            .await
    }

    async fn list_schedule_entries(&self, query: ScheduleListParams) -> Result<Vec<ScheduleEntry>> {
        self.list_schedule_entries_impl(query).await
    }

    // 财务模块
    async fn create_student_account(&self, req: CreateAccountRequest) -> Result<StudentAccount> {
        self.create_student_account_impl(req).await
    }

    async fn get_student_account_by_id(&self, id: i64) -> Result<Option<StudentAccount>> {
        self.get_student_account_by_id_impl(id).await
    }

    async fn get_student_account_by_student(
        &self,
        student_id: i64,
    ) -> Result<Option<StudentAccount>> {
        self.get_student_account_by_student_impl(student_id).await
    }

    async fn list_student_accounts_with_pagination(
        &self,
        query: AccountListParams,
    ) -> Result<AccountListResponse> {
        self.list_student_accounts_with_pagination_impl(query).await
    }

    async fn update_student_account(
        &self,
        id: i64,
        update: UpdateAccountRequest,
    ) -> Result<Option<StudentAccount>> {
        self.update_student_account_impl(id, update).await
    }

    async fn create_charge(
        &self,
        account_id: i64,
        req: CreateChargeRequest,
        posted_by: i64,
    ) -> Result<StudentCharge> {
        self.create_charge_impl(account_id, req, posted_by).await
    }

    async fn list_account_charges(&self, account_id: i64) -> Result<Vec<StudentCharge>> {
        self.list_account_charges_impl(account_id).await
    }

    async fn cancel_charge(&self, id: i64) -> Result<Option<StudentCharge>> {
        self.cancel_charge_impl(id).await
    }

    async fn record_payment(
        &self,
        account_id: i64,
        req: RecordPaymentRequest,
        recorded_by: i64,
    ) -> Result<Payment> {
        self.record_payment_impl(account_id, req, recorded_by).await
    }

    async fn list_account_payments(&self, account_id: i64) -> Result<Vec<Payment>> {
        self.list_account_payments_impl(account_id).await
    }

    async fn refund_payment(&self, id: i64) -> Result<Option<Payment>> {
        self.refund_payment_impl(id).await
    }

    // 教职工模块
    async fn create_staff_member(&self, req: CreateStaffRequest) -> Result<StaffMember> {
        self.create_staff_member_impl(req).await
    }

    async fn get_staff_member_by_id(&self, id: i64) -> Result<Option<StaffMember>> {
        self.get_staff_member_by_id_impl(id).await
    }

    async fn list_staff_members_with_pagination(
        &self,
        query: StaffListParams,
    ) -> Result<StaffListResponse> {
        self.list_staff_members_with_pagination_impl(query).await
    }

    async fn update_staff_member(
        &self,
        id: i64,
        update: UpdateStaffRequest,
    ) -> Result<Option<StaffMember>> {
        self.update_staff_member_impl(id, update).await
    }

    async fn delete_staff_member(&self, id: i64) -> Result<bool> {
        self.delete_staff_member_impl(id).await
    }

    // 系统模块
    async fn system_counts(&self) -> Result<SystemCounts> {
        self.system_counts_impl().await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::models::courses::CreateCourseRequest;
    use crate::models::departments::CreateDepartmentRequest;
    use crate::models::semesters::{CreateSemesterRequest, Term};
    use crate::models::students::CreateStudentRequest;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use chrono::{Duration, Utc};
    use sea_orm::{ConnectOptions, Database};

    /// 内存 SQLite，单连接保证所有查询落在同一个库上
    pub(crate) async fn test_storage() -> SeaOrmStorage {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        SeaOrmStorage::with_connection(db).await.unwrap()
    }

    pub(crate) struct Seed {
        pub teacher_id: i64,
        pub student_user_id: i64,
        pub student_id: i64,
        pub course_id: i64,
        pub semester_id: i64,
        pub department_id: i64,
    }

    fn user(username: &str, role: UserRole) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@uni.test"),
            password: "hash".to_string(),
            role,
            display_name: None,
            avatar_url: None,
        }
    }

    /// 一名教师、一名学生、一个院系、一门 3 学分课程和一个学期
    pub(crate) async fn seed_catalog(storage: &SeaOrmStorage) -> Seed {
        let teacher = storage
            .create_user_impl(user("prof", UserRole::Teacher))
            .await
            .unwrap();
        let student_user = storage
            .create_user_impl(user("alice", UserRole::Student))
            .await
            .unwrap();
        let department = storage
            .create_department_impl(CreateDepartmentRequest {
                code: "CS".to_string(),
                name: "Computer Science".to_string(),
                description: None,
                head_id: Some(teacher.id),
            })
            .await
            .unwrap();
        let course = storage
            .create_course_impl(CreateCourseRequest {
                department_id: department.id,
                code: "CS101".to_string(),
                name: "Intro to Programming".to_string(),
                description: None,
                credit_hours: 3,
                teacher_id: Some(teacher.id),
                max_students: 30,
            })
            .await
            .unwrap();
        let now = Utc::now();
        let semester = storage
            .create_semester_impl(CreateSemesterRequest {
                name: "Fall 2025".to_string(),
                term: Term::Fall,
                start_at: now,
                end_at: now + Duration::days(120),
                registration_start: now - Duration::days(7),
                registration_end: now + Duration::days(7),
            })
            .await
            .unwrap();
        let student = storage
            .create_student_impl(CreateStudentRequest {
                user_id: student_user.id,
                student_number: "S2025001".to_string(),
                department_id: department.id,
                enrollment_year: 2025,
            })
            .await
            .unwrap();

        Seed {
            teacher_id: teacher.id,
            student_user_id: student_user.id,
            student_id: student.id,
            course_id: course.id,
            semester_id: semester.id,
            department_id: department.id,
        }
    }

    /// 同院系再建一名学生，返回学生档案 id
    pub(crate) async fn add_student(storage: &SeaOrmStorage, seed: &Seed, username: &str) -> i64 {
        let account = storage
            .create_user_impl(user(username, UserRole::Student))
            .await
            .unwrap();
        storage
            .create_student_impl(CreateStudentRequest {
                user_id: account.id,
                student_number: format!("S2025-{username}"),
                department_id: seed.department_id,
                enrollment_year: 2025,
            })
            .await
            .unwrap()
            .id
    }
}

#[cfg(test)]
mod tests {
    use super::SeaOrmStorage;
    use super::test_support::{seed_catalog, test_storage};
    use crate::models::semesters::{CreateSemesterRequest, Term};
    use chrono::{Duration, Utc};

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("data/uni.db").unwrap(),
            "sqlite://data/uni.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/uni").unwrap(),
            "postgres://u:p@localhost/uni"
        );
        assert!(SeaOrmStorage::build_database_url("oracle://x").is_err());
    }

    #[tokio::test]
    async fn test_activate_semester_is_exclusive() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;
        let now = Utc::now();
        let spring = storage
            .create_semester_impl(CreateSemesterRequest {
                name: "Spring 2026".to_string(),
                term: Term::Spring,
                start_at: now + Duration::days(150),
                end_at: now + Duration::days(270),
                registration_start: now + Duration::days(130),
                registration_end: now + Duration::days(145),
            })
            .await
            .unwrap();

        storage
            .activate_semester_impl(seed.semester_id)
            .await
            .unwrap()
            .unwrap();
        let activated = storage
            .activate_semester_impl(spring.id)
            .await
            .unwrap()
            .unwrap();
        assert!(activated.is_current);

        let fall = storage
            .get_semester_by_id_impl(seed.semester_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!fall.is_current);
        assert!(storage.activate_semester_impl(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_username_is_conflict() {
        let storage = test_storage().await;
        seed_catalog(&storage).await;
        let err = storage
            .create_user_impl(crate::models::users::requests::CreateUserRequest {
                username: "alice".to_string(),
                email: "other@uni.test".to_string(),
                password: "hash".to_string(),
                role: crate::models::users::entities::UserRole::Student,
                display_name: None,
                avatar_url: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }
}
