use std::sync::Arc;

use chrono::{DateTime, Utc};

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段已是哈希值）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListParams) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;

    /// 院系管理方法
    async fn create_department(&self, req: CreateDepartmentRequest) -> Result<Department>;
    async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>>;
    async fn list_departments_with_pagination(
        &self,
        query: DepartmentListParams,
    ) -> Result<DepartmentListResponse>;
    async fn update_department(
        &self,
        id: i64,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>>;
    async fn delete_department(&self, id: i64) -> Result<bool>;

    /// 课程管理方法
    async fn create_course(&self, req: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListParams,
    ) -> Result<CourseListResponse>;
    async fn update_course(&self, id: i64, update: UpdateCourseRequest)
    -> Result<Option<Course>>;
    async fn delete_course(&self, id: i64) -> Result<bool>;
    // 课程花名册（未退课的选课记录）
    async fn list_course_students(
        &self,
        course_id: i64,
        semester_id: Option<i64>,
    ) -> Result<Vec<CourseStudent>>;

    /// 学期管理方法
    async fn create_semester(&self, req: CreateSemesterRequest) -> Result<Semester>;
    async fn get_semester_by_id(&self, id: i64) -> Result<Option<Semester>>;
    async fn list_semesters_with_pagination(
        &self,
        query: SemesterListParams,
    ) -> Result<SemesterListResponse>;
    async fn update_semester(
        &self,
        id: i64,
        update: UpdateSemesterRequest,
    ) -> Result<Option<Semester>>;
    async fn delete_semester(&self, id: i64) -> Result<bool>;
    // 设为当前学期，其余学期取消当前标记
    async fn activate_semester(&self, id: i64) -> Result<Option<Semester>>;

    /// 学生档案管理方法
    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListParams,
    ) -> Result<StudentListResponse>;
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    async fn delete_student(&self, id: i64) -> Result<bool>;
    // 成绩单
    async fn get_transcript(&self, student_id: i64) -> Result<Option<TranscriptResponse>>;

    /// 选课管理方法
    async fn create_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
        semester_id: i64,
    ) -> Result<Enrollment>;
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListParams,
    ) -> Result<EnrollmentListResponse>;
    async fn update_enrollment(
        &self,
        id: i64,
        update: UpdateEnrollmentRequest,
    ) -> Result<Option<Enrollment>>;
    async fn delete_enrollment(&self, id: i64) -> Result<bool>;
    // 学生是否在某时间点所在学期在读该课程
    async fn is_student_enrolled(
        &self,
        student_id: i64,
        course_id: i64,
        at: DateTime<Utc>,
    ) -> Result<bool>;
    // 选过该课程的学生档案ID
    async fn list_course_student_ids(&self, course_id: i64) -> Result<Vec<i64>>;
    // 在读学生的 (学生档案ID, 用户ID)
    async fn list_enrolled_students(&self, course_id: i64) -> Result<Vec<(i64, i64)>>;

    /// 成绩管理方法
    async fn create_grade(&self, req: CreateGradeRequest, graded_by: i64) -> Result<Grade>;
    async fn get_grade_by_id(&self, id: i64) -> Result<Option<Grade>>;
    async fn list_grades_with_pagination(
        &self,
        query: GradeListParams,
    ) -> Result<GradeListResponse>;
    async fn list_grades_by_enrollment(&self, enrollment_id: i64) -> Result<Vec<Grade>>;
    async fn update_grade(
        &self,
        id: i64,
        update: UpdateGradeRequest,
        graded_by: i64,
    ) -> Result<Option<Grade>>;
    async fn delete_grade(&self, id: i64) -> Result<bool>;

    /// 考勤管理方法
    async fn create_attendance_session(
        &self,
        session: NewAttendanceSession,
    ) -> Result<AttendanceSession>;
    async fn get_attendance_session_by_id(&self, id: i64) -> Result<Option<AttendanceSession>>;
    async fn list_attendance_sessions_with_pagination(
        &self,
        query: SessionListParams,
    ) -> Result<SessionListResponse>;
    // 切换场次状态，开始时写入实际开始时间
    async fn update_attendance_session_status(
        &self,
        id: i64,
        status: SessionStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<AttendanceSession>>;
    // 结束场次并为未签到的在读学生写入缺勤，返回场次与新增缺勤数
    async fn end_attendance_session(
        &self,
        id: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<(AttendanceSession, u64)>>;
    async fn create_qr_code(
        &self,
        session_id: i64,
        code: &str,
        expires_at: DateTime<Utc>,
        max_usage: Option<i32>,
    ) -> Result<AttendanceQrCode>;
    async fn get_qr_code_by_code(&self, code: &str) -> Result<Option<AttendanceQrCode>>;
    // 扫码签到：写入记录并累加二维码使用次数
    async fn record_qr_check_in(
        &self,
        record: NewAttendanceRecord,
        qr_code_id: i64,
    ) -> Result<AttendanceRecord>;
    // 手动登记，已有记录则覆盖状态
    async fn upsert_attendance_record(&self, record: NewAttendanceRecord)
    -> Result<AttendanceRecord>;
    async fn get_attendance_record(
        &self,
        session_id: i64,
        student_id: i64,
    ) -> Result<Option<AttendanceRecord>>;
    async fn list_attendance_records_with_pagination(
        &self,
        session_id: i64,
        query: RecordListParams,
    ) -> Result<RecordListResponse>;
    async fn list_session_records(&self, session_id: i64) -> Result<Vec<AttendanceRecord>>;
    async fn list_student_attendance_records(
        &self,
        student_id: i64,
        course_id: Option<i64>,
    ) -> Result<Vec<AttendanceRecord>>;

    /// 通知管理方法
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification>;
    async fn create_notifications_batch(&self, notifications: Vec<NewNotification>)
    -> Result<usize>;
    async fn get_notification_by_id(&self, id: i64) -> Result<Option<Notification>>;
    async fn list_user_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListParams,
    ) -> Result<NotificationListResponse>;
    async fn count_unread_notifications(&self, user_id: i64) -> Result<u64>;
    async fn mark_notification_read(&self, id: i64) -> Result<Option<Notification>>;
    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64>;
    async fn delete_notification(&self, id: i64) -> Result<bool>;

    /// 安全事件方法
    async fn create_security_event(&self, event: NewSecurityEvent) -> Result<SecurityEvent>;
    // 某 IP 自 since 起某类事件数量
    async fn count_security_events_since(
        &self,
        event_type: SecurityEventType,
        ip_address: &str,
        since: DateTime<Utc>,
    ) -> Result<u64>;
    async fn list_security_events_with_pagination(
        &self,
        query: SecurityEventListParams,
    ) -> Result<SecurityEventListResponse>;
    async fn resolve_security_event(
        &self,
        id: i64,
        resolved_by: i64,
    ) -> Result<Option<SecurityEvent>>;
    async fn security_summary(&self, now: DateTime<Utc>) -> Result<SecuritySummary>;

    /// 移动设备方法
    // 按 device_token 注册或刷新
    async fn upsert_device(&self, user_id: i64, req: RegisterDeviceRequest)
    -> Result<MobileDevice>;
    async fn get_device_by_id(&self, id: i64) -> Result<Option<MobileDevice>>;
    async fn list_user_devices(&self, user_id: i64) -> Result<Vec<MobileDevice>>;
    async fn delete_device(&self, id: i64) -> Result<bool>;

    /// 课表方法
    // 用新结果替换学期课表
    async fn replace_schedule_entries(
        &self,
        semester_id: i64,
        entries: Vec<NewScheduleEntry>,
    ) -> Result<Vec<ScheduleEntry>>;
    async fn list_schedule_entries(&self, query: ScheduleListParams) -> Result<Vec<ScheduleEntry>>;

    /// 学生财务方法
    // 每个学生至多一个账户，重复创建返回 Conflict
    async fn create_student_account(&self, req: CreateAccountRequest) -> Result<StudentAccount>;
    async fn get_student_account_by_id(&self, id: i64) -> Result<Option<StudentAccount>>;
    async fn get_student_account_by_student(
        &self,
        student_id: i64,
    ) -> Result<Option<StudentAccount>>;
    async fn list_student_accounts_with_pagination(
        &self,
        query: AccountListParams,
    ) -> Result<AccountListResponse>;
    async fn update_student_account(
        &self,
        id: i64,
        update: UpdateAccountRequest,
    ) -> Result<Option<StudentAccount>>;
    // 已关闭账户返回 InvalidState
    async fn create_charge(
        &self,
        account_id: i64,
        req: CreateChargeRequest,
        posted_by: i64,
    ) -> Result<StudentCharge>;
    async fn list_account_charges(&self, account_id: i64) -> Result<Vec<StudentCharge>>;
    async fn cancel_charge(&self, id: i64) -> Result<Option<StudentCharge>>;
    async fn record_payment(
        &self,
        account_id: i64,
        req: RecordPaymentRequest,
        recorded_by: i64,
    ) -> Result<Payment>;
    async fn list_account_payments(&self, account_id: i64) -> Result<Vec<Payment>>;
    async fn refund_payment(&self, id: i64) -> Result<Option<Payment>>;

    /// 教职工方法
    async fn create_staff_member(&self, req: CreateStaffRequest) -> Result<StaffMember>;
    async fn get_staff_member_by_id(&self, id: i64) -> Result<Option<StaffMember>>;
    async fn list_staff_members_with_pagination(
        &self,
        query: StaffListParams,
    ) -> Result<StaffListResponse>;
    async fn update_staff_member(
        &self,
        id: i64,
        update: UpdateStaffRequest,
    ) -> Result<Option<StaffMember>>;
    async fn delete_staff_member(&self, id: i64) -> Result<bool>;

    /// 系统统计
    async fn system_counts(&self) -> Result<SystemCounts>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
