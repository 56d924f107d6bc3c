/// 业务错误码，按模块分段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    RateLimitExceeded = 1006,
    InternalServerError = 1999,

    // 认证
    AuthFailed = 2000,
    RegisterFailed = 2001,
    TokenInvalid = 2002,

    // 用户
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserNameInvalid = 3002,
    UserEmailInvalid = 3003,
    UserPasswordInvalid = 3004,
    UserNameAlreadyExists = 3005,
    UserEmailAlreadyExists = 3006,
    CanNotDeleteCurrentUser = 3007,

    // 院系
    DepartmentNotFound = 4000,
    DepartmentAlreadyExists = 4001,

    // 课程
    CourseNotFound = 4100,
    CourseAlreadyExists = 4101,
    CourseFull = 4102,
    CourseInvalid = 4103,

    // 学期
    SemesterNotFound = 4200,
    SemesterAlreadyExists = 4201,
    SemesterInvalid = 4202,
    RegistrationClosed = 4203,

    // 学生档案
    StudentNotFound = 4300,
    StudentAlreadyExists = 4301,
    StudentNumberInvalid = 4302,
    StudentProfileRequired = 4303,

    // 选课
    EnrollmentNotFound = 5000,
    EnrollmentAlreadyExists = 5001,
    EnrollmentNotActive = 5002,
    EnrollmentHasNoGrades = 5003,

    // 成绩
    GradeNotFound = 5100,
    GradeInvalid = 5101,

    // 考勤
    AttendanceSessionNotFound = 6000,
    SessionNotActive = 6001,
    AttendanceWindowClosed = 6002,
    QrCodeInvalid = 6003,
    QrCodeExpired = 6004,
    LocationOutOfRange = 6005,
    AttendanceAlreadyRecorded = 6006,
    NotEnrolledInCourse = 6007,
    AttendanceSessionInvalid = 6008,
    LocationRequired = 6009,

    // 通知
    NotificationNotFound = 7000,

    // 安全事件
    SecurityEventNotFound = 7100,

    // 移动设备
    DeviceNotFound = 7200,

    // 排课
    ScheduleRequestInvalid = 8000,
    ScheduleGenerationFailed = 8001,

    // 财务
    AccountNotFound = 9000,
    AccountAlreadyExists = 9001,
    AccountNotActive = 9002,
    ChargeNotFound = 9003,
    ChargeInvalid = 9004,
    PaymentNotFound = 9005,
    PaymentInvalid = 9006,
    PaymentAlreadyRefunded = 9007,

    // 教职工
    StaffNotFound = 9100,
    StaffAlreadyExists = 9101,
    StaffInvalid = 9102,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_grouped_by_module() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::CourseFull as i32, 4102);
        assert_eq!(ErrorCode::QrCodeExpired as i32 / 1000, 6);
    }

    #[test]
    fn test_envelope_carries_numeric_code() {
        let body = crate::models::ApiResponse::error_empty(ErrorCode::CourseFull, "full");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], 4102);
        assert!(json.get("data").is_none());
    }
}
