//! 预导入模块，方便使用

pub use super::attendance_qr_codes::{
    ActiveModel as QrCodeActiveModel, Entity as AttendanceQrCodes, Model as QrCodeModel,
};
pub use super::attendance_records::{
    ActiveModel as RecordActiveModel, Entity as AttendanceRecords, Model as RecordModel,
};
pub use super::attendance_sessions::{
    ActiveModel as SessionActiveModel, Entity as AttendanceSessions, Model as SessionModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::departments::{
    ActiveModel as DepartmentActiveModel, Entity as Departments, Model as DepartmentModel,
};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::mobile_devices::{
    ActiveModel as DeviceActiveModel, Entity as MobileDevices, Model as DeviceModel,
};
pub use super::notifications::{
    ActiveModel as NotificationActiveModel, Entity as Notifications, Model as NotificationModel,
};
pub use super::payments::{
    ActiveModel as PaymentActiveModel, Entity as Payments, Model as PaymentModel,
};
pub use super::schedule_entries::{
    ActiveModel as ScheduleEntryActiveModel, Entity as ScheduleEntries,
    Model as ScheduleEntryModel,
};
pub use super::security_events::{
    ActiveModel as SecurityEventActiveModel, Entity as SecurityEvents,
    Model as SecurityEventModel,
};
pub use super::semesters::{
    ActiveModel as SemesterActiveModel, Entity as Semesters, Model as SemesterModel,
};
pub use super::staff_members::{
    ActiveModel as StaffMemberActiveModel, Entity as StaffMembers, Model as StaffMemberModel,
};
pub use super::student_accounts::{
    ActiveModel as StudentAccountActiveModel, Entity as StudentAccounts,
    Model as StudentAccountModel,
};
pub use super::student_charges::{
    ActiveModel as StudentChargeActiveModel, Entity as StudentCharges,
    Model as StudentChargeModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
