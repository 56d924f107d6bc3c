//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod attendance_qr_codes;
pub mod attendance_records;
pub mod attendance_sessions;
pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod grades;
pub mod mobile_devices;
pub mod notifications;
pub mod payments;
pub mod schedule_entries;
pub mod security_events;
pub mod semesters;
pub mod staff_members;
pub mod student_accounts;
pub mod student_charges;
pub mod students;
pub mod users;
