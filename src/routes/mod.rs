pub mod attendance;
pub mod auth;
pub mod courses;
pub mod departments;
pub mod devices;
pub mod enrollments;
pub mod finance;
pub mod grades;
pub mod notifications;
pub mod schedules;
pub mod security;
pub mod semesters;
pub mod staff;
pub mod students;
pub mod system;
pub mod users;

pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use courses::configure_course_routes;
pub use departments::configure_department_routes;
pub use devices::configure_device_routes;
pub use enrollments::configure_enrollment_routes;
pub use finance::configure_finance_routes;
pub use grades::configure_grade_routes;
pub use notifications::configure_notification_routes;
pub use schedules::configure_schedule_routes;
pub use security::configure_security_routes;
pub use semesters::configure_semester_routes;
pub use staff::configure_staff_routes;
pub use students::configure_student_routes;
pub use system::configure_system_routes;
pub use users::configure_user_routes;
