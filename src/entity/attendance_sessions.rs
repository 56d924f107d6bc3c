//! 考勤场次实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub instructor_id: i64,
    pub title: String,
    pub session_type: String,
    pub scheduled_start: i64,
    pub scheduled_end: i64,
    pub actual_start: Option<i64>,
    pub actual_end: Option<i64>,
    pub status: String,
    pub attendance_window_minutes: i32,
    pub late_threshold_minutes: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_meters: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id",
        on_delete = "Cascade"
    )]
    Course,
    #[sea_orm(has_many = "super::attendance_qr_codes::Entity")]
    QrCodes,
    #[sea_orm(has_many = "super::attendance_records::Entity")]
    Records,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::attendance_qr_codes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QrCodes.def()
    }
}

impl Related<super::attendance_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_session(self) -> crate::models::attendance::AttendanceSession {
        use crate::models::attendance::{AttendanceSession, SessionStatus, SessionType};
        use crate::models::from_timestamp;

        AttendanceSession {
            id: self.id,
            course_id: self.course_id,
            instructor_id: self.instructor_id,
            title: self.title,
            session_type: self
                .session_type
                .parse::<SessionType>()
                .unwrap_or(SessionType::Other),
            scheduled_start: from_timestamp(self.scheduled_start),
            scheduled_end: from_timestamp(self.scheduled_end),
            actual_start: self.actual_start.map(from_timestamp),
            actual_end: self.actual_end.map(from_timestamp),
            status: self
                .status
                .parse::<SessionStatus>()
                .unwrap_or(SessionStatus::Scheduled),
            attendance_window_minutes: self.attendance_window_minutes,
            late_threshold_minutes: self.late_threshold_minutes,
            latitude: self.latitude,
            longitude: self.longitude,
            radius_meters: self.radius_meters,
            created_at: from_timestamp(self.created_at),
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
