//! 课表条目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schedule_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub semester_id: i64,
    pub course_id: i64,
    pub teacher_id: i64,
    pub day: i32,
    pub start_minute: i32,
    pub end_minute: i32,
    pub room_type: Option<String>,
    pub room_id: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::semesters::Entity",
        from = "Column::SemesterId",
        to = "super::semesters::Column::Id",
        on_delete = "Cascade"
    )]
    Semester,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id",
        on_delete = "Cascade"
    )]
    Course,
}

impl Related<super::semesters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Semester.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_schedule_entry(self) -> crate::models::schedules::ScheduleEntry {
        use crate::models::from_timestamp;
        use crate::models::schedules::ScheduleEntry;
        use crate::scheduler::TimeSlot;

        ScheduleEntry {
            id: self.id,
            semester_id: self.semester_id,
            course_id: self.course_id,
            teacher_id: self.teacher_id,
            slot: TimeSlot::new(
                self.day as u8,
                self.start_minute as u16,
                self.end_minute as u16,
            ),
            room_type: self.room_type,
            room_id: self.room_id,
            created_at: from_timestamp(self.created_at),
        }
    }
}
