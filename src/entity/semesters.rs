//! 学期实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "semesters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub term: String,
    pub start_at: i64,
    pub end_at: i64,
    pub registration_start: i64,
    pub registration_end: i64,
    pub is_current: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::schedule_entries::Entity")]
    ScheduleEntries,
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::schedule_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScheduleEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_semester(self) -> crate::models::semesters::Semester {
        use crate::models::from_timestamp;
        use crate::models::semesters::{Semester, Term};

        Semester {
            id: self.id,
            name: self.name,
            term: self.term.parse::<Term>().unwrap_or(Term::Fall),
            start_at: from_timestamp(self.start_at),
            end_at: from_timestamp(self.end_at),
            registration_start: from_timestamp(self.registration_start),
            registration_end: from_timestamp(self.registration_end),
            is_current: self.is_current,
            created_at: from_timestamp(self.created_at),
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
