//! 成绩实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub enrollment_id: i64,
    pub grade_type: String,
    pub title: String,
    pub points_earned: f64,
    pub points_possible: f64,
    pub weight: f64,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::enrollments::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollments::Column::Id",
        on_delete = "Cascade"
    )]
    Enrollment,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::GradedBy",
        to = "super::users::Column::Id",
        on_delete = "SetNull"
    )]
    Grader,
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_grade(self) -> crate::models::grades::Grade {
        use crate::models::from_timestamp;
        use crate::models::grades::{Grade, GradeType, scale};

        Grade {
            id: self.id,
            enrollment_id: self.enrollment_id,
            grade_type: self
                .grade_type
                .parse::<GradeType>()
                .unwrap_or(GradeType::Assignment),
            title: self.title,
            points_earned: self.points_earned,
            points_possible: self.points_possible,
            weight: self.weight,
            percentage: scale::percentage(self.points_earned, self.points_possible),
            feedback: self.feedback,
            graded_by: self.graded_by,
            created_at: from_timestamp(self.created_at),
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
