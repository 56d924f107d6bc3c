//! 教职工实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "staff_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    #[sea_orm(unique)]
    pub employee_number: String,
    pub department_id: Option<i64>,
    pub position: String,
    pub employment_type: String,
    pub hire_date: String,
    pub salary_cents: i64,
    pub status: String,
    pub academic_rank: Option<String>,
    pub specialization: Option<String>,
    pub office_hours: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::departments::Entity",
        from = "Column::DepartmentId",
        to = "super::departments::Column::Id",
        on_delete = "SetNull"
    )]
    Department,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_staff(self) -> crate::models::staff::StaffMember {
        use crate::models::from_timestamp;
        use crate::models::staff::{
            AcademicRank, EmploymentType, HIRE_DATE_FORMAT, StaffMember, StaffStatus,
        };
        use chrono::NaiveDate;

        StaffMember {
            id: self.id,
            user_id: self.user_id,
            employee_number: self.employee_number,
            department_id: self.department_id,
            position: self.position,
            employment_type: self
                .employment_type
                .parse::<EmploymentType>()
                .unwrap_or(EmploymentType::FullTime),
            hire_date: NaiveDate::parse_from_str(&self.hire_date, HIRE_DATE_FORMAT)
                .unwrap_or_default(),
            salary_cents: self.salary_cents,
            status: self
                .status
                .parse::<StaffStatus>()
                .unwrap_or(StaffStatus::Active),
            academic_rank: self
                .academic_rank
                .and_then(|rank| rank.parse::<AcademicRank>().ok()),
            specialization: self.specialization,
            office_hours: self.office_hours,
            created_at: from_timestamp(self.created_at),
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
