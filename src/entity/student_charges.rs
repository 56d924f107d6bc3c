//! 学生费用实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_charges")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub account_id: i64,
    pub category: String,
    pub description: String,
    pub amount_cents: i64,
    pub discount_cents: i64,
    pub due_at: i64,
    pub semester_id: Option<i64>,
    pub status: String,
    pub posted_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student_accounts::Entity",
        from = "Column::AccountId",
        to = "super::student_accounts::Column::Id",
        on_delete = "Cascade"
    )]
    Account,
    #[sea_orm(
        belongs_to = "super::semesters::Entity",
        from = "Column::SemesterId",
        to = "super::semesters::Column::Id",
        on_delete = "SetNull"
    )]
    Semester,
}

impl Related<super::student_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_charge(self) -> crate::models::finance::StudentCharge {
        use crate::models::finance::{ChargeCategory, ChargeStatus, StudentCharge};
        use crate::models::from_timestamp;

        StudentCharge {
            id: self.id,
            account_id: self.account_id,
            category: self
                .category
                .parse::<ChargeCategory>()
                .unwrap_or(ChargeCategory::Other),
            description: self.description,
            amount_cents: self.amount_cents,
            discount_cents: self.discount_cents,
            due_at: from_timestamp(self.due_at),
            semester_id: self.semester_id,
            status: self
                .status
                .parse::<ChargeStatus>()
                .unwrap_or(ChargeStatus::Pending),
            posted_by: self.posted_by,
            created_at: from_timestamp(self.created_at),
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
