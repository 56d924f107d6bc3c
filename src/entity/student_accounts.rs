//! 学生财务账户实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub student_id: i64,
    #[sea_orm(unique)]
    pub account_number: String,
    pub status: String,
    pub credit_limit_cents: i64,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    #[sea_orm(has_many = "super::student_charges::Entity")]
    Charges,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::student_charges::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Charges.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_account(self) -> crate::models::finance::StudentAccount {
        use crate::models::finance::{AccountStatus, StudentAccount};
        use crate::models::from_timestamp;

        StudentAccount {
            id: self.id,
            student_id: self.student_id,
            account_number: self.account_number,
            status: self
                .status
                .parse::<AccountStatus>()
                .unwrap_or(AccountStatus::Hold),
            credit_limit_cents: self.credit_limit_cents,
            notes: self.notes,
            created_at: from_timestamp(self.created_at),
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
