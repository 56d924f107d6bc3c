//! 缴费实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub account_id: i64,
    pub amount_cents: i64,
    pub method: String,
    pub status: String,
    pub reference: Option<String>,
    pub paid_at: i64,
    pub recorded_by: Option<i64>,
    pub refunded_at: Option<i64>,
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
}

impl Related<super::student_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payment(self) -> crate::models::finance::Payment {
        use crate::models::finance::{Payment, PaymentMethod, PaymentStatus};
        use crate::models::from_timestamp;

        Payment {
            id: self.id,
            account_id: self.account_id,
            amount_cents: self.amount_cents,
            method: self
                .method
                .parse::<PaymentMethod>()
                .unwrap_or(PaymentMethod::Other),
            // 无法识别的状态不计入余额
            status: self
                .status
                .parse::<PaymentStatus>()
                .unwrap_or(PaymentStatus::Refunded),
            reference: self.reference,
            paid_at: from_timestamp(self.paid_at),
            recorded_by: self.recorded_by,
            refunded_at: self.refunded_at.map(from_timestamp),
            created_at: from_timestamp(self.created_at),
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
