//! 签到二维码实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_qr_codes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub expires_at: i64,
    pub max_usage: Option<i32>,
    pub usage_count: i32,
    pub status: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attendance_sessions::Entity",
        from = "Column::SessionId",
        to = "super::attendance_sessions::Column::Id",
        on_delete = "Cascade"
    )]
    Session,
}

impl Related<super::attendance_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_qr_code(self) -> crate::models::attendance::AttendanceQrCode {
        use crate::models::attendance::{AttendanceQrCode, QrCodeStatus};
        use crate::models::from_timestamp;

        AttendanceQrCode {
            id: self.id,
            session_id: self.session_id,
            code: self.code,
            expires_at: from_timestamp(self.expires_at),
            max_usage: self.max_usage,
            usage_count: self.usage_count,
            status: self
                .status
                .parse::<QrCodeStatus>()
                .unwrap_or(QrCodeStatus::Disabled),
            created_at: from_timestamp(self.created_at),
        }
    }
}
