//! 移动设备实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "mobile_devices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    #[sea_orm(unique)]
    pub device_token: String,
    pub platform: String,
    pub device_name: Option<String>,
    pub app_version: Option<String>,
    pub notifications_enabled: bool,
    pub last_seen: i64,
    pub created_at: i64,
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
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_device(self) -> crate::models::devices::MobileDevice {
        use crate::models::devices::{MobileDevice, Platform};
        use crate::models::from_timestamp;

        MobileDevice {
            id: self.id,
            user_id: self.user_id,
            device_token: self.device_token,
            platform: self.platform.parse::<Platform>().unwrap_or(Platform::Web),
            device_name: self.device_name,
            app_version: self.app_version,
            notifications_enabled: self.notifications_enabled,
            last_seen: from_timestamp(self.last_seen),
            created_at: from_timestamp(self.created_at),
        }
    }
}
