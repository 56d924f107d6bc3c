//! 安全事件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "security_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub event_type: String,
    pub severity: String,
    pub user_id: Option<i64>,
    pub ip_address: Option<String>,
    pub request_path: Option<String>,
    pub description: String,
    pub is_resolved: bool,
    pub resolved_at: Option<i64>,
    pub resolved_by: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_security_event(self) -> crate::models::security::SecurityEvent {
        use crate::models::from_timestamp;
        use crate::models::security::{SecurityEvent, SecurityEventType, Severity};

        SecurityEvent {
            id: self.id,
            event_type: self
                .event_type
                .parse::<SecurityEventType>()
                .unwrap_or(SecurityEventType::AccessDenied),
            severity: self.severity.parse::<Severity>().unwrap_or(Severity::Low),
            user_id: self.user_id,
            ip_address: self.ip_address,
            request_path: self.request_path,
            description: self.description,
            is_resolved: self.is_resolved,
            resolved_at: self.resolved_at.map(from_timestamp),
            resolved_by: self.resolved_by,
            created_at: from_timestamp(self.created_at),
        }
    }
}
