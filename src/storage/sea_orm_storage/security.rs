//! 安全事件存储操作

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use super::SeaOrmStorage;
use crate::entity::security_events::{ActiveModel, Column, Entity as SecurityEvents};
use crate::errors::{Result, UniSystemError};
use crate::models::PaginatedResponse;
use crate::models::security::{
    NewSecurityEvent, SecurityEvent, SecurityEventListParams, SecurityEventListResponse,
    SecurityEventType, SecuritySummary,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    pub async fn create_security_event_impl(&self, event: NewSecurityEvent) -> Result<SecurityEvent> {
        let model = ActiveModel {
            event_type: Set(event.event_type.to_string()),
            severity: Set(event.severity.to_string()),
            user_id: Set(event.user_id),
            ip_address: Set(event.ip_address),
            request_path: Set(event.request_path),
            description: Set(event.description),
            is_resolved: Set(false),
            resolved_at: Set(None),
            resolved_by: Set(None),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("写入安全事件失败", e))?;

        Ok(result.into_security_event())
    }

    pub async fn count_security_events_since_impl(
        &self,
        event_type: SecurityEventType,
        ip_address: &str,
        since: DateTime<Utc>,
    ) -> Result<u64> {
        SecurityEvents::find()
            .filter(Column::EventType.eq(event_type.to_string()))
            .filter(Column::IpAddress.eq(ip_address))
            .filter(Column::CreatedAt.gte(since.timestamp()))
            .count(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("统计安全事件失败", e))
    }

    pub async fn list_security_events_with_pagination_impl(
        &self,
        query: SecurityEventListParams,
    ) -> Result<SecurityEventListResponse> {
        let (page, size) = query.pagination.normalized();
        let mut select = SecurityEvents::find();

        if let Some(event_type) = query.event_type {
            select = select.filter(Column::EventType.eq(event_type.to_string()));
        }
        if let Some(severity) = query.severity {
            select = select.filter(Column::Severity.eq(severity.to_string()));
        }
        if let Some(is_resolved) = query.is_resolved {
            select = select.filter(Column::IsResolved.eq(is_resolved));
        }
        if let Some(user_id) = query.user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }
        if let Some(ref ip) = query.ip_address {
            select = select.filter(Column::IpAddress.eq(ip.as_str()));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| UniSystemError::from_db("查询安全事件总数失败", e))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| UniSystemError::from_db("查询安全事件列表失败", e))?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(|m| m.into_security_event()).collect(),
            page,
            size,
            total,
        ))
    }

    pub async fn resolve_security_event_impl(
        &self,
        id: i64,
        resolved_by: i64,
    ) -> Result<Option<SecurityEvent>> {
        let Some(existing) = SecurityEvents::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询安全事件失败", e))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.is_resolved = Set(true);
        model.resolved_at = Set(Some(Utc::now().timestamp()));
        model.resolved_by = Set(Some(resolved_by));
        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("处理安全事件失败", e))?;

        Ok(Some(updated.into_security_event()))
    }

    /// 安全面板汇总：总数、未处理数、近 24 小时数，以及按级别和类型分组
    pub async fn security_summary_impl(&self, now: DateTime<Utc>) -> Result<SecuritySummary> {
        let total_events = SecurityEvents::find()
            .count(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("统计安全事件失败", e))?;
        let unresolved_events = SecurityEvents::find()
            .filter(Column::IsResolved.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("统计未处理安全事件失败", e))?;
        let events_last_24h = SecurityEvents::find()
            .filter(Column::CreatedAt.gte((now - Duration::hours(24)).timestamp()))
            .count(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("统计近期安全事件失败", e))?;

        let by_severity = self.count_security_events_by(Column::Severity).await?;
        let by_type = self.count_security_events_by(Column::EventType).await?;

        Ok(SecuritySummary {
            total_events,
            unresolved_events,
            events_last_24h,
            by_severity,
            by_type,
        })
    }

    async fn count_security_events_by(&self, column: Column) -> Result<BTreeMap<String, u64>> {
        let rows: Vec<(String, i64)> = SecurityEvents::find()
            .select_only()
            .column(column)
            .column_as(Column::Id.count(), "count")
            .group_by(column)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("分组统计安全事件失败", e))?;

        Ok(rows
            .into_iter()
            .map(|(key, count)| (key, count.max(0) as u64))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::super::test_support::test_storage;
    use crate::models::security::{NewSecurityEvent, SecurityEventType, Severity};

    #[tokio::test]
    async fn test_failed_login_window_and_summary() {
        let storage = test_storage().await;
        for _ in 0..3 {
            storage
                .create_security_event_impl(
                    NewSecurityEvent::new(
                        SecurityEventType::LoginFailed,
                        Severity::Medium,
                        "bad password".to_string(),
                    )
                    .with_request(Some("10.0.0.7".to_string()), "/api/v1/auth/login"),
                )
                .await
                .unwrap();
        }
        let other = storage
            .create_security_event_impl(NewSecurityEvent::new(
                SecurityEventType::AccessDenied,
                Severity::Low,
                "admin route".to_string(),
            ))
            .await
            .unwrap();

        let since = Utc::now() - Duration::minutes(15);
        assert_eq!(
            storage
                .count_security_events_since_impl(SecurityEventType::LoginFailed, "10.0.0.7", since)
                .await
                .unwrap(),
            3
        );
        assert_eq!(
            storage
                .count_security_events_since_impl(SecurityEventType::LoginFailed, "10.0.0.8", since)
                .await
                .unwrap(),
            0
        );

        storage.resolve_security_event_impl(other.id, 1).await.unwrap();
        let summary = storage.security_summary_impl(Utc::now()).await.unwrap();
        assert_eq!(summary.total_events, 4);
        assert_eq!(summary.unresolved_events, 3);
        assert_eq!(summary.events_last_24h, 4);
        assert_eq!(summary.by_type.get("login_failed"), Some(&3));
        assert_eq!(summary.by_severity.get("low"), Some(&1));
    }
}
