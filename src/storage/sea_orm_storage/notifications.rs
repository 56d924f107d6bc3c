//! 通知存储操作

use super::SeaOrmStorage;
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::{Result, UniSystemError};
use crate::models::PaginatedResponse;
use crate::models::notifications::{
    NewNotification, Notification, NotificationListParams, NotificationListResponse,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

fn notification_model(req: NewNotification, now: i64) -> ActiveModel {
    ActiveModel {
        user_id: Set(req.user_id),
        notification_type: Set(req.notification_type.to_string()),
        priority: Set(req.priority.to_string()),
        title: Set(req.title),
        content: Set(req.content),
        reference_type: Set(req.reference_type),
        reference_id: Set(req.reference_id),
        is_read: Set(false),
        read_at: Set(None),
        created_at: Set(now),
        ..Default::default()
    }
}

impl SeaOrmStorage {
    /// 创建通知
    pub async fn create_notification_impl(&self, req: NewNotification) -> Result<Notification> {
        let result = notification_model(req, chrono::Utc::now().timestamp())
            .insert(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("创建通知失败", e))?;

        Ok(result.into_notification())
    }

    /// 批量创建通知
    pub async fn create_notifications_batch_impl(
        &self,
        reqs: Vec<NewNotification>,
    ) -> Result<usize> {
        if reqs.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now().timestamp();
        let count = reqs.len();
        Notifications::insert_many(reqs.into_iter().map(|req| notification_model(req, now)))
            .exec(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("批量创建通知失败", e))?;

        Ok(count)
    }

    /// 通过 ID 获取通知
    pub async fn get_notification_by_id_impl(&self, id: i64) -> Result<Option<Notification>> {
        let result = Notifications::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询通知失败", e))?;

        Ok(result.map(|m| m.into_notification()))
    }

    /// 分页列出用户通知，未读优先
    pub async fn list_user_notifications_with_pagination_impl(
        &self,
        user_id: i64,
        query: NotificationListParams,
    ) -> Result<NotificationListResponse> {
        let (page, size) = query.pagination.normalized();
        let mut select = Notifications::find().filter(Column::UserId.eq(user_id));

        if let Some(is_read) = query.is_read {
            select = select.filter(Column::IsRead.eq(is_read));
        }
        if let Some(notification_type) = query.notification_type {
            select = select.filter(Column::NotificationType.eq(notification_type.to_string()));
        }

        let paginator = select
            .order_by_asc(Column::IsRead)
            .order_by_desc(Column::CreatedAt)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| UniSystemError::from_db("查询通知总数失败", e))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| UniSystemError::from_db("查询通知列表失败", e))?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(|m| m.into_notification()).collect(),
            page,
            size,
            total,
        ))
    }

    /// 未读通知数量
    pub async fn count_unread_notifications_impl(&self, user_id: i64) -> Result<u64> {
        Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("统计未读通知失败", e))
    }

    /// 标记通知已读，已读的通知保持原已读时间
    pub async fn mark_notification_read_impl(&self, id: i64) -> Result<Option<Notification>> {
        let Some(existing) = Notifications::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询通知失败", e))?
        else {
            return Ok(None);
        };

        if existing.is_read {
            return Ok(Some(existing.into_notification()));
        }

        let mut model: ActiveModel = existing.into();
        model.is_read = Set(true);
        model.read_at = Set(Some(chrono::Utc::now().timestamp()));
        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("标记通知已读失败", e))?;

        Ok(Some(updated.into_notification()))
    }

    /// 标记用户全部通知已读
    pub async fn mark_all_notifications_read_impl(&self, user_id: i64) -> Result<u64> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .col_expr(Column::ReadAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("批量标记已读失败", e))?;

        Ok(result.rows_affected)
    }

    /// 删除通知
    pub async fn delete_notification_impl(&self, id: i64) -> Result<bool> {
        let result = Notifications::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("删除通知失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_catalog, test_storage};
    use crate::models::notifications::{NewNotification, NotificationPriority, NotificationType};

    fn note(user_id: i64, title: &str) -> NewNotification {
        NewNotification {
            user_id,
            notification_type: NotificationType::Announcement,
            priority: NotificationPriority::Normal,
            title: title.to_string(),
            content: None,
            reference_type: None,
            reference_id: None,
        }
    }

    #[tokio::test]
    async fn test_unread_counter_follows_reads() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;
        let user = seed.student_user_id;

        let sent = storage
            .create_notifications_batch_impl(vec![note(user, "one"), note(user, "two")])
            .await
            .unwrap();
        assert_eq!(sent, 2);
        let third = storage
            .create_notification_impl(note(user, "three"))
            .await
            .unwrap();
        assert_eq!(storage.count_unread_notifications_impl(user).await.unwrap(), 3);

        let read = storage
            .mark_notification_read_impl(third.id)
            .await
            .unwrap()
            .unwrap();
        assert!(read.is_read && read.read_at.is_some());
        assert_eq!(storage.count_unread_notifications_impl(user).await.unwrap(), 2);

        assert_eq!(
            storage.mark_all_notifications_read_impl(user).await.unwrap(),
            2
        );
        assert_eq!(storage.count_unread_notifications_impl(user).await.unwrap(), 0);
    }
}
