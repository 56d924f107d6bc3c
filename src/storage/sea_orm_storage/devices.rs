//! 移动设备存储操作

use super::SeaOrmStorage;
use crate::entity::mobile_devices::{ActiveModel, Column, Entity as MobileDevices};
use crate::errors::{Result, UniSystemError};
use crate::models::devices::{MobileDevice, RegisterDeviceRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 按 device_token 注册，令牌已存在时转移到当前用户并刷新信息
    pub async fn upsert_device_impl(
        &self,
        user_id: i64,
        req: RegisterDeviceRequest,
    ) -> Result<MobileDevice> {
        let now = chrono::Utc::now().timestamp();
        let existing = MobileDevices::find()
            .filter(Column::DeviceToken.eq(req.device_token.as_str()))
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询设备失败", e))?;

        let saved = match existing {
            Some(existing) => {
                let mut model: ActiveModel = existing.into();
                model.user_id = Set(user_id);
                model.platform = Set(req.platform.to_string());
                model.device_name = Set(req.device_name);
                model.app_version = Set(req.app_version);
                model.notifications_enabled = Set(req.notifications_enabled);
                model.last_seen = Set(now);
                model.update(&self.db).await
            }
            None => {
                ActiveModel {
                    user_id: Set(user_id),
                    device_token: Set(req.device_token),
                    platform: Set(req.platform.to_string()),
                    device_name: Set(req.device_name),
                    app_version: Set(req.app_version),
                    notifications_enabled: Set(req.notifications_enabled),
                    last_seen: Set(now),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
            }
        }
        .map_err(|e| UniSystemError::from_db("注册设备失败", e))?;

        Ok(saved.into_device())
    }

    pub async fn get_device_by_id_impl(&self, id: i64) -> Result<Option<MobileDevice>> {
        let result = MobileDevices::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询设备失败", e))?;

        Ok(result.map(|m| m.into_device()))
    }

    pub async fn list_user_devices_impl(&self, user_id: i64) -> Result<Vec<MobileDevice>> {
        let items = MobileDevices::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::LastSeen)
            .all(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询设备列表失败", e))?;

        Ok(items.into_iter().map(|m| m.into_device()).collect())
    }

    pub async fn delete_device_impl(&self, id: i64) -> Result<bool> {
        let result = MobileDevices::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("删除设备失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_catalog, test_storage};
    use crate::models::devices::{Platform, RegisterDeviceRequest};

    fn register(token: &str, version: &str) -> RegisterDeviceRequest {
        RegisterDeviceRequest {
            device_token: token.to_string(),
            platform: Platform::Android,
            device_name: Some("Pixel".to_string()),
            app_version: Some(version.to_string()),
            notifications_enabled: true,
        }
    }

    #[tokio::test]
    async fn test_register_same_token_updates_in_place() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;

        let first = storage
            .upsert_device_impl(seed.student_user_id, register("tok-1", "1.0.0"))
            .await
            .unwrap();
        let second = storage
            .upsert_device_impl(seed.student_user_id, register("tok-1", "1.1.0"))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.app_version.as_deref(), Some("1.1.0"));

        // 换号登录后设备归属新用户
        let moved = storage
            .upsert_device_impl(seed.teacher_id, register("tok-1", "1.1.0"))
            .await
            .unwrap();
        assert_eq!(moved.user_id, seed.teacher_id);
        assert!(
            storage
                .list_user_devices_impl(seed.student_user_id)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
