//! 对象缓存层
//!
//! 后端通过 `declare_object_cache_plugin!` 在加载时注册到插件表，
//! 启动时按 `cache.type` 选择。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// ttl 为 0 时使用后端默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

impl dyn ObjectCache {
    /// 读取并反序列化，损坏的条目会被删除
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.get_raw(key).await {
            CacheResult::Found(json) => match serde_json::from_str::<T>(&json) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!("Dropping undecodable cache entry {}: {}", key, e);
                    self.remove(key).await;
                    None
                }
            },
            _ => None,
        }
    }

    pub async fn insert_json<T: Serialize + Sync>(&self, key: String, value: &T, ttl: u64) {
        if let Ok(json) = serde_json::to_string(value) {
            self.insert_raw(key, json, ttl).await;
        }
    }
}

/// 缓存键
pub mod keys {
    /// 已认证用户，用户更新或删除时清除
    pub fn user(user_id: i64) -> String {
        format!("user:{user_id}")
    }

    /// 登出后被吊销的令牌（按 jti）
    pub fn revoked_token(jti: &str) -> String {
        format!("revoked:{jti}")
    }

    pub fn transcript(student_id: i64) -> String {
        format!("transcript:{student_id}")
    }
}

/// 声明并在加载时注册一个缓存后端，后端类型需提供 `fn new() -> Result<Self, String>`
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ident) => {
        paste::paste! {
            #[ctor::ctor]
            unsafe fn [<__register_object_cache_ $ty:snake>]() {
                $crate::cache::register::register_object_cache_plugin(
                    $name,
                    std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                        Box::pin(async {
                            $ty::new()
                                .map(|cache| Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                                .map_err($crate::errors::UniSystemError::cache_connection)
                        })
                    }),
                );
            }
        }
    };
}
