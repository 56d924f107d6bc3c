use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::enums::define_string_enum;

define_string_enum! {
    pub enum Platform {
        Android => "android",
        Ios => "ios",
        Web => "web",
    }
}

/// 推送设备
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobileDevice {
    pub id: i64,
    pub user_id: i64,
    pub device_token: String,
    pub platform: Platform,
    pub device_name: Option<String>,
    pub app_version: Option<String>,
    pub notifications_enabled: bool,
    pub last_seen: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterDeviceRequest {
    pub device_token: String,
    pub platform: Platform,
    pub device_name: Option<String>,
    pub app_version: Option<String>,
    #[serde(default = "default_enabled")]
    pub notifications_enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct DeviceListResponse {
    pub items: Vec<MobileDevice>,
}
