use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::{PaginatedResponse, PaginationQuery};
use crate::models::common::pagination::deserialize_optional_i64;

/// 院系
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub head_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepartmentListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub head_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub head_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDepartmentRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub head_id: Option<i64>,
}

pub type DepartmentListResponse = PaginatedResponse<Department>;
