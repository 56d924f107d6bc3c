use super::entities::User;
use crate::models::common::PaginatedResponse;
use serde::Serialize;

// 用户响应
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

pub type UserListResponse = PaginatedResponse<User>;
