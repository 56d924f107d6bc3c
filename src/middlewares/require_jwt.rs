/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <JWT>` 中的访问令牌，并把当前用户放入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/courses")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_courses))
 * ```
 *
 * 处理函数中通过 `RequireJWT::extract_user_claims(&req)` 或
 * `RequireJWT::extract_user_id(&req)` 读取当前用户。
 *
 * ## 认证流程
 *
 * 1. 校验签名、过期时间与令牌类型
 * 2. 检查令牌是否已在登出时被吊销
 * 3. 按用户 ID 读取缓存，未命中时查库并要求用户状态为 active
 * 4. 无效令牌记录为 `invalid_token` 安全事件，返回 401
 */

use crate::cache::{ObjectCache, keys};
use crate::config::AppConfig;
use crate::models::security::{NewSecurityEvent, SecurityEventType, Severity};
use crate::models::users::entities::UserRole;
use crate::models::{ErrorCode, users::entities};
use crate::storage::Storage;
use crate::utils::jwt::{Claims, JwtUtils};
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::{create_error_response, rate_limit::client_ip, spawn_security_event};

#[derive(Clone)]
pub struct RequireJWT;

/// 已通过校验的访问令牌，登出时据此吊销
#[derive(Debug, Clone)]
pub struct AuthenticatedToken {
    pub raw: String,
    pub claims: Claims,
}

enum AuthFailure {
    Missing,
    Invalid(String),
    Rejected(String),
}

// 提取并验证 JWT access token，用户信息按用户 ID 缓存
async fn extract_and_validate_jwt(
    req: &ServiceRequest,
) -> Result<(entities::User, AuthenticatedToken), AuthFailure> {
    let token = JwtUtils::extract_bearer_token(req.request()).ok_or(AuthFailure::Missing)?;

    let claims = JwtUtils::verify_access_token(&token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        AuthFailure::Invalid("Invalid JWT token".to_string())
    })?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| AuthFailure::Invalid("Invalid user ID in JWT".to_string()))?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone();

    if cache
        .get_json::<bool>(&keys::revoked_token(&claims.jti))
        .await
        .is_some()
    {
        return Err(AuthFailure::Rejected("Token has been revoked".to_string()));
    }

    let token = AuthenticatedToken { raw: token, claims };

    if let Some(user) = cache.get_json::<CachedUser>(&keys::user(user_id)).await {
        return Ok((user.into_user(), token));
    }
    debug!("User {} not found in cache", user_id);

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone();

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|_| AuthFailure::Rejected("Failed to retrieve user from storage".to_string()))?
        .ok_or_else(|| AuthFailure::Rejected("User not found".to_string()))?;

    if user.status != entities::UserStatus::Active {
        return Err(AuthFailure::Rejected("User is not active".to_string()));
    }

    cache
        .insert_json(
            keys::user(user_id),
            &CachedUser::from(&user),
            AppConfig::get().cache.default_ttl,
        )
        .await;

    Ok((user, token))
}

/// `User` 序列化时会跳过密码哈希，缓存里单独保留完整字段
#[derive(serde::Serialize, serde::Deserialize)]
struct CachedUser {
    #[serde(flatten)]
    user: entities::User,
    password_hash: String,
}

impl From<&entities::User> for CachedUser {
    fn from(user: &entities::User) -> Self {
        Self {
            user: user.clone(),
            password_hash: user.password_hash.clone(),
        }
    }
}

impl CachedUser {
    fn into_user(self) -> entities::User {
        entities::User {
            password_hash: self.password_hash,
            ..self.user
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            // 验证 JWT token
            match extract_and_validate_jwt(&req).await {
                Ok((user, token)) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    req.extensions_mut().insert(token);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(failure) => {
                    let message = match failure {
                        AuthFailure::Missing => "Missing or invalid Authorization header".to_string(),
                        AuthFailure::Invalid(msg) => {
                            let storage = req
                                .app_data::<web::Data<Arc<dyn Storage>>>()
                                .map(|s| s.get_ref().clone());
                            spawn_security_event(
                                storage,
                                NewSecurityEvent::new(
                                    SecurityEventType::InvalidToken,
                                    Severity::Low,
                                    msg.clone(),
                                )
                                .with_request(Some(client_ip(req.request())), req.path()),
                            );
                            msg
                        }
                        AuthFailure::Rejected(msg) => msg,
                    };
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        message
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {message}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取用户信息
impl RequireJWT {
    /// 从请求扩展中提取当前用户
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<entities::User> {
        req.extensions().get::<entities::User>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<entities::User>().map(|user| user.id)
    }

    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<UserRole> {
        req.extensions().get::<entities::User>().map(|user| user.role)
    }

    /// 当前请求使用的访问令牌
    pub fn extract_token(req: &actix_web::HttpRequest) -> Option<AuthenticatedToken> {
        req.extensions().get::<AuthenticatedToken>().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{User, UserStatus};

    #[test]
    fn test_cached_user_keeps_password_hash() {
        let user = User {
            id: 5,
            username: "prof_x".into(),
            email: "x@uni.edu".into(),
            password_hash: "$argon2id$hash".into(),
            role: UserRole::Teacher,
            status: UserStatus::Active,
            display_name: None,
            avatar_url: None,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let json = serde_json::to_string(&CachedUser::from(&user)).unwrap();
        let restored = serde_json::from_str::<CachedUser>(&json).unwrap().into_user();
        assert_eq!(restored.password_hash, "$argon2id$hash");
        assert_eq!(restored.role, UserRole::Teacher);
    }
}
