use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use crate::cache::keys;
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::services::get_cache;
use crate::utils::jwt::{Claims, JwtUtils};

/// 剩余有效秒数，至少 1 秒（0 会被缓存当作默认 TTL）
fn remaining_lifetime(claims: &Claims) -> u64 {
    let now = Utc::now().timestamp().max(0) as u64;
    (claims.exp as u64).saturating_sub(now).max(1)
}

/// 处理用户登出
/// 吊销当前 access token 与 cookie 中的 refresh token，并清除客户端 cookie
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    if let Some(cache) = get_cache(request) {
        if let Some(token) = RequireJWT::extract_token(request) {
            let claims = &token.claims;
            cache
                .insert_json(
                    keys::revoked_token(&claims.jti),
                    &true,
                    remaining_lifetime(claims),
                )
                .await;
            if let Some(user_id) = claims.user_id() {
                cache.remove(&keys::user(user_id)).await;
                info!("User {} logged out", user_id);
            }
        }

        if let Some(refresh) = JwtUtils::extract_refresh_token_from_cookie(request)
            && let Ok(claims) = JwtUtils::verify_refresh_token(&refresh)
        {
            cache
                .insert_json(
                    keys::revoked_token(&claims.jti),
                    &true,
                    remaining_lifetime(&claims),
                )
                .await;
        }
    }

    // max_age=0 会让浏览器删除该 cookie
    let empty_cookie = JwtUtils::create_empty_refresh_token_cookie();

    Ok(HttpResponse::Ok()
        .cookie(empty_cookie)
        .json(ApiResponse::<()>::success_empty("Logout successful")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_lifetime_never_zero() {
        let now = Utc::now().timestamp() as usize;
        let mut claims = Claims {
            sub: "1".into(),
            role: "student".into(),
            token_type: "access".into(),
            jti: "abc".into(),
            exp: now + 600,
            iat: now,
        };
        let secs = remaining_lifetime(&claims);
        assert!((598..=600).contains(&secs));

        claims.exp = now - 10;
        assert_eq!(remaining_lifetime(&claims), 1);
    }
}
