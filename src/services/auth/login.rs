use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::middlewares::rate_limit::client_ip;
use crate::models::security::{NewSecurityEvent, SecurityEventType, Severity};
use crate::models::users::entities::UserStatus;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
};
use crate::storage::Storage;
use crate::utils::jwt;
use crate::utils::password::verify_password;

use super::AuthService;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();
    let ip = client_ip(request);
    let window_start = Utc::now() - Duration::minutes(config.security.brute_force_window_minutes);

    // 1. 同一 IP 在窗口内失败次数过多时直接拒绝
    match storage
        .count_security_events_since(SecurityEventType::LoginFailed, &ip, window_start)
        .await
    {
        Ok(failures) if failures >= config.security.brute_force_threshold => {
            warn!("Login blocked for {} after {} failures", ip, failures);
            return Ok(HttpResponse::TooManyRequests().json(ApiResponse::error_empty(
                ErrorCode::RateLimitExceeded,
                "Too many failed login attempts, please try again later",
            )));
        }
        Ok(_) => {}
        Err(e) => warn!("Failed to count login failures for {}: {}", ip, e),
    }

    // 2. 根据用户名或邮箱获取用户信息
    let user = match storage
        .get_user_by_username_or_email(&login_request.username)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            error!("Login lookup failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed",
                )),
            );
        }
    };

    // 3. 验证密码
    let user = match user {
        Some(user) if verify_password(&login_request.password, &user.password_hash) => user,
        other => {
            record_login_failure(
                &storage,
                &ip,
                other.map(|u| u.id),
                &login_request.username,
                request.path(),
                window_start,
                service.get_config().security.brute_force_threshold,
            )
            .await;
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                "Username or password is incorrect",
            )));
        }
    };

    if user.status != UserStatus::Active {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Account is not active",
        )));
    }

    // 4. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    // 5. 生成令牌对
    let refresh_days = if login_request.remember_me {
        config.jwt.refresh_token_remember_me_expiry
    } else {
        config.jwt.refresh_token_expiry
    };
    match user.generate_token_pair(Some(Duration::days(refresh_days))) {
        Ok(token_pair) => {
            info!("User {} logged in successfully", user.username);

            let refresh_cookie =
                jwt::JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, refresh_days);
            let response = LoginResponse {
                access_token: token_pair.access_token,
                expires_in: config.jwt.access_token_expiry * 60, // 转换为秒
                user,
                created_at: Utc::now(),
            };

            Ok(HttpResponse::Ok()
                .cookie(refresh_cookie)
                .json(ApiResponse::success(response, "Login successful")))
        }
        Err(e) => {
            error!("Failed to generate JWT token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            )
        }
    }
}

/// 记录登录失败，达到阈值时追加一条暴力破解事件
async fn record_login_failure(
    storage: &Arc<dyn Storage>,
    ip: &str,
    user_id: Option<i64>,
    identifier: &str,
    path: &str,
    window_start: chrono::DateTime<Utc>,
    threshold: u64,
) {
    let failure = NewSecurityEvent::new(
        SecurityEventType::LoginFailed,
        Severity::Low,
        format!("Failed login for '{identifier}'"),
    )
    .with_user(user_id)
    .with_request(Some(ip.to_string()), path);

    if let Err(e) = storage.create_security_event(failure).await {
        warn!("Failed to record login failure: {}", e);
        return;
    }

    match storage
        .count_security_events_since(SecurityEventType::LoginFailed, ip, window_start)
        .await
    {
        Ok(count) if count == threshold => {
            warn!("Brute force suspected from {} ({} failures)", ip, count);
            let event = NewSecurityEvent::new(
                SecurityEventType::BruteForce,
                Severity::High,
                format!("{count} failed logins from {ip}, last target '{identifier}'"),
            )
            .with_user(user_id)
            .with_request(Some(ip.to_string()), path);
            if let Err(e) = storage.create_security_event(event).await {
                warn!("Failed to record brute force event: {}", e);
            }
        }
        Ok(_) => {}
        Err(e) => warn!("Failed to count login failures for {}: {}", ip, e),
    }
}
