//! 随机串生成：考勤二维码令牌与初始管理员密码

use rand::Rng;
use rand::distr::Alphanumeric;

/// 二维码令牌长度
pub const QR_TOKEN_LENGTH: usize = 32;

/// 生成考勤二维码令牌，由字母和数字组成
pub fn generate_qr_token() -> String {
    random_alphanumeric(QR_TOKEN_LENGTH)
}

/// 生成满足密码策略的随机密码（至少包含大小写字母和数字）
pub fn generate_password(length: usize) -> String {
    let length = length.max(8);
    loop {
        let candidate = random_alphanumeric(length);
        let has_upper = candidate.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = candidate.chars().any(|c| c.is_ascii_lowercase());
        let has_digit = candidate.chars().any(|c| c.is_ascii_digit());
        if has_upper && has_lower && has_digit {
            return candidate;
        }
    }
}

fn random_alphanumeric(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_password;

    #[test]
    fn test_qr_token_shape() {
        let token = generate_qr_token();
        assert_eq!(token.len(), QR_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_qr_token());
    }

    #[test]
    fn test_generated_password_passes_policy() {
        for _ in 0..20 {
            assert!(validate_password(&generate_password(16)).is_valid);
        }
        assert_eq!(generate_password(4).len(), 8);
    }
}
