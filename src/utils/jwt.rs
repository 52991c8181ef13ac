//! Access Token 校验
//!
//! 签发由外部认证服务负责，这里只校验 HS256 签名、过期时间与 token 类型。

use crate::config::AppConfig;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN_TYPE: &str = "access";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub role: String,       // 用户角色
    pub token_type: String, // token类型，只接受 "access"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse::<i64>().ok()
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 使用全局配置校验 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::verify_access_token_with(token, &config.jwt.secret, config.jwt.leeway)
    }

    // 使用指定密钥校验 Access Token
    pub fn verify_access_token_with(
        token: &str,
        secret: &str,
        leeway: u64,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway;

        let claims = decode::<Claims>(token, &decoding_key, &validation)?.claims;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }
}

#[cfg(test)]
pub(crate) mod test_tokens {
    use super::Claims;
    use jsonwebtoken::{EncodingKey, Header, encode};

    pub const SECRET: &str = "test-secret";

    pub fn issue(user_id: i64, role: &str, token_type: &str, ttl_secs: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: token_type.to_string(),
            exp: (now + ttl_secs) as usize,
            iat: now as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_tokens::{SECRET, issue};
    use super::*;

    #[test]
    fn test_verify_access_token() {
        let token = issue(42, "teacher", "access", 600);

        let claims = JwtUtils::verify_access_token_with(&token, SECRET, 0).unwrap();

        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, "teacher");
    }

    #[test]
    fn test_reject_refresh_token() {
        let token = issue(42, "teacher", "refresh", 600);

        assert!(JwtUtils::verify_access_token_with(&token, SECRET, 0).is_err());
    }

    #[test]
    fn test_reject_expired_token() {
        let token = issue(42, "student", "access", -120);

        assert!(JwtUtils::verify_access_token_with(&token, SECRET, 0).is_err());
        // 时钟偏差容忍
        assert!(JwtUtils::verify_access_token_with(&token, SECRET, 300).is_ok());
    }

    #[test]
    fn test_reject_wrong_secret() {
        let token = issue(42, "student", "access", 600);

        assert!(JwtUtils::verify_access_token_with(&token, "other-secret", 0).is_err());
    }
}
