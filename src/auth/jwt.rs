//! JWT token management
//!
//! Provides JWT token generation and validation

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode,
    errors::ErrorKind,
};
use std::sync::Arc;

use crate::auth::types::{AuthConfig, JWT_AUDIENCE, JWT_ISSUER, JwtClaims};
use crate::error::{LedgerError, Result};

/// JWT token manager
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: Arc<AuthConfig>,
}

impl JwtManager {
    /// Create new JWT manager
    #[must_use]
    pub fn new(config: Arc<AuthConfig>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[JWT_ISSUER]);
        validation.set_audience(&[JWT_AUDIENCE]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 30;

        Self {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Generate access token
    pub fn generate_access_token(
        &self,
        user_id: i32,
        username: String,
        is_admin: bool,
    ) -> Result<String> {
        let claims = JwtClaims::new(user_id, username, is_admin, self.config.jwt_expires_in);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| LedgerError::internal_with_source("Token generation failed", e))
    }

    /// Validate and parse token
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims> {
        let token_data: TokenData<JwtClaims> = decode(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => LedgerError::auth("认证令牌已过期"),
                _ => LedgerError::auth_with_source("认证令牌无效", e),
            })?;

        let claims = token_data.claims;
        if claims.is_expired() {
            return Err(LedgerError::auth("认证令牌已过期"));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_manager(secret: &str, expires_in: i64) -> JwtManager {
        JwtManager::new(Arc::new(AuthConfig {
            jwt_secret: secret.to_string(),
            jwt_expires_in: expires_in,
        }))
    }

    #[test]
    fn test_token_generation_and_validation() {
        let manager = create_test_manager("test-secret-key-for-jwt-testing-0123", 3600);

        let token = manager
            .generate_access_token(7, "alice".to_string(), false)
            .unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.username, "alice");
        assert!(!claims.is_admin);
        assert_eq!(claims.iss, JWT_ISSUER);
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let issuer = create_test_manager("secret-one-secret-one-secret-one-0", 3600);
        let verifier = create_test_manager("secret-two-secret-two-secret-two-0", 3600);

        let token = issuer
            .generate_access_token(1, "root".to_string(), true)
            .unwrap();
        let err = verifier.validate_token(&token).unwrap_err();
        assert!(matches!(err, LedgerError::Auth { .. }));
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = create_test_manager("test-secret-key-for-jwt-testing-0123", -3600);

        let token = manager
            .generate_access_token(1, "root".to_string(), true)
            .unwrap();
        let err = manager.validate_token(&token).unwrap_err();
        assert!(err.to_string().contains("过期"));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let manager = create_test_manager("test-secret-key-for-jwt-testing-0123", 3600);
        assert!(manager.validate_token("not-a-jwt").is_err());
    }
}
