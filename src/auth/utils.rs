//! # 认证工具函数

use axum::http::{HeaderMap, header::AUTHORIZATION};

/// 认证工具类
pub struct AuthUtils;

impl AuthUtils {
    /// 从HTTP头中提取Authorization头的值
    #[must_use]
    pub fn extract_authorization_header(headers: &HeaderMap) -> Option<&str> {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
    }

    /// 从Authorization头中提取Bearer token
    ///
    /// 前缀大小写不敏感，token 为空时返回 `None`
    #[must_use]
    pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
        let (scheme, token) = auth_header.trim().split_once(' ')?;
        let token = token.trim();
        (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(AuthUtils::extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(AuthUtils::extract_bearer_token("bearer  xyz "), Some("xyz"));
        assert_eq!(AuthUtils::extract_bearer_token("Basic abc"), None);
        assert_eq!(AuthUtils::extract_bearer_token("Bearer "), None);
        assert_eq!(AuthUtils::extract_bearer_token("Bearer"), None);
    }

    #[test]
    fn test_extract_authorization_header() {
        let mut headers = HeaderMap::new();
        assert!(AuthUtils::extract_authorization_header(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer t"));
        assert_eq!(AuthUtils::extract_authorization_header(&headers), Some("Bearer t"));
    }
}
