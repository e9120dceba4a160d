//! # 认证模块
//!
//! 管理接口使用 HS256 JWT 认证，载荷中携带用户 ID、用户名和管理员标记。

pub mod jwt;
pub mod types;
pub mod utils;

pub use jwt::JwtManager;
pub use types::{AuthConfig, JwtClaims};
pub use utils::AuthUtils;

/// JWT 密钥的最小长度
pub const MIN_JWT_SECRET_LEN: usize = 32;
