//! # 管理服务器中间件

pub mod auth;
pub mod request_id;
pub mod timezone;

pub use auth::{AuthContext, auth, require_admin};
pub use request_id::{RequestId, request_id_middleware};
pub use timezone::timezone_middleware;
