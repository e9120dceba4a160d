//! # 公共类型

pub mod timezone;

pub use timezone::{TimezoneContext, timezone_utils};
