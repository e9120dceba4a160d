//! # Entity 模块
//!
//! 包含所有 Sea-ORM 实体定义

pub mod logs;

pub use logs::Entity as Logs;

#[cfg(test)]
mod tests;
