//! # 使用日志领域类型

use serde::{Deserialize, Serialize};

/// 单条使用日志
pub type LogEntry = entity::logs::Model;

/// 日志类别，取值封闭
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogType {
    Unknown,
    TopUp,
    Consume,
    Manage,
    System,
    Error,
}

impl LogType {
    pub const ALL: [Self; 6] = [
        Self::Unknown,
        Self::TopUp,
        Self::Consume,
        Self::Manage,
        Self::System,
        Self::Error,
    ];

    /// 存储层使用的整数编码
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::TopUp => 1,
            Self::Consume => 2,
            Self::Manage => 3,
            Self::System => 4,
            Self::Error => 5,
        }
    }

    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|log_type| log_type.code() == code)
    }
}

/// 查询范围：全部用户或单个用户
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogScope {
    All,
    User(i32),
}

impl LogScope {
    #[must_use]
    pub const fn user_id(self) -> Option<i32> {
        match self {
            Self::All => None,
            Self::User(user_id) => Some(user_id),
        }
    }
}

/// 分页请求，`offset` 从 0 开始
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u64,
}

impl PageRequest {
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }
}

/// 一页日志及匹配总数
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogPage {
    pub items: Vec<LogEntry>,
    pub total: u64,
}

/// 统计结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResult {
    /// 匹配记录的额度总和
    pub quota: i64,
    /// 每分钟请求数
    pub rpm: i64,
    /// 每分钟 token 数
    pub tpm: i64,
}

/// 时间窗口内的请求数和 token 数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowUsage {
    pub requests: i64,
    pub tokens: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_type_codes_are_closed() {
        for log_type in LogType::ALL {
            assert_eq!(LogType::from_code(log_type.code()), Some(log_type));
        }
        assert_eq!(LogType::from_code(6), None);
        assert_eq!(LogType::from_code(-1), None);
    }

    #[test]
    fn test_scope_user_id() {
        assert_eq!(LogScope::All.user_id(), None);
        assert_eq!(LogScope::User(9).user_id(), Some(9));
    }
}
