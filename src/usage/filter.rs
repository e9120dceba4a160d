//! # 日志过滤条件
//!
//! 查询参数按宽松规则解析：缺失或无法解析的数值视为 0，
//! 0 和空字符串表示该维度不做约束。

use super::types::LogType;
use crate::error::Result;
use crate::{ensure, error};
use serde::Deserialize;

/// 一次请求的过滤条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub log_type: Option<LogType>,
    pub start_timestamp: Option<i64>,
    pub end_timestamp: Option<i64>,
    pub username: Option<String>,
    pub token_name: Option<String>,
    pub model_name: Option<String>,
    pub channel: Option<i32>,
    pub group: Option<String>,
    /// 仅由自助接口设置
    pub user_id: Option<i32>,
}

impl LogFilter {
    /// 限定到单个用户，忽略调用方给出的用户名
    #[must_use]
    pub fn scoped_to_user(mut self, user_id: i32) -> Self {
        self.user_id = Some(user_id);
        self.username = None;
        self
    }

    /// 复制一份并替换时间范围
    #[must_use]
    pub fn with_time_range(&self, start: i64, end: i64) -> Self {
        Self {
            start_timestamp: Some(start),
            end_timestamp: Some(end),
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start_timestamp, self.end_timestamp) {
            ensure!(
                start <= end,
                Validation,
                "start_timestamp ({start}) must not be after end_timestamp ({end})"
            );
        }
        Ok(())
    }
}

/// 列表、统计、导出共用的查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogFilterQuery {
    #[serde(rename = "type")]
    pub log_type: Option<String>,
    pub start_timestamp: Option<String>,
    pub end_timestamp: Option<String>,
    pub username: Option<String>,
    pub token_name: Option<String>,
    pub model_name: Option<String>,
    pub channel: Option<String>,
    pub group: Option<String>,
}

impl LogFilterQuery {
    /// 转换为过滤条件，未知的日志类别会被拒绝
    pub fn into_filter(self) -> Result<LogFilter> {
        let type_code = lenient_i32(self.log_type.as_deref());
        let log_type = match type_code {
            0 => None,
            code => Some(
                LogType::from_code(code)
                    .ok_or_else(|| error!(Validation, "unknown log type: {code}"))?,
            ),
        };

        let filter = LogFilter {
            log_type,
            start_timestamp: positive(lenient_i64(self.start_timestamp.as_deref())),
            end_timestamp: positive(lenient_i64(self.end_timestamp.as_deref())),
            username: non_empty(self.username),
            token_name: non_empty(self.token_name),
            model_name: non_empty(self.model_name),
            channel: positive(lenient_i32(self.channel.as_deref())),
            group: non_empty(self.group),
            user_id: None,
        };
        filter.validate()?;
        Ok(filter)
    }
}

/// 宽松解析整数，失败时为 0
#[must_use]
pub fn lenient_i64(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(0)
}

#[must_use]
pub fn lenient_i32(raw: Option<&str>) -> i32 {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(0)
}

fn positive<T: PartialOrd + Default>(value: T) -> Option<T> {
    (value > T::default()).then_some(value)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use pretty_assertions::assert_eq;

    fn query(pairs: &[(&str, &str)]) -> LogFilterQuery {
        let object = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), serde_json::Value::from(*value)))
            .collect();
        serde_json::from_value(serde_json::Value::Object(object)).unwrap()
    }

    #[test]
    fn test_empty_query_is_unconstrained() {
        let filter = LogFilterQuery::default().into_filter().unwrap();
        assert_eq!(filter, LogFilter::default());
    }

    #[test]
    fn test_zero_and_garbage_values_are_unconstrained() {
        let filter = query(&[
            ("type", "0"),
            ("start_timestamp", "abc"),
            ("end_timestamp", "0"),
            ("channel", "-3"),
            ("username", "  "),
        ])
        .into_filter()
        .unwrap();
        assert_eq!(filter, LogFilter::default());
    }

    #[test]
    fn test_full_query_parsed() {
        let filter = query(&[
            ("type", "2"),
            ("start_timestamp", "1700000000"),
            ("end_timestamp", "1700003600"),
            ("username", "alice"),
            ("token_name", "prod"),
            ("model_name", "gpt-4o"),
            ("channel", "7"),
            ("group", "vip"),
        ])
        .into_filter()
        .unwrap();

        assert_eq!(
            filter,
            LogFilter {
                log_type: Some(LogType::Consume),
                start_timestamp: Some(1_700_000_000),
                end_timestamp: Some(1_700_003_600),
                username: Some("alice".to_string()),
                token_name: Some("prod".to_string()),
                model_name: Some("gpt-4o".to_string()),
                channel: Some(7),
                group: Some("vip".to_string()),
                user_id: None,
            }
        );
    }

    #[test]
    fn test_unknown_log_type_rejected() {
        let err = query(&[("type", "42")]).into_filter().unwrap_err();
        assert!(matches!(err, LedgerError::Validation { .. }));
    }

    #[test]
    fn test_inverted_time_range_rejected() {
        let err = query(&[("start_timestamp", "200"), ("end_timestamp", "100")])
            .into_filter()
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation { .. }));
    }

    #[test]
    fn test_scoped_to_user_drops_username() {
        let filter = LogFilter {
            username: Some("mallory".to_string()),
            ..LogFilter::default()
        }
        .scoped_to_user(12);

        assert_eq!(filter.user_id, Some(12));
        assert_eq!(filter.username, None);
    }
}
