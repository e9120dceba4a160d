//! # 时区转换类型和工具
//!
//! 日志时间以 UTC 秒级时间戳存储，展示时按请求的 `X-Timezone` 转换。

use chrono_tz::Tz;

/// 时区上下文，用于在请求中传递时区信息
#[derive(Debug, Clone)]
pub struct TimezoneContext {
    pub timezone: Tz,
}

impl Default for TimezoneContext {
    fn default() -> Self {
        Self { timezone: Tz::UTC }
    }
}

/// 时区工具函数
pub mod timezone_utils {
    use chrono::{DateTime, Utc};
    use chrono_tz::Tz;

    /// 展示用的时间格式
    pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// 解析时区字符串，失败时返回UTC
    #[must_use]
    pub fn parse_timezone_safe(timezone_str: &str) -> Tz {
        timezone_str.trim().parse::<Tz>().unwrap_or(Tz::UTC)
    }

    /// 将UTC时间转换为用户时区的格式化字符串
    #[must_use]
    pub fn format_utc_for_response(utc_dt: &DateTime<Utc>, timezone: &Tz) -> String {
        utc_dt.with_timezone(timezone).format(DISPLAY_FORMAT).to_string()
    }

    /// 将秒级时间戳转换为用户时区的格式化字符串
    ///
    /// 超出可表示范围的时间戳原样输出
    #[must_use]
    pub fn format_timestamp_for_response(timestamp: i64, timezone: &Tz) -> String {
        DateTime::<Utc>::from_timestamp(timestamp, 0).map_or_else(
            || timestamp.to_string(),
            |dt| format_utc_for_response(&dt, timezone),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::timezone_utils::*;
    use chrono_tz::Tz;

    #[test]
    fn test_parse_timezone_safe() {
        assert_eq!(parse_timezone_safe("Asia/Shanghai"), Tz::Asia__Shanghai);
        assert_eq!(parse_timezone_safe(" UTC "), Tz::UTC);
        assert_eq!(parse_timezone_safe("Mars/Olympus"), Tz::UTC);
    }

    #[test]
    fn test_format_timestamp_for_response() {
        // 2024-01-01 00:00:00 UTC
        let ts = 1_704_067_200;
        assert_eq!(format_timestamp_for_response(ts, &Tz::UTC), "2024-01-01 00:00:00");
        assert_eq!(
            format_timestamp_for_response(ts, &Tz::Asia__Shanghai),
            "2024-01-01 08:00:00"
        );
        assert_eq!(format_timestamp_for_response(i64::MAX, &Tz::UTC), i64::MAX.to_string());
    }
}
