//! # 日志统计
//!
//! 额度按整个匹配集合求和；RPM/TPM 取结束时间（或当前时间）之前
//! `rate_window_secs` 秒的尾部窗口，窗口不早于过滤条件的起始时间，
//! 结果折算到每分钟。

use super::filter::LogFilter;
use super::store::LogStore;
use super::types::{StatsResult, WindowUsage};
use crate::error::Result;
use chrono::Utc;
use std::sync::Arc;

const SECONDS_PER_MINUTE: i64 = 60;

/// 日志统计聚合器
#[derive(Clone)]
pub struct StatsAggregator {
    store: Arc<dyn LogStore>,
    rate_window_secs: i64,
}

impl StatsAggregator {
    #[must_use]
    pub fn new(store: Arc<dyn LogStore>, rate_window_secs: i64) -> Self {
        Self {
            store,
            rate_window_secs,
        }
    }

    /// 以当前时间为基准统计
    pub async fn sum(&self, filter: &LogFilter) -> Result<StatsResult> {
        self.sum_at(filter, Utc::now().timestamp()).await
    }

    /// 以给定时间为基准统计
    pub async fn sum_at(&self, filter: &LogFilter, now: i64) -> Result<StatsResult> {
        filter.validate()?;
        let quota = self.store.sum_quota(filter).await?;

        let Some((start, end)) = rate_window(filter, now, self.rate_window_secs) else {
            return Ok(StatsResult {
                quota,
                ..StatsResult::default()
            });
        };

        let usage = self
            .store
            .window_usage(&filter.with_time_range(start, end))
            .await?;
        let (rpm, tpm) = per_minute(usage, end - start);

        Ok(StatsResult { quota, rpm, tpm })
    }
}

/// 计算速率窗口，窗口为空时返回 `None`
#[must_use]
pub fn rate_window(filter: &LogFilter, now: i64, window_secs: i64) -> Option<(i64, i64)> {
    if window_secs <= 0 {
        return None;
    }
    let end = filter.end_timestamp.map_or(now, |end| end.min(now));
    let mut start = end.saturating_sub(window_secs);
    if let Some(lower) = filter.start_timestamp {
        start = start.max(lower);
    }
    (start < end).then_some((start, end))
}

fn per_minute(usage: WindowUsage, span_secs: i64) -> (i64, i64) {
    if span_secs <= 0 {
        return (0, 0);
    }
    (
        usage.requests.saturating_mul(SECONDS_PER_MINUTE) / span_secs,
        usage.tokens.saturating_mul(SECONDS_PER_MINUTE) / span_secs,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{LogFixture, MockLogStore};

    #[test]
    fn test_rate_window_unbounded_uses_trailing_minute() {
        assert_eq!(rate_window(&LogFilter::default(), 1_000, 60), Some((940, 1_000)));
    }

    #[test]
    fn test_rate_window_anchors_at_past_end_bound() {
        let filter = LogFilter {
            end_timestamp: Some(500),
            ..LogFilter::default()
        };
        assert_eq!(rate_window(&filter, 1_000, 60), Some((440, 500)));
    }

    #[test]
    fn test_rate_window_clipped_to_start_bound() {
        let filter = LogFilter {
            start_timestamp: Some(980),
            ..LogFilter::default()
        };
        assert_eq!(rate_window(&filter, 1_000, 60), Some((980, 1_000)));

        let future = LogFilter {
            start_timestamp: Some(2_000),
            ..LogFilter::default()
        };
        assert_eq!(rate_window(&future, 1_000, 60), None);
    }

    #[test]
    fn test_non_positive_window_disables_rates() {
        assert_eq!(rate_window(&LogFilter::default(), 1_000, 0), None);
        assert_eq!(per_minute(WindowUsage { requests: 5, tokens: 50 }, 0), (0, 0));
    }

    #[test]
    fn test_per_minute_normalization() {
        assert_eq!(per_minute(WindowUsage { requests: 6, tokens: 300 }, 60), (6, 300));
        assert_eq!(per_minute(WindowUsage { requests: 3, tokens: 90 }, 30), (6, 180));
    }

    #[tokio::test]
    async fn test_empty_store_sums_to_zero() {
        let aggregator = StatsAggregator::new(Arc::new(MockLogStore::default()), 60);
        let stats = aggregator.sum(&LogFilter::default()).await.unwrap();
        assert_eq!(stats, StatsResult::default());
    }

    #[tokio::test]
    async fn test_sum_with_rows() {
        let rows = vec![
            LogFixture::new().quota(100).tokens(10, 20).build(1),
            LogFixture::new().quota(250).tokens(5, 5).build(2),
        ];
        let aggregator = StatsAggregator::new(Arc::new(MockLogStore::with_rows(rows)), 60);
        let stats = aggregator.sum_at(&LogFilter::default(), 10_000).await.unwrap();

        assert_eq!(stats, StatsResult { quota: 350, rpm: 2, tpm: 40 });
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let aggregator = StatsAggregator::new(Arc::new(MockLogStore::failing()), 60);
        assert!(aggregator.sum(&LogFilter::default()).await.is_err());
    }
}
