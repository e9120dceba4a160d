use serde::{Deserialize, Serialize};

use crate::usage::PageRequest;
use crate::usage::filter::lenient_i64;

/// 分页查询参数，兼容 `p` / `page_size` 写法
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(alias = "p")]
    pub page: Option<String>,
    #[serde(alias = "page_size")]
    pub limit: Option<String>,
}

impl PageQuery {
    /// 按默认值和上限解析，非正数或无法解析的值视为未提供
    #[must_use]
    pub fn to_params(&self, default_limit: u64, max_limit: u64) -> PaginationParams {
        PaginationParams::new(
            positive(self.page.as_deref()),
            positive(self.limit.as_deref()),
            default_limit,
            max_limit,
        )
    }
}

fn positive(raw: Option<&str>) -> Option<u64> {
    u64::try_from(lenient_i64(raw)).ok().filter(|value| *value > 0)
}

/// 分页参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    /// 当前页码（>= 1）
    pub page: u64,
    /// 每页条数（>= 1）
    pub limit: u64,
}

impl PaginationParams {
    /// 根据可选参数创建分页配置，并应用默认值与上限。
    #[must_use]
    pub fn new(page: Option<u64>, limit: Option<u64>, default_limit: u64, max_limit: u64) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(default_limit).clamp(1, max_limit.max(1));
        Self { page, limit }
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    #[must_use]
    pub const fn to_request(self) -> PageRequest {
        PageRequest::new(self.offset(), self.limit)
    }
}

/// 标准分页信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl From<PaginationInfo> for crate::management::response::Pagination {
    fn from(value: PaginationInfo) -> Self {
        Self {
            page: value.page,
            limit: value.limit,
            total: value.total,
            pages: value.pages,
        }
    }
}

/// 根据总数和分页参数计算分页信息。
#[must_use]
pub const fn build_page(total: u64, params: PaginationParams) -> PaginationInfo {
    let pages = if total == 0 {
        0
    } else {
        total.div_ceil(params.limit)
    };
    PaginationInfo {
        page: params.page,
        limit: params.limit,
        total,
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_query(page: Option<&str>, limit: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults_and_clamping() {
        assert_eq!(
            page_query(None, None).to_params(10, 100),
            PaginationParams { page: 1, limit: 10 }
        );
        assert_eq!(
            page_query(Some("3"), Some("500")).to_params(10, 100),
            PaginationParams { page: 3, limit: 100 }
        );
        assert_eq!(
            page_query(Some("-2"), Some("abc")).to_params(10, 100),
            PaginationParams { page: 1, limit: 10 }
        );
    }

    #[test]
    fn test_offset_and_request() {
        let params = PaginationParams::new(Some(3), Some(20), 10, 100);
        assert_eq!(params.offset(), 40);
        assert_eq!(params.to_request(), PageRequest::new(40, 20));
    }

    #[test]
    fn test_build_page() {
        let params = PaginationParams::new(Some(1), Some(20), 10, 100);
        assert_eq!(build_page(0, params).pages, 0);
        assert_eq!(build_page(41, params).pages, 3);
    }

    #[test]
    fn test_short_aliases_deserialize() {
        let query: PageQuery =
            serde_json::from_value(serde_json::json!({"p": "2", "page_size": "50"})).unwrap();
        assert_eq!(query.to_params(10, 100), PaginationParams { page: 2, limit: 50 });
    }
}
